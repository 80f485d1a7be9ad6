//! Debug rendering of clipped annotations.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::annotation::ClippedAnnotation;
use crate::error::OutputError;
use crate::tile::{JpegTileEncoder, TileSet};

pub const DEFAULT_MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

pub const DEFAULT_MARKER_RADIUS: i32 = 10;

/// Copy of `tile` with every annotation vertex marked and each ring outlined.
pub fn draw_annotations(
    tile: &RgbImage,
    annotations: &[ClippedAnnotation],
    color: Rgb<u8>,
    radius: i32,
) -> RgbImage {
    let mut canvas = tile.clone();

    for annotation in annotations {
        let points: Vec<(f32, f32)> = annotation
            .points()
            .map(|(x, y)| (x as f32, y as f32))
            .collect();

        for &(x, y) in &points {
            draw_filled_circle_mut(&mut canvas, (x as i32, y as i32), radius, color);
        }

        // Closed outline: last vertex connects back to the first
        for (start, end) in points.iter().zip(points.iter().cycle().skip(1)) {
            draw_line_segment_mut(&mut canvas, *start, *end, color);
        }
    }

    canvas
}

/// Write an annotated copy of every tile into `dir` as `debug_{file_name}`.
pub fn write_visualizations(
    tiles: &TileSet,
    dir: &Path,
    encoder: &JpegTileEncoder,
) -> Result<usize, OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::Io(format!("{}: {}", dir.display(), e)))?;

    for tile in tiles.tiles() {
        let canvas = draw_annotations(
            tile.raster,
            tile.annotations,
            DEFAULT_MARKER_COLOR,
            DEFAULT_MARKER_RADIUS,
        );
        let path = dir.join(format!("debug_{}", tile.file_name));
        let jpeg = encoder.encode(&canvas)?;
        fs::write(&path, &jpeg).map_err(|e| OutputError::Io(format!("{}: {}", path.display(), e)))?;
    }

    Ok(tiles.len())
}
