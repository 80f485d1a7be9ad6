//! Geometry utilities for clipped annotations.
//!
//! All functions here work on flat coordinate lists `[x0, y0, x1, y1, ...]`,
//! the shape segmentations are stored in.
//!
//! The health checks run in two stages: [`clamp_to_tile`] pulls coordinates
//! that spilled onto or past a tile edge back inside, then [`bbox_is_valid`]
//! rejects boxes that are still degenerate. Together they are the only
//! filter for slivers left over from clipping.

pub mod boolean;

pub use boolean::{GeoEngine, GeometryEngine, Intersection};

use crate::annotation::BBox;
use crate::error::GeometryError;

/// Split a flat coordinate list into its x and y sequences.
pub fn extract_xy(flat: &[f64]) -> Result<(Vec<f64>, Vec<f64>), GeometryError> {
    if flat.len() % 2 != 0 {
        return Err(GeometryError::OddCoordinateCount(flat.len()));
    }

    let xs = flat.iter().step_by(2).copied().collect();
    let ys = flat.iter().skip(1).step_by(2).copied().collect();
    Ok((xs, ys))
}

/// Bounding box of a flat coordinate list.
pub fn polygon_to_bbox(flat: &[f64]) -> Result<BBox, GeometryError> {
    let (xs, ys) = extract_xy(flat)?;
    if xs.is_empty() {
        return Err(GeometryError::Empty);
    }

    let (x_min, x_max) = min_max(&xs);
    let (y_min, y_max) = min_max(&ys);
    Ok(BBox::new(x_min, y_min, x_max - x_min, y_max - y_min))
}

/// Area of the bounding box of a flat coordinate list.
///
/// This is the box area, not the polygon area.
pub fn polygon_area(flat: &[f64]) -> Result<f64, GeometryError> {
    Ok(polygon_to_bbox(flat)?.area())
}

/// Pull coordinates that touch or cross a tile edge back inside the tile.
///
/// `x >= width` becomes `width - 1` and `x <= 0` becomes `1`; y is treated
/// the same against `height`. Anything strictly inside passes through.
pub fn clamp_to_tile(flat: &[f64], width: u32, height: u32) -> Result<Vec<f64>, GeometryError> {
    let (xs, ys) = extract_xy(flat)?;
    let (width, height) = (f64::from(width), f64::from(height));

    let mut clamped = Vec::with_capacity(flat.len());
    for (x, y) in xs.into_iter().zip(ys) {
        clamped.push(clamp_axis(x, width));
        clamped.push(clamp_axis(y, height));
    }
    Ok(clamped)
}

#[inline]
fn clamp_axis(value: f64, bound: f64) -> f64 {
    if value >= bound {
        bound - 1.0
    } else if value <= 0.0 {
        1.0
    } else {
        value
    }
}

/// Check that a tile-local bbox is usable.
///
/// The corners are normalized to fractions of the tile size and must all
/// lie in `(0, 1]`, the box must have positive extent, and its origin must
/// sit strictly inside the tile.
pub fn bbox_is_valid(bbox: &BBox, width: u32, height: u32) -> bool {
    let (w, h) = (f64::from(width), f64::from(height));

    let x_min = bbox.x / w;
    let x_max = bbox.x_max() / w;
    let y_min = bbox.y / h;
    let y_max = bbox.y_max() / h;

    if [x_min, y_min, x_max, y_max]
        .iter()
        .any(|v| !(*v > 0.0 && *v <= 1.0))
    {
        return false;
    }

    if x_max <= x_min || y_max <= y_min {
        return false;
    }

    bbox.x < w && bbox.y < h
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
