//! Tile set construction.
//!
//! [`TileBuilder`] walks the tile layout in order, crops each tile from the
//! source raster and clips every source annotation against it. Results are
//! collected into a [`TileSet`]: three index-aligned sequences holding tile
//! metadata, per-tile annotations and the cropped rasters with their names.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{ClippedAnnotation, SourceAnnotation};
use crate::error::ConfigError;
use crate::geometry::{GeoEngine, GeometryEngine};
use crate::layout::{check_tile_size, tile_specs, TileSpec, TilingPolicy};

use super::clipper::{AnnotationClipper, PreparedAnnotation};
use super::raster::{crop_padded, DEFAULT_FILL};

// =============================================================================
// Tile Set
// =============================================================================

/// Image entry for one tile, as recorded in the output dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMetadata {
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

/// Borrowed view of one entry of a [`TileSet`].
#[derive(Debug, Clone, Copy)]
pub struct TileResult<'a> {
    pub metadata: &'a TileMetadata,
    pub annotations: &'a [ClippedAnnotation],
    pub raster: &'a RgbImage,
    pub file_name: &'a str,
}

/// All tiles generated from one source image.
///
/// Entries are only added as complete triples, so the three sequences
/// always have the same length and follow the tile layout order.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    images: Vec<TileMetadata>,
    annotations: Vec<Vec<ClippedAnnotation>>,
    files: Vec<(RgbImage, String)>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, metadata: TileMetadata, annotations: Vec<ClippedAnnotation>, raster: RgbImage) {
        let file_name = metadata.file_name.clone();
        self.images.push(metadata);
        self.annotations.push(annotations);
        self.files.push((raster, file_name));
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Tile metadata, one entry per tile.
    pub fn images(&self) -> &[TileMetadata] {
        &self.images
    }

    /// Clipped annotations, one list per tile.
    pub fn annotations(&self) -> &[Vec<ClippedAnnotation>] {
        &self.annotations
    }

    /// Tile rasters with their file names, one entry per tile.
    pub fn files(&self) -> &[(RgbImage, String)] {
        &self.files
    }

    /// Total number of clipped annotations across all tiles.
    pub fn annotation_count(&self) -> usize {
        self.annotations.iter().map(Vec::len).sum()
    }

    /// Iterate tiles in layout order.
    pub fn tiles(&self) -> impl Iterator<Item = TileResult<'_>> {
        self.images
            .iter()
            .zip(&self.annotations)
            .zip(&self.files)
            .map(|((metadata, annotations), (raster, file_name))| TileResult {
                metadata,
                annotations,
                raster,
                file_name,
            })
    }

}

// =============================================================================
// Tile Builder
// =============================================================================

/// Builds tile sets for a fixed tile size and layout policy.
///
/// # Example
///
/// ```
/// use image::RgbImage;
/// use image_tiler::{BBox, SourceAnnotation, TileBuilder, TilingPolicy};
///
/// let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
/// let image = RgbImage::new(1000, 1000);
/// let annotations = vec![SourceAnnotation::from_bbox(1, BBox::new(0.0, 0.0, 1000.0, 1000.0))];
///
/// let tiles = builder.build_with_policy(&image, "scene", &annotations).unwrap();
/// assert_eq!(tiles.len(), 6);
/// assert_eq!(tiles.annotation_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct TileBuilder<E = GeoEngine> {
    tile_width: u32,
    tile_height: u32,
    policy: TilingPolicy,
    fill: Rgb<u8>,
    clipper: AnnotationClipper<E>,
}

impl TileBuilder<GeoEngine> {
    /// Create a builder using the default geometry engine.
    pub fn new(tile_width: u32, tile_height: u32, policy: TilingPolicy) -> Result<Self, ConfigError> {
        Self::with_engine(tile_width, tile_height, policy, GeoEngine)
    }
}

impl<E: GeometryEngine> TileBuilder<E> {
    /// Create a builder with a custom geometry engine.
    pub fn with_engine(
        tile_width: u32,
        tile_height: u32,
        policy: TilingPolicy,
        engine: E,
    ) -> Result<Self, ConfigError> {
        check_tile_size(tile_width, tile_height)?;

        Ok(Self {
            tile_width,
            tile_height,
            policy,
            fill: DEFAULT_FILL,
            clipper: AnnotationClipper::with_engine(engine),
        })
    }

    /// Set the color used for tile regions outside the image.
    pub fn with_fill(mut self, fill: Rgb<u8>) -> Self {
        self.fill = fill;
        self
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn policy(&self) -> TilingPolicy {
        self.policy
    }

    /// Tile layout for an image of the given size.
    pub fn layout(&self, image_width: u32, image_height: u32) -> Result<Vec<TileSpec>, ConfigError> {
        tile_specs(
            image_width,
            image_height,
            self.tile_width,
            self.tile_height,
            self.policy,
        )
    }

    /// Lay out tiles over `image` with the builder's policy and build them.
    pub fn build_with_policy(
        &self,
        image: &RgbImage,
        image_name: &str,
        annotations: &[SourceAnnotation],
    ) -> Result<TileSet, ConfigError> {
        let specs = self.layout(image.width(), image.height())?;
        Ok(self.build(image, image_name, &specs, annotations))
    }

    /// Build one tile per spec, in order.
    ///
    /// Every spec produces an entry, including tiles no annotation survives in.
    /// Annotation geometry is prepared once and reused for every tile.
    pub fn build(
        &self,
        image: &RgbImage,
        image_name: &str,
        specs: &[TileSpec],
        annotations: &[SourceAnnotation],
    ) -> TileSet {
        let prepared = self.clipper.prepare_all(annotations);
        let mut tiles = TileSet::new();

        for spec in specs {
            let (metadata, clipped, raster) = self.build_tile(image, image_name, spec, &prepared);
            debug!(
                file_name = %metadata.file_name,
                annotations = clipped.len(),
                "Built tile"
            );
            tiles.push(metadata, clipped, raster);
        }

        tiles
    }

    fn build_tile(
        &self,
        image: &RgbImage,
        image_name: &str,
        spec: &TileSpec,
        annotations: &[PreparedAnnotation],
    ) -> (TileMetadata, Vec<ClippedAnnotation>, RgbImage) {
        let raster = crop_padded(
            image,
            spec.origin_x,
            spec.origin_y,
            spec.width,
            spec.height,
            self.fill,
        );
        let clipped = self.clipper.clip_all(spec, annotations);
        let metadata = TileMetadata {
            width: spec.width,
            height: spec.height,
            file_name: spec.file_name(image_name),
        };

        (metadata, clipped, raster)
    }
}
