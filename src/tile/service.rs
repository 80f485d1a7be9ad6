//! Tile Service for tiling whole source images.
//!
//! The TileService is the main entry point for a tiling run. It:
//! - Loads the source image through an [`ImageSource`]
//! - Derives the image name used in tile file names
//! - Lays out and builds the tiles
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TileService                          │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                     tile_image()                      │  │
//! │  │  1. Load image      3. Lay out tiles                  │  │
//! │  │  2. Derive name     4. Crop + clip each tile          │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │              │                             │                │
//! │              ▼                             ▼                │
//! │      ┌──────────────┐             ┌──────────────┐          │
//! │      │ ImageSource  │             │ TileBuilder  │          │
//! │      └──────────────┘             └──────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::annotation::SourceAnnotation;
use crate::error::TilingError;
use crate::geometry::{GeoEngine, GeometryEngine};
use crate::source::{decode_image, ImageSource};

use super::builder::{TileBuilder, TileSet};

/// Service for tiling source images loaded from an [`ImageSource`].
///
/// # Example
///
/// ```ignore
/// use image_tiler::source::LocalImageSource;
/// use image_tiler::tile::{TileBuilder, TileService};
/// use image_tiler::TilingPolicy;
///
/// let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping)?;
/// let service = TileService::new(LocalImageSource::new(), builder);
///
/// let tiles = service.tile_image("images/hoss.jpg", &annotations).await?;
/// println!("{} tiles, {} annotations", tiles.len(), tiles.annotation_count());
/// ```
pub struct TileService<S: ImageSource, E: GeometryEngine = GeoEngine> {
    /// Where source images come from
    source: S,

    /// Layout, cropping and clipping
    builder: TileBuilder<E>,
}

impl<S: ImageSource, E: GeometryEngine> TileService<S, E> {
    pub fn new(source: S, builder: TileBuilder<E>) -> Self {
        Self { source, builder }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn builder(&self) -> &TileBuilder<E> {
        &self.builder
    }

    /// Load the image named by `identifier` and tile it.
    ///
    /// # Errors
    ///
    /// Fails if the image cannot be loaded. Geometry problems in individual
    /// annotations are not errors; those annotations are dropped per tile.
    pub async fn tile_image(
        &self,
        identifier: &str,
        annotations: &[SourceAnnotation],
    ) -> Result<TileSet, TilingError> {
        let image = self.source.load(identifier).await?;
        self.tile_raster(&image, &image_name(identifier), annotations)
    }

    /// Decode an in-memory image buffer and tile it.
    pub fn tile_bytes(
        &self,
        bytes: &[u8],
        image_name: &str,
        annotations: &[SourceAnnotation],
    ) -> Result<TileSet, TilingError> {
        let image = decode_image(bytes)?;
        self.tile_raster(&image, image_name, annotations)
    }

    /// Tile an already decoded raster.
    pub fn tile_raster(
        &self,
        image: &RgbImage,
        image_name: &str,
        annotations: &[SourceAnnotation],
    ) -> Result<TileSet, TilingError> {
        let tiles = self
            .builder
            .build_with_policy(image, image_name, annotations)?;

        info!(
            image = image_name,
            width = image.width(),
            height = image.height(),
            policy = %self.builder.policy(),
            tiles = tiles.len(),
            annotations = tiles.annotation_count(),
            "Tiled image"
        );

        Ok(tiles)
    }
}

/// Image name used in tile file names: the base name up to its first `.`.
///
/// `images/hoss.v2.jpg` becomes `hoss`.
pub fn image_name(identifier: &str) -> String {
    let base = Path::new(identifier)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identifier);

    base.split('.').next().unwrap_or(base).to_string()
}
