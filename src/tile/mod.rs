//! Tile construction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │      (load source image, name it)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Builder               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ crop_padded  │  │   Annotation    │  │
//! │  │  (raster)    │  │    Clipper      │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │                 TileSet                 │
//! │  metadata | annotations | raster files  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileService`]: Loads an image from an `ImageSource` and tiles it
//! - [`TileBuilder`]: Crops and clips every tile of a layout
//! - [`AnnotationClipper`]: Re-projects one annotation into one tile
//! - [`TileSet`]: Index-aligned tile metadata, annotations and rasters
//! - [`JpegTileEncoder`]: Encodes tile rasters for output

mod builder;
mod clipper;
mod encoder;
mod raster;
mod service;

pub use builder::{TileBuilder, TileMetadata, TileResult, TileSet};
pub use clipper::{tile_polygon, AnnotationClipper, PreparedAnnotation};
pub use encoder::{
    clamp_quality, is_valid_quality, JpegTileEncoder, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use raster::{crop_padded, DEFAULT_FILL};
pub use service::{image_name, TileService};
