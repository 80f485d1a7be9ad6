//! # Image Tiler
//!
//! Splits large annotated images into fixed-size tiles for training
//! object-detection and segmentation models.
//!
//! Each annotation (a polygon or a bounding box) is intersected with every
//! tile it overlaps and re-projected into that tile's pixel space. Fragments
//! that end up degenerate after clipping are dropped.
//!
//! ## Features
//!
//! - **Three layout policies**: drop the remainder, add an overlapping edge
//!   tile, or pad the last tile past the image edge
//! - **Robust clipping**: self-intersecting polygons are repaired, bad
//!   geometry is logged and skipped without aborting the run
//! - **Multiple sources**: local files, S3-compatible storage, in-memory buffers
//! - **COCO-style output**: JPEG tiles plus one annotations document
//!
//! ## Architecture
//!
//! - [`geometry`] - Coordinate helpers, health checks and boolean ops
//! - [`layout`] - Tiling policies and tile origins
//! - [`annotation`] - Source and clipped annotation records
//! - [`tile`] - Clipper, builder, cropping, encoding and the tile service
//! - [`source`] - Image sources (local, S3, memory)
//! - [`output`] - Writing tiles, annotation documents and debug renderings
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust
//! use image::RgbImage;
//! use image_tiler::{BBox, SourceAnnotation, TileBuilder, TilingPolicy};
//!
//! let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
//! let image = RgbImage::new(1000, 1000);
//! let annotations = vec![SourceAnnotation::from_bbox(1, BBox::new(0.0, 0.0, 1000.0, 1000.0))];
//!
//! let tiles = builder.build_with_policy(&image, "scene", &annotations).unwrap();
//! for tile in tiles.tiles() {
//!     println!("{}: {} annotation(s)", tile.file_name, tile.annotations.len());
//! }
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod output;
pub mod source;
pub mod tile;

// Re-export commonly used types
pub use annotation::{parse_annotations, BBox, ClippedAnnotation, SourceAnnotation};
pub use config::Config;
pub use error::{ConfigError, GeometryError, OutputError, SourceError, TilingError};
pub use geometry::{
    bbox_is_valid, clamp_to_tile, extract_xy, polygon_area, polygon_to_bbox, GeoEngine,
    GeometryEngine, Intersection,
};
pub use layout::{generate_origins, tile_specs, TileSpec, TilingPolicy};
pub use output::{write_coco, write_tiles, CocoDocument};
pub use source::{
    create_s3_client, decode_image, ImageSource, LocalImageSource, MemoryImageSource,
    S3ImageSource,
};
pub use tile::{
    AnnotationClipper, JpegTileEncoder, TileBuilder, TileMetadata, TileResult, TileService,
    TileSet,
};
