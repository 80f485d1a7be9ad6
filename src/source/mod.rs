//! Image sources.
//!
//! An [`ImageSource`] turns an identifier into a decoded RGB raster. The
//! tiling core never touches storage directly; it only sees the raster.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              TileService                │
//! └────────────────────┬────────────────────┘
//!                      │ load(identifier)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ImageSource Trait             │
//! └────────────────────┬────────────────────┘
//!          ┌───────────┼───────────┐
//!          ▼           ▼           ▼
//!   LocalImageSource  S3Image   MemoryImage
//!    (filesystem)     Source      Source
//! ```
//!
//! Missing images are reported as [`SourceError::NotFound`]; network
//! failures as [`SourceError::Connection`], so callers can tell a bad key
//! from an unreachable store.

mod local;
mod memory;
mod s3;

pub use local::LocalImageSource;
pub use memory::MemoryImageSource;
pub use s3::{create_s3_client, S3ImageSource};

use async_trait::async_trait;
use image::RgbImage;

use crate::error::SourceError;

/// Loads source images by identifier.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch and decode the image named by `identifier`.
    async fn load(&self, identifier: &str) -> Result<RgbImage, SourceError>;
}

/// Decode an encoded image buffer into an RGB raster.
///
/// The format is detected from the buffer contents.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, SourceError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| SourceError::Decode(e.to_string()))
}
