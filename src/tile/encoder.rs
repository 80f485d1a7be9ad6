//! JPEG tile encoder.
//!
//! Tiles are always written as baseline JPEG. Quality is fixed per encoder
//! and clamped to the valid range on construction.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::OutputError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// JPEG Encoder
// =============================================================================

/// Encodes tile rasters as JPEG.
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use image_tiler::tile::JpegTileEncoder;
///
/// let encoder = JpegTileEncoder::with_quality(85);
/// let tile = RgbImage::from_pixel(16, 16, Rgb([200, 10, 10]));
///
/// let jpeg = encoder.encode(&tile).unwrap();
/// assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JpegTileEncoder {
    quality: u8,
}

impl Default for JpegTileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegTileEncoder {
    /// Create an encoder at the default quality.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create an encoder at the given quality, clamped to 1-100.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: clamp_quality(quality),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a tile raster.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Encode`] if the encoder rejects the image,
    /// e.g. because a dimension is zero or too large for JPEG.
    pub fn encode(&self, tile: &RgbImage) -> Result<Bytes, OutputError> {
        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, self.quality);

        encoder
            .encode_image(tile)
            .map_err(|e| OutputError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
