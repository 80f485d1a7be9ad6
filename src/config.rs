//! Configuration management for the image tiler.
//!
//! Settings come from:
//! - Command-line arguments via clap
//! - Environment variables with `TILER_` prefix
//! - Defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `TILER_ANNOTATIONS` - Path to the source annotation JSON file
//! - `TILER_OUTPUT` - Output directory (default: tiles)
//! - `TILER_TILE_WIDTH` / `TILER_TILE_HEIGHT` - Tile size (default: 512x512)
//! - `TILER_POLICY` - default, overlapping or padding (default: default)
//! - `TILER_JPEG_QUALITY` - Tile JPEG quality (default: 90)
//! - `TILER_S3_BUCKET` - Read the input from this bucket instead of disk
//! - `TILER_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `TILER_S3_REGION` - AWS region (default: us-east-1)

use std::path::PathBuf;

use clap::Parser;

use crate::layout::TilingPolicy;
use crate::output::ANNOTATIONS_FILE;
use crate::tile::{is_valid_quality, DEFAULT_JPEG_QUALITY};

// =============================================================================
// Default Values
// =============================================================================

/// Default tile width in pixels.
pub const DEFAULT_TILE_WIDTH: u32 = 512;

/// Default tile height in pixels.
pub const DEFAULT_TILE_HEIGHT: u32 = 512;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "tiles";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Tiler - split an annotated image into fixed-size training tiles.
///
/// Every annotation is clipped to each tile it overlaps and re-projected into
/// the tile's coordinates. Tiles are written as JPEG next to a COCO-style
/// annotations.json.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input
    // =========================================================================
    /// Source image: a local path, or an object key when --s3-bucket is set.
    pub input: String,

    /// JSON file with the source annotations (array or COCO document).
    #[arg(short, long, env = "TILER_ANNOTATIONS")]
    pub annotations: Option<PathBuf>,

    // =========================================================================
    // Tiling
    // =========================================================================
    /// Tile width in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_WIDTH, env = "TILER_TILE_WIDTH")]
    pub tile_width: u32,

    /// Tile height in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_HEIGHT, env = "TILER_TILE_HEIGHT")]
    pub tile_height: u32,

    /// Tiling policy: default, overlapping or padding.
    #[arg(long, default_value_t = TilingPolicy::Default, env = "TILER_POLICY")]
    pub policy: TilingPolicy,

    // =========================================================================
    // Output
    // =========================================================================
    /// Directory tiles and annotations are written to.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, env = "TILER_OUTPUT")]
    pub output: PathBuf,

    /// JPEG quality for written tiles (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "TILER_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Also write tiles with annotations drawn on them, for debugging.
    #[arg(long, default_value_t = false)]
    pub visualize: bool,

    // =========================================================================
    // S3 Configuration
    // =========================================================================
    /// Read the input image from this S3 bucket.
    #[arg(long, env = "TILER_S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "TILER_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "TILER_S3_REGION")]
    pub s3_region: String,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("An input image is required".to_string());
        }

        if self.tile_width == 0 || self.tile_height == 0 {
            return Err("tile_width and tile_height must be greater than 0".to_string());
        }

        if !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if let Some(bucket) = &self.s3_bucket {
            if bucket.is_empty() {
                return Err(
                    "S3 bucket name is empty. Set --s3-bucket or TILER_S3_BUCKET".to_string(),
                );
            }
        }

        Ok(())
    }

    /// Whether the input is read from S3.
    pub fn uses_s3(&self) -> bool {
        self.s3_bucket.is_some()
    }

    /// Path of the annotation document in the output directory.
    pub fn annotations_output(&self) -> PathBuf {
        self.output.join(ANNOTATIONS_FILE)
    }

    /// Directory debug renderings are written to.
    pub fn visualize_dir(&self) -> PathBuf {
        self.output.join("debug")
    }
}

// =============================================================================
// Tests
// =============================================================================
