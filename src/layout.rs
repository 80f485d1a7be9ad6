//! Tile layout generation.
//!
//! Origins are computed independently per axis and combined as a Cartesian
//! product with x as the outer loop:
//!
//! ```text
//! (x0, y0), (x0, y1), ..., (x1, y0), (x1, y1), ...
//! ```
//!
//! # Policies
//!
//! For an axis of length `L` and tile size `T`:
//!
//! | Policy        | Origins                                   | Count              |
//! |---------------|-------------------------------------------|--------------------|
//! | `Default`     | `0, T, 2T, ...` while a full tile fits    | `L / T`            |
//! | `Overlapping` | Default, plus `L - T` when `L % T != 0`   | `L / T + 1` if rem |
//! | `Padding`     | `0, T, 2T, ...` while the origin is `< L` | `ceil(L / T)`      |
//!
//! Under `Padding` the last tile may extend past the image. Filling that
//! region is up to the raster crop, not the layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tile file extension.
pub const TILE_EXTENSION: &str = "jpg";

// =============================================================================
// Tiling Policy
// =============================================================================

/// How tiles are laid out over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilingPolicy {
    /// Whole tiles only; the remainder strip is dropped
    #[default]
    Default,

    /// Whole tiles plus one extra tile flush with the far edge
    Overlapping,

    /// Cover the whole image; the last tile may hang off the edge
    Padding,
}

impl TilingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TilingPolicy::Default => "default",
            TilingPolicy::Overlapping => "overlapping",
            TilingPolicy::Padding => "padding",
        }
    }
}

impl fmt::Display for TilingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TilingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(TilingPolicy::Default),
            "overlapping" => Ok(TilingPolicy::Overlapping),
            "padding" => Ok(TilingPolicy::Padding),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

// =============================================================================
// Tile Spec
// =============================================================================

/// Placement of one tile in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSpec {
    pub origin_x: i64,
    pub origin_y: i64,
    pub width: u32,
    pub height: u32,
}

impl TileSpec {
    pub fn new(origin_x: i64, origin_y: i64, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn end_x(&self) -> i64 {
        self.origin_x + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn end_y(&self) -> i64 {
        self.origin_y + i64::from(self.height)
    }

    /// File name for this tile of `image_name`.
    ///
    /// `tiled_{name}_{x0}_{y0}---{x1}_{y1}.jpg`
    pub fn file_name(&self, image_name: &str) -> String {
        format!(
            "tiled_{}_{}_{}---{}_{}.{}",
            image_name,
            self.origin_x,
            self.origin_y,
            self.end_x(),
            self.end_y(),
            TILE_EXTENSION
        )
    }
}

// =============================================================================
// Origin Generation
// =============================================================================

/// Tile origins along one axis of length `length`.
///
/// A zero `tile` yields no origins.
pub fn axis_origins(length: u32, tile: u32, policy: TilingPolicy) -> Vec<i64> {
    if tile == 0 {
        return Vec::new();
    }
    let (length, tile) = (i64::from(length), i64::from(tile));
    let remainder = length % tile;
    let stepped = |end: i64| (0..end).step_by(tile as usize).collect::<Vec<i64>>();

    match policy {
        TilingPolicy::Default => stepped(length - remainder),
        TilingPolicy::Overlapping => {
            let mut origins = stepped(length - remainder);
            if remainder > 0 {
                origins.push(length - tile);
            }
            origins
        }
        TilingPolicy::Padding => stepped(length),
    }
}

/// All tile origins for an image, x-major.
pub fn generate_origins(
    image_width: u32,
    image_height: u32,
    tile_width: u32,
    tile_height: u32,
    policy: TilingPolicy,
) -> Result<Vec<(i64, i64)>, ConfigError> {
    check_tile_size(tile_width, tile_height)?;

    let xs = axis_origins(image_width, tile_width, policy);
    let ys = axis_origins(image_height, tile_height, policy);

    Ok(xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .collect())
}

/// [`generate_origins`] wrapped into [`TileSpec`]s.
pub fn tile_specs(
    image_width: u32,
    image_height: u32,
    tile_width: u32,
    tile_height: u32,
    policy: TilingPolicy,
) -> Result<Vec<TileSpec>, ConfigError> {
    Ok(
        generate_origins(image_width, image_height, tile_width, tile_height, policy)?
            .into_iter()
            .map(|(x, y)| TileSpec::new(x, y, tile_width, tile_height))
            .collect(),
    )
}

/// Reject zero tile dimensions.
pub fn check_tile_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidTileSize { width, height });
    }
    Ok(())
}
