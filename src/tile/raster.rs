//! Raster cropping.

use image::{imageops, Rgb, RgbImage};

/// Fill color for tile regions outside the source image.
pub const DEFAULT_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Crop a `width` x `height` region starting at `(x, y)`.
///
/// The region may extend past any edge of the source, or start at a
/// negative offset. Pixels with no source counterpart are set to `fill`.
pub fn crop_padded(
    image: &RgbImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    fill: Rgb<u8>,
) -> RgbImage {
    let mut tile = RgbImage::from_pixel(width, height, fill);
    imageops::replace(&mut tile, image, -x, -y);
    tile
}
