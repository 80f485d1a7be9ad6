//! Test utilities for integration tests.
//!
//! Helpers for building synthetic images, encoded image buffers and
//! annotation sets.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use image_tiler::{BBox, SourceAnnotation};

// =============================================================================
// Images
// =============================================================================

/// RGB image whose red and green channels encode the pixel position.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Solid-color image.
pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Encode an image as PNG. Lossless, so decoded pixels can be compared exactly.
pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

/// Encode an image as JPEG.
pub fn encode_jpeg(image: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode_image(image)
        .unwrap();
    buf
}

/// Check if data starts with the JPEG SOI marker.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

// =============================================================================
// Annotations
// =============================================================================

/// Box annotation covering the whole image.
pub fn full_image_annotation(category_id: u64, width: u32, height: u32) -> SourceAnnotation {
    SourceAnnotation::from_bbox(
        category_id,
        BBox::new(0.0, 0.0, width as f64, height as f64),
    )
}

/// Polygons from a labelled 2500x1600 field scene.
pub fn scene_annotations() -> Vec<SourceAnnotation> {
    [
        vec![13.0, 885.0, 987.0, 12.0, 947.0, 12.0, 13.0, 855.0],
        vec![1102.0, 12.0, 13.0, 1423.0, 13.0, 976.0],
        vec![241.0, 1345.0, 174.0, 1589.0, 13.0, 1589.0],
        vec![2488.0, 12.0, 2285.0, 253.0, 2335.0, 12.0],
        vec![2488.0, 155.0, 1478.0, 1589.0, 2488.0, 545.0],
        vec![2488.0, 690.0, 1636.0, 1589.0, 1683.0, 1589.0, 2488.0, 717.0],
        vec![2488.0, 929.0, 2003.0, 1589.0, 2488.0, 1584.0],
    ]
    .into_iter()
    .map(|ring| SourceAnnotation::from_segmentation(12, ring))
    .collect()
}
