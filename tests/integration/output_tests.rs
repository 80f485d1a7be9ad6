//! Output tests.
//!
//! Tests verify:
//! - Tiles are written as JPEG under their layout file names
//! - The COCO document references every tile and annotation
//! - Debug renderings are written alongside

use image::GenericImageView;
use image_tiler::output::{write_visualizations, CocoDocument, ANNOTATIONS_FILE};
use image_tiler::{write_coco, write_tiles, JpegTileEncoder, TileBuilder, TilingPolicy};

use super::test_utils::{full_image_annotation, gradient_image, is_valid_jpeg};

#[test]
fn test_write_tiles_and_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
    let image = gradient_image(1000, 1000);
    let tiles = builder
        .build_with_policy(&image, "scene", &[full_image_annotation(1, 1000, 1000)])
        .unwrap();

    let encoder = JpegTileEncoder::new();
    let written = write_tiles(&tiles, dir.path(), &encoder).unwrap();
    assert_eq!(written.len(), 6);

    for (path, meta) in written.iter().zip(tiles.images()) {
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), meta.file_name);
        let data = std::fs::read(path).unwrap();
        assert!(is_valid_jpeg(&data));
        assert_eq!(image::load_from_memory(&data).unwrap().dimensions(), (400, 500));
    }

    let doc_path = dir.path().join(ANNOTATIONS_FILE);
    write_coco(&tiles, &doc_path).unwrap();

    let doc: CocoDocument =
        serde_json::from_str(&std::fs::read_to_string(&doc_path).unwrap()).unwrap();
    assert_eq!(doc.images.len(), 6);
    assert_eq!(doc.annotations.len(), 6);
    assert_eq!(doc.categories.len(), 1);

    for (image, ann) in doc.images.iter().zip(&doc.annotations) {
        assert_eq!(ann.image_id, image.id);
        assert_eq!(ann.segmentation.len(), 1);
        assert_eq!(ann.iscrowd, 0);
    }
}

#[test]
fn test_write_coco_creates_parent_dir() {
    let dir = tempfile::tempdir().unwrap();
    let builder = TileBuilder::new(50, 50, TilingPolicy::Default).unwrap();
    let tiles = builder
        .build_with_policy(&gradient_image(100, 100), "img", &[])
        .unwrap();

    let path = dir.path().join("nested").join("coco.json");
    let doc = write_coco(&tiles, &path).unwrap();
    assert!(path.exists());
    assert_eq!(doc.images.len(), 4);
    assert!(doc.annotations.is_empty());
}

#[test]
fn test_write_visualizations() {
    let dir = tempfile::tempdir().unwrap();
    let builder = TileBuilder::new(50, 50, TilingPolicy::Default).unwrap();
    let tiles = builder
        .build_with_policy(&gradient_image(100, 50), "img", &[full_image_annotation(1, 100, 50)])
        .unwrap();

    let count = write_visualizations(&tiles, dir.path(), &JpegTileEncoder::new()).unwrap();
    assert_eq!(count, 2);
    assert!(dir.path().join("debug_tiled_img_0_0---50_50.jpg").exists());
    assert!(dir.path().join("debug_tiled_img_50_0---100_50.jpg").exists());
}
