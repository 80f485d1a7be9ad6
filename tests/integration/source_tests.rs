//! Image source tests.
//!
//! Tests verify:
//! - Images load from memory and from disk
//! - Missing images surface as NotFound
//! - The tile service names tiles after the source file

use image_tiler::{
    BBox, ImageSource, LocalImageSource, MemoryImageSource, SourceAnnotation, SourceError,
    TileBuilder, TileService, TilingError, TilingPolicy,
};

use super::test_utils::{encode_jpeg, encode_png, full_image_annotation, gradient_image};

#[tokio::test]
async fn test_memory_source_round_trip() {
    let image = gradient_image(64, 48);
    let source = MemoryImageSource::new().with_image("scene.png", encode_png(&image));

    let loaded = source.load("scene.png").await.unwrap();
    assert_eq!(loaded, image);
}

#[tokio::test]
async fn test_local_source_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = gradient_image(32, 32);
    std::fs::write(dir.path().join("scene.png"), encode_png(&image)).unwrap();

    let source = LocalImageSource::with_root(dir.path());
    let loaded = source.load("scene.png").await.unwrap();
    assert_eq!(loaded, image);
}

#[tokio::test]
async fn test_local_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = LocalImageSource::with_root(dir.path());

    match source.load("missing.jpg").await {
        Err(SourceError::NotFound(_)) => {}
        other => panic!("Expected NotFound, got {:?}", other.map(|i| i.dimensions())),
    }
}

#[tokio::test]
async fn test_service_tiles_named_after_source() {
    let image = gradient_image(200, 100);
    let source = MemoryImageSource::new().with_image("scenes/field.v1.jpg", encode_jpeg(&image));
    let builder = TileBuilder::new(100, 100, TilingPolicy::Default).unwrap();
    let service = TileService::new(source, builder);

    let annotations = vec![full_image_annotation(5, 200, 100)];
    let tiles = service
        .tile_image("scenes/field.v1.jpg", &annotations)
        .await
        .unwrap();

    let names: Vec<&str> = tiles.images().iter().map(|m| m.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "tiled_field_0_0---100_100.jpg",
            "tiled_field_100_0---200_100.jpg"
        ]
    );
    assert_eq!(tiles.annotation_count(), 2);
}

#[tokio::test]
async fn test_service_missing_image_is_fatal() {
    let builder = TileBuilder::new(100, 100, TilingPolicy::Default).unwrap();
    let service = TileService::new(MemoryImageSource::new(), builder);

    let result = service.tile_image("nope.jpg", &[]).await;
    assert!(matches!(
        result,
        Err(TilingError::Source(SourceError::NotFound(_)))
    ));
}

#[test]
fn test_service_tile_bytes() {
    let image = gradient_image(300, 300);
    let builder = TileBuilder::new(128, 128, TilingPolicy::Overlapping).unwrap();
    let service = TileService::new(MemoryImageSource::new(), builder);

    let annotations = vec![SourceAnnotation::from_bbox(
        1,
        BBox::new(100.0, 100.0, 50.0, 50.0),
    )];
    let tiles = service
        .tile_bytes(&encode_png(&image), "buffer", &annotations)
        .unwrap();

    // 300 / 128 -> origins 0, 128 plus edge 172 on each axis
    assert_eq!(tiles.len(), 9);
    assert!(tiles.images()[0].file_name.starts_with("tiled_buffer_0_0---"));
    assert!(tiles.annotation_count() >= 1);
}

#[test]
fn test_service_tile_bytes_undecodable() {
    let builder = TileBuilder::new(128, 128, TilingPolicy::Default).unwrap();
    let service = TileService::new(MemoryImageSource::new(), builder);

    let result = service.tile_bytes(&[1, 2, 3], "junk", &[]);
    assert!(matches!(
        result,
        Err(TilingError::Source(SourceError::Decode(_)))
    ));
}
