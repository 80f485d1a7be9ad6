//! End-to-end tiling tests.
//!
//! Tests verify:
//! - Tile counts and order for every layout policy
//! - Annotations are clipped into each tile they overlap
//! - Output sequences stay aligned
//! - Bad geometry never aborts a run

use image_tiler::{
    generate_origins, BBox, SourceAnnotation, TileBuilder, TileSpec, TilingPolicy,
};

use super::test_utils::{full_image_annotation, gradient_image, scene_annotations, solid_image};

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_full_image_box_overlapping() {
    let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
    let image = solid_image(1000, 1000, [10, 20, 30]);
    let annotations = vec![full_image_annotation(1, 1000, 1000)];

    let tiles = builder.build_with_policy(&image, "scene", &annotations).unwrap();
    assert_eq!(tiles.len(), 6);

    let origins: Vec<(i64, i64)> = builder
        .layout(1000, 1000)
        .unwrap()
        .iter()
        .map(|s| (s.origin_x, s.origin_y))
        .collect();
    assert_eq!(
        origins,
        vec![(0, 0), (0, 500), (400, 0), (400, 500), (600, 0), (600, 500)]
    );

    for tile in tiles.tiles() {
        assert_eq!(tile.annotations.len(), 1, "{}", tile.file_name);
        let ann = &tile.annotations[0];
        assert_eq!(ann.category_id, 1);
        assert_eq!(ann.iscrowd, 0);
        assert_eq!(ann.bbox, BBox::new(1.0, 1.0, 398.0, 498.0));
        assert_eq!(ann.area, 398.0 * 498.0);
    }
}

#[test]
fn test_policy_tile_counts() {
    let image = gradient_image(1000, 700);

    let cases = [
        (TilingPolicy::Default, 2),
        (TilingPolicy::Overlapping, 3 * 2),
        (TilingPolicy::Padding, 3 * 2),
    ];

    for (policy, expected) in cases {
        let builder = TileBuilder::new(400, 500, policy).unwrap();
        let tiles = builder.build_with_policy(&image, "img", &[]).unwrap();
        assert_eq!(tiles.len(), expected, "{}", policy);

        let origins = generate_origins(1000, 700, 400, 500, policy).unwrap();
        assert_eq!(origins.len(), tiles.len());
    }
}

#[test]
fn test_padding_tile_crosses_image_edge() {
    let builder = TileBuilder::new(400, 500, TilingPolicy::Padding).unwrap();
    let image = gradient_image(1000, 700);
    let annotations = vec![full_image_annotation(2, 1000, 700)];

    let tiles = builder.build_with_policy(&image, "img", &annotations).unwrap();
    let last = tiles.tiles().last().unwrap();

    assert_eq!(last.file_name, "tiled_img_800_500---1200_1000.jpg");
    assert_eq!(last.raster.dimensions(), (400, 500));
    // Only 200x200 of this tile lies on the image
    assert_eq!(last.annotations.len(), 1);
    assert_eq!(last.annotations[0].bbox, BBox::new(1.0, 1.0, 199.0, 199.0));
    assert_eq!(last.raster.get_pixel(250, 250).0, [0, 0, 0]);
}

#[test]
fn test_tile_pixels_match_source() {
    let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
    let image = gradient_image(1000, 1000);

    let tiles = builder.build_with_policy(&image, "img", &[]).unwrap();
    let specs = builder.layout(1000, 1000).unwrap();

    for (spec, (raster, _)) in specs.iter().zip(tiles.files()) {
        let (x, y) = (spec.origin_x as u32, spec.origin_y as u32);
        assert_eq!(raster.get_pixel(0, 0), image.get_pixel(x, y));
        assert_eq!(raster.get_pixel(399, 499), image.get_pixel(x + 399, y + 499));
    }
}

// =============================================================================
// Clipping
// =============================================================================

#[test]
fn test_scene_annotations_stay_inside_tiles() {
    let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
    let image = solid_image(2500, 1600, [0, 0, 0]);
    let annotations = scene_annotations();

    let tiles = builder.build_with_policy(&image, "hoss", &annotations).unwrap();

    // 2500 / 400 -> 6 stepped + 1 edge; 1600 / 500 -> 3 stepped + 1 edge
    assert_eq!(tiles.len(), 7 * 4);
    assert!(tiles.annotation_count() > 0);

    for tile in tiles.tiles() {
        for ann in tile.annotations {
            assert_eq!(ann.category_id, 12);
            assert!(ann.bbox.x > 0.0 && ann.bbox.y > 0.0);
            assert!(ann.bbox.x_max() <= 400.0, "{:?}", ann.bbox);
            assert!(ann.bbox.y_max() <= 500.0, "{:?}", ann.bbox);
            assert!(ann.area >= 0.0);
            assert_eq!(ann.area, ann.bbox.width * ann.bbox.height);
        }
    }
}

#[test]
fn test_annotation_in_single_tile() {
    let builder = TileBuilder::new(100, 100, TilingPolicy::Default).unwrap();
    let image = solid_image(300, 300, [0, 0, 0]);
    let annotations = vec![SourceAnnotation::from_segmentation(
        9,
        vec![120.0, 130.0, 180.0, 130.0, 150.0, 170.0],
    )];

    let tiles = builder.build_with_policy(&image, "img", &annotations).unwrap();
    let hits: Vec<&str> = tiles
        .tiles()
        .filter(|t| !t.annotations.is_empty())
        .map(|t| t.file_name)
        .collect();
    assert_eq!(hits, vec!["tiled_img_100_100---200_200.jpg"]);

    let center = tiles
        .tiles()
        .find(|t| !t.annotations.is_empty())
        .unwrap();
    let ann = &center.annotations[0];
    assert_eq!(ann.bbox, BBox::new(20.0, 30.0, 60.0, 40.0));

    let mut points: Vec<(f64, f64)> = ann.points().collect();
    points.sort_by(|a, b| a.partial_cmp(b).unwrap());
    points.dedup();
    assert_eq!(points, vec![(20.0, 30.0), (50.0, 70.0), (80.0, 30.0)]);
}

#[test]
fn test_bad_annotations_do_not_abort() {
    let builder = TileBuilder::new(100, 100, TilingPolicy::Default).unwrap();
    let image = solid_image(200, 200, [0, 0, 0]);
    let annotations = vec![
        SourceAnnotation::from_segmentation(1, vec![1.0, 2.0, 3.0]),
        SourceAnnotation::from_segmentation(2, vec![f64::INFINITY, 0.0, 5.0, 5.0, 9.0, 0.0]),
        SourceAnnotation {
            category_id: 3,
            segmentation: None,
            bbox: None,
        },
        SourceAnnotation::from_bbox(4, BBox::new(10.0, 10.0, 150.0, 150.0)),
    ];

    let tiles = builder.build_with_policy(&image, "img", &annotations).unwrap();
    assert_eq!(tiles.len(), 4);
    assert_eq!(tiles.annotation_count(), 4);
    for anns in tiles.annotations() {
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].category_id, 4);
    }
}

#[test]
fn test_outside_annotations_produce_nothing() {
    let builder = TileBuilder::new(100, 100, TilingPolicy::Default).unwrap();
    let image = solid_image(200, 200, [0, 0, 0]);
    let annotations = vec![
        SourceAnnotation::from_bbox(1, BBox::new(500.0, 500.0, 10.0, 10.0)),
        SourceAnnotation::from_bbox(1, BBox::new(-50.0, -50.0, 10.0, 10.0)),
    ];

    let tiles = builder.build_with_policy(&image, "img", &annotations).unwrap();
    assert_eq!(tiles.len(), 4);
    assert_eq!(tiles.annotation_count(), 0);
}

#[test]
fn test_sequences_aligned_with_origins() {
    let image = gradient_image(777, 555);
    for policy in [
        TilingPolicy::Default,
        TilingPolicy::Overlapping,
        TilingPolicy::Padding,
    ] {
        let builder = TileBuilder::new(128, 96, policy).unwrap();
        let tiles = builder
            .build_with_policy(&image, "img", &scene_annotations())
            .unwrap();
        let origins = generate_origins(777, 555, 128, 96, policy).unwrap();

        assert_eq!(tiles.images().len(), origins.len());
        assert_eq!(tiles.annotations().len(), origins.len());
        assert_eq!(tiles.files().len(), origins.len());

        for ((x, y), meta) in origins.iter().zip(tiles.images()) {
            let spec = TileSpec::new(*x, *y, 128, 96);
            assert_eq!(meta.file_name, spec.file_name("img"));
            assert_eq!((meta.width, meta.height), (128, 96));
        }
    }
}

#[test]
fn test_builds_are_deterministic() {
    let builder = TileBuilder::new(400, 500, TilingPolicy::Overlapping).unwrap();
    let image = solid_image(2500, 1600, [0, 0, 0]);

    let a = builder
        .build_with_policy(&image, "hoss", &scene_annotations())
        .unwrap();
    let b = builder
        .build_with_policy(&image, "hoss", &scene_annotations())
        .unwrap();

    assert_eq!(a.images(), b.images());
    assert_eq!(a.annotations(), b.annotations());
}
