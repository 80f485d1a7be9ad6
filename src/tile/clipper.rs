//! Per-tile annotation clipping.
//!
//! For one tile and one source annotation the clipper:
//!
//! 1. Builds the annotation polygon in source pixels once, repairing it if
//!    its ring crosses itself ([`AnnotationClipper::prepare`]), and the tile
//!    rectangle per tile.
//! 2. Intersects the two and matches on the [`Intersection`] variant.
//! 3. Translates a single-polygon result into tile-local coordinates.
//! 4. Clamps the coordinates into the tile and derives bbox and area.
//! 5. Drops the result if the bbox fails [`bbox_is_valid`].
//!
//! Geometry faults never escape [`AnnotationClipper::clip`]. They are logged
//! and the annotation is dropped for that tile only.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use tracing::warn;

use crate::annotation::{ClippedAnnotation, SourceAnnotation};
use crate::error::GeometryError;
use crate::geometry::{
    bbox_is_valid, clamp_to_tile, polygon_area, polygon_to_bbox, GeoEngine, GeometryEngine,
    Intersection,
};
use crate::layout::TileSpec;

/// A source annotation as valid polygon geometry in source-image pixels.
///
/// Built once per annotation and clipped against every tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAnnotation {
    pub category_id: u64,
    shape: MultiPolygon<f64>,
}

impl PreparedAnnotation {
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

/// Clips source annotations against tiles.
#[derive(Debug, Clone, Default)]
pub struct AnnotationClipper<E = GeoEngine> {
    pub(crate) engine: E,
}

impl AnnotationClipper<GeoEngine> {
    pub fn new() -> Self {
        Self { engine: GeoEngine }
    }
}

impl<E: GeometryEngine> AnnotationClipper<E> {
    /// Create a clipper using a custom geometry engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Turn an annotation into valid geometry, repairing its ring if it
    /// crosses itself.
    pub fn prepare(&self, annotation: &SourceAnnotation) -> Result<PreparedAnnotation, GeometryError> {
        let ring = annotation.ring()?;

        if ring.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        let open_len = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if ring.len() > 1 && first == last => ring.len() - 1,
            _ => ring.len(),
        };
        if open_len < 3 {
            return Err(GeometryError::TooFewPoints(open_len));
        }

        let polygon = Polygon::new(LineString::from(ring), vec![]);
        let shape = if self.engine.is_valid(&polygon) {
            MultiPolygon::new(vec![polygon])
        } else {
            self.engine.repair(polygon)?
        };

        Ok(PreparedAnnotation {
            category_id: annotation.category_id,
            shape,
        })
    }

    /// Prepare every annotation, keeping the usable ones in input order.
    ///
    /// Annotations with bad geometry are logged and left out.
    pub fn prepare_all(&self, annotations: &[SourceAnnotation]) -> Vec<PreparedAnnotation> {
        annotations
            .iter()
            .filter_map(|annotation| match self.prepare(annotation) {
                Ok(prepared) => Some(prepared),
                Err(e) => {
                    warn!(
                        category_id = annotation.category_id,
                        error = %e,
                        "Dropping annotation with unusable geometry"
                    );
                    None
                }
            })
            .collect()
    }

    /// Clip one annotation to one tile.
    ///
    /// Returns `None` when the annotation does not survive: no overlap, a
    /// degenerate overlap, a bbox that fails validation, or a geometry fault.
    pub fn clip(&self, tile: &TileSpec, annotation: &SourceAnnotation) -> Option<ClippedAnnotation> {
        let prepared = self.prepare_all(std::slice::from_ref(annotation));
        prepared
            .first()
            .and_then(|prepared| self.clip_prepared(tile, prepared))
    }

    /// Clip one prepared annotation to one tile.
    pub fn clip_prepared(
        &self,
        tile: &TileSpec,
        annotation: &PreparedAnnotation,
    ) -> Option<ClippedAnnotation> {
        match self.try_clip(tile, annotation) {
            Ok(clipped) => clipped,
            Err(e) => {
                warn!(
                    category_id = annotation.category_id,
                    origin_x = tile.origin_x,
                    origin_y = tile.origin_y,
                    error = %e,
                    "Dropping annotation for tile"
                );
                None
            }
        }
    }

    /// Clip prepared annotations to one tile, keeping the survivors in order.
    pub fn clip_all(
        &self,
        tile: &TileSpec,
        annotations: &[PreparedAnnotation],
    ) -> Vec<ClippedAnnotation> {
        annotations
            .iter()
            .filter_map(|annotation| self.clip_prepared(tile, annotation))
            .collect()
    }

    fn try_clip(
        &self,
        tile: &TileSpec,
        annotation: &PreparedAnnotation,
    ) -> Result<Option<ClippedAnnotation>, GeometryError> {
        let boundary = tile_polygon(tile);

        let segmentation = match self.engine.intersect(&boundary, &annotation.shape)? {
            Intersection::Empty | Intersection::Line(_) => return Ok(None),
            Intersection::Polygon(polygon) => flatten_ring(
                polygon.exterior(),
                tile.origin_x as f64,
                tile.origin_y as f64,
            ),
            // Parts stay in source-image coordinates
            Intersection::MultiPolygon(parts) => parts
                .iter()
                .flat_map(|part| flatten_ring(part.exterior(), 0.0, 0.0))
                .collect(),
        };

        if segmentation.is_empty() {
            return Ok(None);
        }

        let segmentation = clamp_to_tile(&segmentation, tile.width, tile.height)?;
        let bbox = polygon_to_bbox(&segmentation)?;
        if !bbox_is_valid(&bbox, tile.width, tile.height) {
            return Ok(None);
        }
        let area = polygon_area(&segmentation)?;

        Ok(Some(ClippedAnnotation {
            category_id: annotation.category_id,
            segmentation,
            bbox,
            area,
            iscrowd: 0,
        }))
    }
}

/// Closed rectangle covering the tile, in source-image coordinates.
pub fn tile_polygon(tile: &TileSpec) -> Polygon<f64> {
    let (x0, y0) = (tile.origin_x as f64, tile.origin_y as f64);
    let (x1, y1) = (tile.end_x() as f64, tile.end_y() as f64);
    Polygon::new(
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    )
}

fn flatten_ring(ring: &LineString<f64>, offset_x: f64, offset_y: f64) -> Vec<f64> {
    ring.coords()
        .flat_map(|&Coord { x, y }| [x - offset_x, y - offset_y])
        .collect()
}
