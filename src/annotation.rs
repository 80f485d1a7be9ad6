//! Annotation records.
//!
//! [`SourceAnnotation`] is the input shape, deserialized from COCO-style JSON.
//! [`ClippedAnnotation`] is the per-tile output produced by the clipper.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeometryError};

/// Axis-aligned bounding box `(x, y, width, height)`.
///
/// Serialized as a 4-element array, the way COCO stores boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Closed 5-point ring tracing the box clockwise from its origin.
    pub fn to_ring(&self) -> Vec<(f64, f64)> {
        let (x_min, y_min) = (self.x, self.y);
        let (x_max, y_max) = (self.x_max(), self.y_max());
        vec![
            (x_min, y_min),
            (x_max, y_min),
            (x_max, y_max),
            (x_min, y_max),
            (x_min, y_min),
        ]
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

// =============================================================================
// Source Annotation
// =============================================================================

/// An annotation on the full source image.
///
/// `segmentation` follows COCO: a list of flat rings `[[x0, y0, x1, y1, ...]]`.
/// Only the first ring is used. When it is absent or empty the `bbox` is
/// used instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAnnotation {
    pub category_id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

impl SourceAnnotation {
    /// Annotation outlined by a single flat polygon ring.
    pub fn from_segmentation(category_id: u64, ring: Vec<f64>) -> Self {
        Self {
            category_id,
            segmentation: Some(vec![ring]),
            bbox: None,
        }
    }

    /// Annotation described only by its bounding box.
    pub fn from_bbox(category_id: u64, bbox: BBox) -> Self {
        Self {
            category_id,
            segmentation: None,
            bbox: Some(bbox),
        }
    }

    /// The authoritative outline as a list of points.
    ///
    /// The segmentation ring wins when present and non-empty. Otherwise the
    /// bbox is expanded into a closed rectangle.
    pub fn ring(&self) -> Result<Vec<(f64, f64)>, GeometryError> {
        let segmentation = self
            .segmentation
            .as_ref()
            .and_then(|rings| rings.first())
            .filter(|ring| !ring.is_empty());

        match (segmentation, self.bbox) {
            (Some(flat), _) => {
                let (xs, ys) = crate::geometry::extract_xy(flat)?;
                Ok(xs.into_iter().zip(ys).collect())
            }
            (None, Some(bbox)) => Ok(bbox.to_ring()),
            (None, None) => Err(GeometryError::MissingShape),
        }
    }
}

// =============================================================================
// Clipped Annotation
// =============================================================================

/// An annotation re-projected into one tile.
///
/// `segmentation` is a flat `[x0, y0, x1, y1, ...]` list in tile-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClippedAnnotation {
    pub category_id: u64,
    pub segmentation: Vec<f64>,
    pub bbox: BBox,
    pub area: f64,
    pub iscrowd: u8,
}

impl ClippedAnnotation {
    /// Iterate the segmentation as `(x, y)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.segmentation
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

// =============================================================================
// Annotation Files
// =============================================================================

/// Accepted layouts of an annotation file.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationFile {
    List(Vec<SourceAnnotation>),
    Coco { annotations: Vec<SourceAnnotation> },
}

/// Parse source annotations from JSON.
///
/// Accepts either a bare array of annotation records or a COCO document,
/// in which case its `annotations` array is used.
pub fn parse_annotations(json: &str) -> Result<Vec<SourceAnnotation>, ConfigError> {
    let file: AnnotationFile = serde_json::from_str(json)
        .map_err(|e| ConfigError::Invalid(format!("annotations: {}", e)))?;

    Ok(match file {
        AnnotationFile::List(annotations) => annotations,
        AnnotationFile::Coco { annotations } => annotations,
    })
}
