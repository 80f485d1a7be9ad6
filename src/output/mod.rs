//! Persisting tile sets.
//!
//! Tiles are written as JPEG files named after their layout position, and
//! their annotations as one COCO-style JSON document:
//!
//! ```json
//! {
//!   "images":      [{"id": 1, "width": 400, "height": 500, "file_name": "tiled_..."}],
//!   "annotations": [{"id": 1, "image_id": 1, "category_id": 12,
//!                    "segmentation": [[...]], "bbox": [x, y, w, h],
//!                    "area": 123.0, "iscrowd": 0}],
//!   "categories":  [{"id": 12, "name": "12"}]
//! }
//! ```

mod visualize;

pub use visualize::{draw_annotations, write_visualizations, DEFAULT_MARKER_COLOR, DEFAULT_MARKER_RADIUS};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::BBox;
use crate::error::OutputError;
use crate::tile::{JpegTileEncoder, TileSet};

/// Default name of the annotation document.
pub const ANNOTATIONS_FILE: &str = "annotations.json";

// =============================================================================
// COCO Document
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u64,
    pub segmentation: Vec<Vec<f64>>,
    pub bbox: BBox,
    pub area: f64,
    pub iscrowd: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u64,
    pub name: String,
}

/// Dataset document describing a tile set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CocoDocument {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

impl CocoDocument {
    /// Build the document for a tile set.
    ///
    /// Image and annotation ids are 1-based and follow tile order. Category
    /// names are not known here, so each category is named after its id.
    pub fn from_tiles(tiles: &TileSet) -> Self {
        let mut doc = CocoDocument::default();
        let mut category_ids = BTreeSet::new();

        for (index, tile) in tiles.tiles().enumerate() {
            let image_id = index as u64 + 1;
            doc.images.push(CocoImage {
                id: image_id,
                width: tile.metadata.width,
                height: tile.metadata.height,
                file_name: tile.metadata.file_name.clone(),
            });

            for ann in tile.annotations {
                category_ids.insert(ann.category_id);
                doc.annotations.push(CocoAnnotation {
                    id: doc.annotations.len() as u64 + 1,
                    image_id,
                    category_id: ann.category_id,
                    segmentation: vec![ann.segmentation.clone()],
                    bbox: ann.bbox,
                    area: ann.area,
                    iscrowd: ann.iscrowd,
                });
            }
        }

        doc.categories = category_ids
            .into_iter()
            .map(|id| CocoCategory {
                id,
                name: id.to_string(),
            })
            .collect();

        doc
    }
}

// =============================================================================
// Writers
// =============================================================================

/// Write every tile raster into `dir` under its file name.
///
/// Returns the written paths in tile order.
pub fn write_tiles(
    tiles: &TileSet,
    dir: &Path,
    encoder: &JpegTileEncoder,
) -> Result<Vec<PathBuf>, OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::Io(format!("{}: {}", dir.display(), e)))?;

    let mut written = Vec::with_capacity(tiles.len());
    for (raster, file_name) in tiles.files() {
        let path = dir.join(file_name);
        let jpeg = encoder.encode(raster)?;
        fs::write(&path, &jpeg).map_err(|e| OutputError::Io(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = jpeg.len(), "Wrote tile");
        written.push(path);
    }

    Ok(written)
}

/// Write the COCO document for a tile set to `path`.
pub fn write_coco(tiles: &TileSet, path: &Path) -> Result<CocoDocument, OutputError> {
    let doc = CocoDocument::from_tiles(tiles);
    let json =
        serde_json::to_string_pretty(&doc).map_err(|e| OutputError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| OutputError::Io(format!("{}: {}", parent.display(), e)))?;
    }
    fs::write(path, json).map_err(|e| OutputError::Io(format!("{}: {}", path.display(), e)))?;

    Ok(doc)
}
