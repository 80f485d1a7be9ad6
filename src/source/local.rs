//! Filesystem image source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;

use super::{decode_image, ImageSource};
use crate::error::SourceError;

/// Loads images from the local filesystem.
///
/// Identifiers are paths. With a root directory set, relative identifiers
/// are resolved against it.
#[derive(Debug, Clone, Default)]
pub struct LocalImageSource {
    root: Option<PathBuf>,
}

impl LocalImageSource {
    /// Source resolving identifiers against the working directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Source resolving relative identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Path an identifier resolves to.
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(identifier),
            None => Path::new(identifier).to_path_buf(),
        }
    }
}

#[async_trait]
impl ImageSource for LocalImageSource {
    async fn load(&self, identifier: &str) -> Result<RgbImage, SourceError> {
        let path = self.resolve(identifier);

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io(format!("{}: {}", path.display(), e)),
        })?;

        decode_image(&bytes)
    }
}
