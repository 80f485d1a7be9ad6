//! In-memory image source.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use image::RgbImage;

use super::{decode_image, ImageSource};
use crate::error::SourceError;

/// Serves encoded images held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, Bytes>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an encoded image under `name`.
    pub fn with_image(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.images.insert(name.into(), data.into());
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait]
impl ImageSource for MemoryImageSource {
    async fn load(&self, identifier: &str) -> Result<RgbImage, SourceError> {
        let data = self
            .images
            .get(identifier)
            .ok_or_else(|| SourceError::NotFound(identifier.to_string()))?;

        decode_image(data)
    }
}
