use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// String key/value metadata attached to a loaded image header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    entries: BTreeMap<String, String>,
}

impl ImageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ImageMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An image produced by an external loader: a pixel buffer with its header
/// metadata and source-file provenance. This crate only reads and clears
/// metadata entries; decoding is not its concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub name: String,
    pub metadata: ImageMetadata,
    pub pixel_data: Vec<u8>,
    pub source: PathBuf,
}

impl LoadedImage {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            metadata: ImageMetadata::new(),
            pixel_data: Vec::new(),
            source: source.into(),
        }
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_pixel_data(mut self, pixel_data: Vec<u8>) -> Self {
        self.pixel_data = pixel_data;
        self
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// The external on-disk writer. Implementations own the output format; the
/// sanitization core only guarantees the metadata handed over here has passed
/// one sanitization sweep.
pub trait ImageWriter {
    /// Persists the image under `output_directory` and returns the path of
    /// the written file.
    fn write(&self, image: &LoadedImage, output_directory: &Path) -> Result<PathBuf, WriteError>;
}
