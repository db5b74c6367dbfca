/// Asset sources: where model bytes come from
use std::path::PathBuf;

use crate::config::ExtractorConfig;
use crate::error::AssetError;
use crate::geometry::{self, ModelGeometry};

/// Supplies the raw bytes of a model asset. Passed explicitly to each load
/// so independent loads never share transport state.
pub trait AssetSource {
    /// Human-readable origin, used in logs and errors
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<u8>, AssetError>;
}

/// Bytes already in memory, e.g. handed over by a browser host
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl AssetSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, AssetError> {
        Ok(self.bytes.clone())
    }
}

/// A GLB file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AssetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, AssetError> {
        std::fs::read(&self.path).map_err(|error| AssetError::Io {
            source_name: self.describe(),
            error,
        })
    }
}

/// Fetch, then extract. Either step failing fails the whole load.
pub fn load_model(
    source: &dyn AssetSource,
    config: &ExtractorConfig,
) -> Result<ModelGeometry, AssetError> {
    log::info!("loading model from {}", source.describe());
    let bytes = source.fetch()?;
    let geometry = geometry::extract(&bytes, config)?;
    log::info!(
        "loaded {} vertices from {}",
        geometry.vertex_count(),
        source.describe()
    );
    Ok(geometry)
}
