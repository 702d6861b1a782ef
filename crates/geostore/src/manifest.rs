use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::source::GeoJsonSource;
use crate::store::{GeoStore, GeoStoreBuilder};

/// Which store a data layer feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Street,
    Avenue,
    Block,
    Building,
}

impl LayerKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            LayerKind::Street => "street",
            LayerKind::Avenue => "avenue",
            LayerKind::Block => "block",
            LayerKind::Building => "building",
        }
    }
}

/// A GeoJSON file, relative to the data directory, and the layer it feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub path: PathBuf,
    pub kind: LayerKind,
}

/// `manifest.json` of a data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub layers: Vec<LayerSpec>,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "manifest.json";

    /// Read `manifest.json` from `dir`.
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::FILE_NAME);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl GeoStore {
    /// Load every layer listed in `dir/manifest.json` and build the store.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("Data directory does not exist: {}", dir.display());
        }
        let manifest = Manifest::read(dir)?;
        let mut builder = GeoStoreBuilder::new();
        for layer in &manifest.layers {
            let path = dir.join(&layer.path);
            let source = GeoJsonSource::from_path(&path)?;
            builder.load_layer(&source, layer.kind)
                .with_context(|| format!("Failed to load {} layer from {}", layer.kind.to_str(), path.display()))?;
        }
        Ok(builder.build())
    }
}
