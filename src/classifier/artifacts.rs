use crate::classifier::network::DenseNetwork;
use crate::classifier::scaler::StandardScaler;
use crate::error::{CropSenseError, Result};
use std::path::Path;

pub const NETWORK_FILE: &str = "network.json";
pub const COLUMNS_FILE: &str = "columns.json";
pub const SCALER_FILE: &str = "scaler.json";

/// The three frozen artifacts exported by the training pipeline: the
/// dense network, the ordered training-column list, and the fitted
/// scaler. All three must load, or the classifier cannot be built.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub network: DenseNetwork,
    pub columns: Vec<String>,
    pub scaler: StandardScaler,
}

impl ModelArtifacts {
    pub fn load(dir: &Path) -> Result<Self> {
        let network: DenseNetwork = read_json(&dir.join(NETWORK_FILE))?;
        let columns: Vec<String> = read_json(&dir.join(COLUMNS_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;

        network.validate()?;
        scaler.validate()?;
        if columns.is_empty() {
            return Err(CropSenseError::ArtifactLoad(
                "columns.json lists no training columns".into(),
            ));
        }

        Ok(Self {
            network,
            columns,
            scaler,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CropSenseError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| CropSenseError::ArtifactLoad(format!("{}: {}", path.display(), e)))
}
