pub mod compare;
pub mod snapshot;
pub mod validate;

use std::path::Path;

use clap::ValueEnum;
use layercheck_core::{EngineConfig, LayerCheckError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn read_file(path: &Path) -> Result<String, LayerCheckError> {
    std::fs::read_to_string(path).map_err(|e| LayerCheckError::Io {
        action: "read",
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), LayerCheckError> {
    std::fs::write(path, contents).map_err(|e| LayerCheckError::Io {
        action: "write",
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Defaults when no config file is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig, LayerCheckError> {
    match path {
        Some(p) => EngineConfig::from_toml_str(&read_file(p)?),
        None => Ok(EngineConfig::default()),
    }
}
