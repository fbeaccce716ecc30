//! Loading configuration, mappings and scripts from disk

use crate::error::ConfigError;
use crate::script::Script;
use mockstate_stub::{MockstateConfig, StubMapping};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// WireMock-style mapping file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingsFile {
    /// Stub mappings in registration order
    #[serde(default)]
    pub mappings: Vec<StubMapping>,
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load TOML configuration
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is unreadable or malformed.
pub fn load_config(path: &Path) -> Result<MockstateConfig, ConfigError> {
    let text = read(path)?;
    let config = toml::from_str(&text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load stub mappings
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is unreadable or malformed.
pub fn load_mappings(path: &Path) -> Result<Vec<StubMapping>, ConfigError> {
    let text = read(path)?;
    let file: MappingsFile =
        serde_json::from_str(&text).map_err(|source| ConfigError::Mappings {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        "Loaded {} mappings from {}",
        file.mappings.len(),
        path.display()
    );
    Ok(file.mappings)
}

/// Load replay script
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is unreadable or malformed.
pub fn load_script(path: &Path) -> Result<Script, ConfigError> {
    let text = read(path)?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Script {
        path: path.to_path_buf(),
        source,
    })
}
