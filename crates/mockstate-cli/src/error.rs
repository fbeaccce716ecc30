//! Error types for loading replay inputs

use std::path::PathBuf;

/// Unreadable or malformed input file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML configuration is malformed
    #[error("invalid configuration in {path}: {source}")]
    Toml {
        /// Offending file
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// Mapping file is malformed
    #[error("invalid mappings in {path}: {source}")]
    Mappings {
        /// Offending file
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Replay script is malformed
    #[error("invalid script in {path}: {source}")]
    Script {
        /// Offending file
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// File the error refers to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Toml { path, .. }
            | Self::Mappings { path, .. }
            | Self::Script { path, .. } => path,
        }
    }
}
