use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};
use veto_core::{MapPool, VetoError};

pub const DEFAULT_POOL_FILE: &str = "cfg/bot_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid map pool in {path}: {source}")]
    InvalidPool { path: PathBuf, source: VetoError },
}

/// Map pool file, `{"maps": [...]}`.
///
/// Keys other than `maps` are kept as-is so that rewriting the file after a
/// replacement does not drop settings owned by other tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapPoolConfig {
    pub maps: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MapPoolConfig {
    pub fn new(maps: Vec<String>) -> Self {
        Self {
            maps,
            extra: serde_json::Map::new(),
        }
    }

    /// Read and validate the pool file.
    ///
    /// Unlike most settings there is no usable default: a missing or broken
    /// pool file is an error.
    pub async fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.pool(path)?;
        debug!(path = %path.display(), maps = config.maps.len(), "Map pool loaded");
        Ok(config)
    }

    pub async fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).await.map_err(write_err)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, content).await.map_err(write_err)?;
        debug!(path = %path.display(), "Map pool saved");
        Ok(())
    }

    /// Validated, normalised pool built from `maps`.
    pub fn pool(&self, path: &Path) -> Result<MapPool, ConfigError> {
        MapPool::new(&self.maps).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Map pool rejected");
            ConfigError::InvalidPool {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
