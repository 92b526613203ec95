use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use server::config::DEFAULT_POOL_FILE;
use veto_core::UserId;

pub const CONFIG_FILE: &str = "map-veto.toml";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_MAPS: [&str; 7] = [
    "haven", "bind", "split", "ascent", "icebox", "breeze", "fracture",
];

/// Contents of `map-veto.toml`. Every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VetoConfig {
    pub server: ServerConfig,
    pub pool: PoolConfig,
    pub veto: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// JSON file holding the `maps` array, relative to the working directory
    pub path: PathBuf,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_POOL_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cancel vetoes with no action for this long. Unset keeps them until
    /// completed or cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,
    /// Users allowed to start or cancel vetoes and edit the pool. Empty
    /// leaves those operations open to anyone.
    pub organizers: Vec<UserId>,
}

impl VetoConfig {
    /// Reads `path`, falling back to defaults when it does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = VetoConfig::load(&temp_dir.path().join(CONFIG_FILE))
            .await
            .unwrap();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.pool.path, PathBuf::from("cfg/bot_config.json"));
        assert!(config.veto.idle_timeout_secs.is_none());
        assert!(config.veto.organizers.is_empty());
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[server]\nport = 8080\n\n[veto]\nidle_timeout_secs = 900\n").unwrap();

        let config = VetoConfig::load(&path).await.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.veto.idle_timeout_secs, Some(900));
    }

    #[tokio::test]
    async fn test_load_organizers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[veto]\norganizers = [1, 2]\n").unwrap();

        let config = VetoConfig::load(&path).await.unwrap();
        assert_eq!(config.veto.organizers, vec![1, 2]);
        assert!(config.veto.idle_timeout_secs.is_none());
    }

    #[tokio::test]
    async fn test_write_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);

        let mut config = VetoConfig::default();
        config.pool.path = PathBuf::from("maps.json");
        config.veto.organizers = vec![42];
        config.write(&path).await.unwrap();

        let loaded = VetoConfig::load(&path).await.unwrap();
        assert_eq!(loaded.pool.path, PathBuf::from("maps.json"));
        assert_eq!(loaded.veto.organizers, vec![42]);
    }

    #[tokio::test]
    async fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(VetoConfig::load(&path).await.is_err());
    }
}
