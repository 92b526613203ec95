use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use events::{Event, EventBus};
use registry::SessionRegistry;
use tokio::sync::RwLock;
use tracing::{info, warn};
use veto_core::{MapPool, UserId, VetoError};

use crate::config::{ConfigError, MapPoolConfig};

#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub event_bus: EventBus,
    pub map_pool: MapPoolStore,
    organizers: Arc<BTreeSet<UserId>>,
}

impl AppState {
    pub fn new(map_pool: MapPoolStore) -> Self {
        let event_bus = EventBus::new();
        let registry = SessionRegistry::new().with_event_bus(event_bus.clone());
        let map_pool = map_pool.with_event_bus(event_bus.clone());

        Self {
            registry,
            event_bus,
            map_pool,
            organizers: Arc::new(BTreeSet::new()),
        }
    }

    /// Users allowed to start and cancel vetoes and to edit the map pool.
    ///
    /// With no organizers configured these operations are open to everyone.
    pub fn with_organizers(mut self, organizers: impl IntoIterator<Item = UserId>) -> Self {
        self.organizers = Arc::new(organizers.into_iter().collect());
        self
    }

    pub fn organizers(&self) -> &BTreeSet<UserId> {
        &self.organizers
    }

    pub fn authorize_organizer(&self, actor: UserId) -> Result<(), VetoError> {
        if self.organizers.is_empty() || self.organizers.contains(&actor) {
            Ok(())
        } else {
            warn!(actor = %actor, "Organizer-only operation refused");
            Err(VetoError::NotOrganizer { actor })
        }
    }

    /// State backed by the pool file at `pool_path`.
    pub async fn load(pool_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self::new(MapPoolStore::load(pool_path).await?))
    }
}

struct PoolEntry {
    config: MapPoolConfig,
    pool: MapPool,
}

/// The configured map pool, shared by all channels and persisted on change.
#[derive(Clone)]
pub struct MapPoolStore {
    path: Arc<PathBuf>,
    entry: Arc<RwLock<PoolEntry>>,
    event_bus: Option<EventBus>,
}

impl MapPoolStore {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = MapPoolConfig::read(&path).await?;
        Self::from_config(path, config)
    }

    pub fn from_config(path: PathBuf, config: MapPoolConfig) -> Result<Self, ConfigError> {
        let pool = config.pool(&path)?;
        Ok(Self {
            path: Arc::new(path),
            entry: Arc::new(RwLock::new(PoolEntry { config, pool })),
            event_bus: None,
        })
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn current(&self) -> MapPool {
        self.entry.read().await.pool.clone()
    }

    /// Replaces one entry, writes the file, and only then swaps the in-memory
    /// pool. Returns the normalised old and new names plus the updated pool.
    ///
    /// Running vetoes keep the pool they were started with.
    pub async fn replace(
        &self,
        old: &str,
        new: &str,
    ) -> Result<(String, String, MapPool), ConfigError> {
        let mut entry = self.entry.write().await;

        let mut pool = entry.pool.clone();
        let replaced = pool
            .replace(old, new)
            .map_err(|source| ConfigError::InvalidPool {
                path: self.path.to_path_buf(),
                source,
            })?;

        let mut config = entry.config.clone();
        config.maps = pool.maps().to_vec();
        if let Err(e) = config.write(&self.path).await {
            self.emit(Event::Error {
                message: e.to_string(),
                context: Some("pool.replace".to_string()),
            });
            return Err(e);
        }

        let new_name = veto_core::normalize_map_name(new);
        info!(
            old_map = %replaced,
            new_map = %new_name,
            path = %self.path.display(),
            "Map pool entry replaced"
        );

        entry.config = config;
        entry.pool = pool.clone();
        drop(entry);

        self.emit(Event::MapReplaced {
            old_map: replaced.clone(),
            new_map: new_name.clone(),
        });

        Ok((replaced, new_name, pool))
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = &self.event_bus {
            bus.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store(temp_dir: &TempDir) -> MapPoolStore {
        let path = temp_dir.path().join("bot_config.json");
        MapPoolConfig::new(vec!["haven".into(), "bind".into(), "ascent".into()])
            .write(&path)
            .await
            .unwrap();
        MapPoolStore::load(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_replace_persists_and_emits() {
        let temp_dir = TempDir::new().unwrap();
        let bus = EventBus::new();
        let store = store(&temp_dir).await.with_event_bus(bus.clone());
        let mut rx = bus.subscribe();

        let (old, new, pool) = store.replace("BIND", " Lotus ").await.unwrap();
        assert_eq!(old, "bind");
        assert_eq!(new, "lotus");
        assert_eq!(pool.maps(), &["haven", "lotus", "ascent"]);
        assert_eq!(store.current().await.maps(), &["haven", "lotus", "ascent"]);

        let on_disk = MapPoolConfig::read(store.path()).await.unwrap();
        assert_eq!(on_disk.maps, vec!["haven", "lotus", "ascent"]);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(
            envelope.event,
            Event::MapReplaced {
                old_map: "bind".into(),
                new_map: "lotus".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_failed_replace_leaves_pool_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir).await;

        let err = store.replace("split", "lotus").await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPool {
                source: VetoError::MapNotFound(_),
                ..
            }
        ));

        let err = store.replace("bind", "haven").await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPool {
                source: VetoError::DuplicateMap(_),
                ..
            }
        ));

        assert_eq!(store.current().await.maps(), &["haven", "bind", "ascent"]);
    }

    #[tokio::test]
    async fn test_failed_write_reports_error_event() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg/bot_config.json");
        MapPoolConfig::new(vec!["haven".into(), "bind".into()])
            .write(&path)
            .await
            .unwrap();

        let bus = EventBus::new();
        let store = MapPoolStore::load(&path).await.unwrap().with_event_bus(bus.clone());
        let mut rx = bus.subscribe();

        // Turn the parent directory into a plain file so the write fails.
        std::fs::remove_dir_all(temp_dir.path().join("cfg")).unwrap();
        std::fs::write(temp_dir.path().join("cfg"), "not a directory").unwrap();

        let err = store.replace("bind", "lotus").await.unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
        assert_eq!(store.current().await.maps(), &["haven", "bind"]);

        let envelope = rx.recv().await.unwrap();
        match envelope.event {
            Event::Error { message, context } => {
                assert!(message.contains("bot_config.json"));
                assert_eq!(context.as_deref(), Some("pool.replace"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_authorize_organizer() {
        let temp_dir = TempDir::new().unwrap();
        let store = MapPoolStore::from_config(
            temp_dir.path().join("bot_config.json"),
            MapPoolConfig::new(vec!["haven".into(), "bind".into()]),
        )
        .unwrap();

        let open = AppState::new(store.clone());
        assert!(open.authorize_organizer(42).is_ok());

        let restricted = AppState::new(store).with_organizers([7, 8]);
        assert!(restricted.authorize_organizer(7).is_ok());
        assert_eq!(
            restricted.authorize_organizer(42).unwrap_err(),
            VetoError::NotOrganizer { actor: 42 }
        );
    }
}
