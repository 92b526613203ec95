use serde::{Deserialize, Serialize};

use crate::error::{Result, VetoError};

/// Canonical form of a map identifier: trimmed and lower-cased.
pub fn normalize_map_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered, validated set of maps a veto is run over.
///
/// Names are stored in canonical form, so two entries never compare equal
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MapPool {
    maps: Vec<String>,
}

impl MapPool {
    pub const MIN_SIZE: usize = 2;

    pub fn new<I, S>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for map in maps {
            let map = normalize_map_name(map.as_ref());
            if map.is_empty() {
                return Err(VetoError::EmptyMapName);
            }
            if normalized.contains(&map) {
                return Err(VetoError::DuplicateMap(map));
            }
            normalized.push(map);
        }

        if normalized.len() < Self::MIN_SIZE {
            return Err(VetoError::PoolTooSmall {
                size: normalized.len(),
            });
        }

        Ok(Self { maps: normalized })
    }

    pub fn maps(&self) -> &[String] {
        &self.maps
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Replaces `old` with `new` in place, keeping its position in the pool.
    ///
    /// Returns the name that was replaced.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<String> {
        let old = normalize_map_name(old);
        let new = normalize_map_name(new);

        let index = self
            .maps
            .iter()
            .position(|m| *m == old)
            .ok_or_else(|| VetoError::MapNotFound(old.clone()))?;

        if new.is_empty() {
            return Err(VetoError::EmptyMapName);
        }
        if new != old && self.maps.contains(&new) {
            return Err(VetoError::DuplicateMap(new));
        }

        Ok(std::mem::replace(&mut self.maps[index], new))
    }

    pub fn into_maps(self) -> Vec<String> {
        self.maps
    }
}

impl TryFrom<Vec<String>> for MapPool {
    type Error = VetoError;

    fn try_from(maps: Vec<String>) -> Result<Self> {
        Self::new(maps)
    }
}

impl From<MapPool> for Vec<String> {
    fn from(pool: MapPool) -> Self {
        pool.into_maps()
    }
}
