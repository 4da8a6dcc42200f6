use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tempfile::NamedTempFile;

use crate::common::errors::{DomainError, ErrorKind, Result};
use crate::domain::repositories::preference_repository::PreferenceRepository;

/// Preferences stored as a flat JSON object on disk
///
/// The file is read once when opened. Every `set` rewrites it through a
/// temporary file in the same directory, so a crash never leaves it half
/// written.
pub struct PreferenceFsRepository {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl PreferenceFsRepository {
    /// Opens the store; a missing or unreadable file starts empty
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed preferences file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        tracing::debug!("Preferences loaded from {:?} ({} entries)", path, values.len());

        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(values)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| {
            DomainError::new(ErrorKind::InternalError, "Preferences", "Failed to replace preferences file")
                .with_id(self.path.display().to_string())
                .with_source(e.error)
        })?;
        Ok(())
    }
}

impl PreferenceRepository for PreferenceFsRepository {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

/// Process-local store, nothing survives the process
#[derive(Default)]
pub struct InMemoryPreferenceRepository {
    values: RwLock<BTreeMap<String, String>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceRepository for InMemoryPreferenceRepository {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::preference_repository::{LANGUAGE_KEY, UNIT_KEY};
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let repo = PreferenceFsRepository::open(path.clone());
        assert_eq!(repo.get(LANGUAGE_KEY), None);
        repo.set(LANGUAGE_KEY, "en").unwrap();
        repo.set(UNIT_KEY, "miles").unwrap();

        let reopened = PreferenceFsRepository::open(path.clone());
        assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("en"));
        assert_eq!(reopened.get(UNIT_KEY).as_deref(), Some("miles"));

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["flightontime_language"], "en");
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        let repo = PreferenceFsRepository::open(path);
        assert_eq!(repo.get(LANGUAGE_KEY), None);
        repo.set(LANGUAGE_KEY, "es").unwrap();
        assert_eq!(repo.get(LANGUAGE_KEY).as_deref(), Some("es"));
    }

    #[test]
    fn test_in_memory() {
        let repo = InMemoryPreferenceRepository::new();
        repo.set(UNIT_KEY, "km").unwrap();
        assert_eq!(repo.get(UNIT_KEY).as_deref(), Some("km"));
    }
}
