//! Persisted background choice
//!
//! Stores map string keys to variant ids. Values that do not name a known
//! variant read back as absent, so a stale or hand-edited entry never stops
//! the host from starting.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::variant::BackgroundVariant;

/// Key under which the chosen variant is stored
pub const PREFERENCE_KEY: &str = "preferredBackground";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("failed to access preference file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse preference file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The backing store cannot be reached (e.g. storage disabled)
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

pub trait PreferenceStore {
    /// Stored variant for `key`, `None` when missing or unrecognized
    fn get(&self, key: &str) -> Option<BackgroundVariant>;

    fn set(&mut self, key: &str, variant: BackgroundVariant) -> Result<(), PreferenceError>;
}

/// Stored variant under [`PREFERENCE_KEY`], or `None`
pub fn load_preferred(store: &dyn PreferenceStore) -> BackgroundVariant {
    store.get(PREFERENCE_KEY).unwrap_or_default()
}

pub fn save_preferred(
    store: &mut dyn PreferenceStore,
    variant: BackgroundVariant,
) -> Result<(), PreferenceError> {
    store.set(PREFERENCE_KEY, variant)
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing variant validation
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<BackgroundVariant> {
        self.values.get(key).and_then(|id| BackgroundVariant::from_id(id))
    }

    fn set(&mut self, key: &str, variant: BackgroundVariant) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), variant.id().to_string());
        Ok(())
    }
}

/// Store backed by a flat TOML table on disk.
///
/// A missing file is an empty store. Writes rewrite the whole file and keep
/// any unrelated keys.
#[derive(Clone, Debug)]
pub struct TomlFilePreferences {
    path: PathBuf,
}

impl TomlFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for TomlFilePreferences {
    fn get(&self, key: &str) -> Option<BackgroundVariant> {
        let values = match self.read() {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable preferences");
                return None;
            }
        };
        values.get(key).and_then(|id| BackgroundVariant::from_id(id))
    }

    fn set(&mut self, key: &str, variant: BackgroundVariant) -> Result<(), PreferenceError> {
        // An unreadable file is replaced rather than blocking the write
        let mut values = self.read().unwrap_or_default();
        values.insert(key.to_string(), variant.id().to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&values)?)?;
        tracing::debug!(path = %self.path.display(), key, variant = variant.id(), "preference saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("backdrop-prefs-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryPreferences::new();
        assert_eq!(load_preferred(&store), BackgroundVariant::None);

        save_preferred(&mut store, BackgroundVariant::Perspective).unwrap();
        assert_eq!(store.raw(PREFERENCE_KEY), Some("synthwave"));
        assert_eq!(load_preferred(&store), BackgroundVariant::Perspective);
    }

    #[test]
    fn test_unknown_id_reads_as_absent() {
        let mut store = MemoryPreferences::new();
        store.insert_raw(PREFERENCE_KEY, "aurora");
        assert_eq!(store.get(PREFERENCE_KEY), None);
        assert_eq!(load_preferred(&store), BackgroundVariant::None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round-trip");
        let _ = fs::remove_file(&path);

        let mut store = TomlFilePreferences::new(&path);
        assert_eq!(store.get(PREFERENCE_KEY), None);

        store.set(PREFERENCE_KEY, BackgroundVariant::PointSprite).unwrap();
        store.set("other", BackgroundVariant::Grid).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("preferredBackground = \"space\""));
        assert_eq!(TomlFilePreferences::new(&path).get(PREFERENCE_KEY), Some(BackgroundVariant::PointSprite));
        assert_eq!(store.get("other"), Some(BackgroundVariant::Grid));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_absent_and_overwritten() {
        let path = temp_path("corrupt");
        fs::write(&path, "this is = = not toml").unwrap();

        let mut store = TomlFilePreferences::new(&path);
        assert_eq!(store.get(PREFERENCE_KEY), None);
        store.set(PREFERENCE_KEY, BackgroundVariant::Grid).unwrap();
        assert_eq!(store.get(PREFERENCE_KEY), Some(BackgroundVariant::Grid));

        fs::remove_file(&path).unwrap();
    }
}
