//! `localStorage` preference store

use backdrop::{BackgroundVariant, PreferenceError, PreferenceStore};
use web_sys::Storage;

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` when storage is disabled or blocked
    pub fn new() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<BackgroundVariant> {
        let value = self.storage.get_item(key).ok().flatten()?;
        BackgroundVariant::from_id(&value)
    }

    fn set(&mut self, key: &str, variant: BackgroundVariant) -> Result<(), PreferenceError> {
        self.storage
            .set_item(key, variant.id())
            .map_err(|err| PreferenceError::Unavailable(format!("{err:?}")))
    }
}
