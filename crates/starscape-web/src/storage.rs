use starscape::{ScoreStore, StoreError};
use web_sys::Storage;

/// Best-score persistence in `window.localStorage`.
///
/// Private browsing or disabled storage leaves the store unavailable; the
/// session then runs with a best score of 0 and writes are dropped.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; best score will not persist");
        }
        Self { storage }
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.get_item(key).map_err(|e| StoreError::Rejected {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StoreError::Rejected {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}
