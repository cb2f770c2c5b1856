//! Single-file JSON store.
//!
//! The whole state (conversation list plus theme preference) lives in one
//! JSON file, rewritten on every save. Corrupt or missing data reads as
//! empty, matching the store contract.

use nanochat_application::{ConversationStore, StoreError, ThemeStore};
use nanochat_domain::Conversation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    conversations: Vec<Conversation>,
    #[serde(default)]
    theme: Option<String>,
}

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles between the two trait surfaces
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreData {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoreData::default(),
            Err(e) => {
                warn!(path = %self.path.display(), "store read failed: {e}");
                return StoreData::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %self.path.display(), "corrupt store, starting empty: {e}");
                StoreData::default()
            }
        }
    }

    fn write(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(data).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        debug!(path = %self.path.display(), "store written");
        Ok(())
    }
}

impl ConversationStore for JsonFileStore {
    fn load(&self) -> Vec<Conversation> {
        self.read().conversations
    }

    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| {
            StoreError::Io("store lock poisoned".to_string())
        })?;
        let mut data = self.read();
        data.conversations = conversations.to_vec();
        self.write(&data)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| {
            StoreError::Io("store lock poisoned".to_string())
        })?;
        let mut data = self.read();
        data.conversations.clear();
        self.write(&data)
    }
}

impl ThemeStore for JsonFileStore {
    fn theme(&self) -> Option<String> {
        self.read().theme
    }

    fn set_theme(&self, theme: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| {
            StoreError::Io("store lock poisoned".to_string())
        })?;
        let mut data = self.read();
        data.theme = Some(theme.to_string());
        self.write(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        assert!(store.load().is_empty());
        assert!(store.theme().is_none());
    }

    #[test]
    fn save_and_reload_conversations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let conv = Conversation::from_first_message("what is borrowing?");

        let store = JsonFileStore::new(&path);
        store.save(&[conv.clone()]).unwrap();

        // A fresh store instance sees the persisted data
        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), conv.id());
        assert_eq!(loaded[0].title(), conv.title());
    }

    #[test]
    fn theme_survives_conversation_save() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        store.set_theme("light").unwrap();
        store
            .save(&[Conversation::from_first_message("hi")])
            .unwrap();

        assert_eq!(store.theme().as_deref(), Some("light"));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn clear_removes_conversations_but_keeps_theme() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        store.set_theme("dark").unwrap();
        store
            .save(&[Conversation::from_first_message("hi")])
            .unwrap();

        store.clear().unwrap();
        assert!(store.load().is_empty());
        assert_eq!(store.theme().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not valid json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_empty());
        assert!(store.theme().is_none());

        // Saving over the corrupt file recovers it
        store.save(&[Conversation::from_first_message("hi")]).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("store.json");
        let store = JsonFileStore::new(&path);
        store.save(&[]).unwrap();
        assert!(path.exists());
    }
}
