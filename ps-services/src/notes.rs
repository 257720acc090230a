//! Notes persistence through a key-value blob store.
//!
//! Notes do not live in SQLite. The whole list is serialized as one JSON
//! array under the `notes` key of a [`BlobStore`], which is either a
//! directory of JSON files or an in-memory map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use ps_core::constants::NOTES_KEY;
use ps_core::error::{PsError, PsResult};

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState, StateCell};

/// Asynchronous string key-value storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> PsResult<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> PsResult<()>;

    /// Remove `key`. Missing keys are not an error.
    async fn remove_item(&self, key: &str) -> PsResult<()>;
}

fn check_key(key: &str) -> PsResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(PsError::validation(format!("invalid blob key: {key:?}")))
    }
}

/// Blob store keeping one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated blob.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PsResult<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get_item(&self, key: &str) -> PsResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> PsResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("blob {key} written ({} bytes)", value.len());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> PsResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Blob store held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get_item(&self, key: &str) -> PsResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> PsResult<()> {
        check_key(key)?;
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> PsResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// A free-form note. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// A fresh unsaved note with a new id.
    pub fn new(title: &str, content: &str) -> Self {
        let now = ps_models::models::now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// First line of the content, for list previews.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("");
        if first_line.chars().count() > max_chars {
            let cut: String = first_line.chars().take(max_chars).collect();
            format!("{cut}...")
        } else {
            first_line.to_string()
        }
    }
}

/// Loads and saves the notes list through a [`BlobStore`].
pub struct NoteStore {
    blobs: Arc<dyn BlobStore>,
    event_bus: EventBus,
    state: StateCell,
}

impl NoteStore {
    pub fn new(blobs: Arc<dyn BlobStore>, event_bus: EventBus) -> Self {
        Self {
            blobs,
            event_bus,
            state: StateCell::new(),
        }
    }

    /// Notes backed by JSON files under `dir`.
    pub fn file_backed(dir: impl Into<PathBuf>, event_bus: EventBus) -> Self {
        Self::new(Arc::new(FileBlobStore::new(dir)), event_bus)
    }

    /// Notes held in memory only.
    pub fn in_memory(event_bus: EventBus) -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()), event_bus)
    }

    /// The stored list, or an empty list when nothing was saved yet.
    pub async fn load(&self) -> PsResult<Vec<Note>> {
        match self.blobs.get_item(NOTES_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                warn!("stored notes are unreadable: {e}");
                PsError::from(e)
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored list.
    pub async fn save(&self, notes: &[Note]) -> PsResult<()> {
        let json = serde_json::to_string(notes)?;
        self.blobs.set_item(NOTES_KEY, &json).await?;
        self.event_bus.emit(AppEvent::NotesChanged { count: notes.len() });
        Ok(())
    }

    /// Drop every note.
    pub async fn clear(&self) -> PsResult<()> {
        self.blobs.remove_item(NOTES_KEY).await?;
        self.event_bus.emit(AppEvent::NotesChanged { count: 0 });
        Ok(())
    }
}

#[async_trait]
impl Service for NoteStore {
    fn name(&self) -> &str {
        "note_store"
    }

    fn state(&self) -> ServiceState {
        self.state.get()
    }

    async fn init(&self) -> PsResult<()> {
        self.state.set(ServiceState::Initializing);
        match self.load().await {
            Ok(notes) => {
                info!("note store ready ({} notes)", notes.len());
                self.state.set(ServiceState::Running);
                Ok(())
            }
            Err(e) => {
                self.state.set(ServiceState::Failed);
                Err(PsError::ServiceInit(format!("note store: {e}")))
            }
        }
    }

    async fn shutdown(&self) -> PsResult<()> {
        self.state.set(ServiceState::Stopped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_blob_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path().join("blobs"));

        assert_eq!(store.get_item("notes").await.unwrap(), None);
        store.set_item("notes", "[]").await.unwrap();
        assert_eq!(store.get_item("notes").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("blobs").join("notes.json").exists());

        store.remove_item("notes").await.unwrap();
        store.remove_item("notes").await.unwrap();
        assert_eq!(store.get_item("notes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert!(store.set_item("../escape", "x").await.unwrap_err().is_validation());
        assert!(store.get_item("").await.is_err());
    }

    #[tokio::test]
    async fn test_note_json_uses_camel_case() {
        let note = Note::new("Groceries", "milk");
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[tokio::test]
    async fn test_note_store_load_save() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let notes = NoteStore::in_memory(bus);

        assert!(notes.load().await.unwrap().is_empty());
        let list = vec![Note::new("a", "1"), Note::new("b", "2")];
        notes.save(&list).await.unwrap();
        assert_eq!(notes.load().await.unwrap(), list);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::NotesChanged { count: 2 });
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_reported() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.set_item(NOTES_KEY, "{not json").await.unwrap();
        let notes = NoteStore::new(blobs, EventBus::new(4));
        assert!(matches!(notes.load().await, Err(PsError::Serialization(_))));
        assert!(notes.init().await.is_err());
        assert_eq!(notes.state(), ServiceState::Failed);
    }

    #[test]
    fn test_preview_truncates_first_line() {
        let note = Note::new("t", "a long first line\nsecond");
        assert_eq!(note.preview(6), "a long...");
        assert_eq!(note.preview(100), "a long first line");
    }
}
