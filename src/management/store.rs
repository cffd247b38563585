use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::config;

/// Durable key-value storage backing the response cache. Values are JSON text.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>, String>;

    async fn write(&self, key: &str, value: &str) -> Result<(), String>;
}

/// One JSON file per key below a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_location() -> Self {
        Self::new(config::cache_dir())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, String> {
        match async_fs::read_to_string(self.get_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), String> {
        async_fs::create_dir_all(&self.root)
            .await
            .map_err(|e| e.to_string())?;
        async_fs::write(self.get_path(key), value)
            .await
            .map_err(|e| e.to_string())
    }
}

/// In-process store. Counts writes so callers can observe cache traffic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value without counting it as a write.
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
