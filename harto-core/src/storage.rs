//! Persistent key-value storage.
//!
//! Every persisted collection is one JSON string under one key, read and written as a
//! whole. Decoding never fails: missing or corrupt values fall back to the default.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store. Used by tests and by callers that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
///
/// Writes go to a sibling temp file and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let p = self.path_for(key);
        match fs::read_to_string(&p) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "unreadable state file");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let p = self.path_for(key);
        let tmp = p.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &p).with_context(|| format!("rename {} -> {}", tmp.display(), p.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let p = self.path_for(key);
        match fs::remove_file(&p) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", p.display())),
        }
    }
}

/// Decode the value under `key`, or `T::default()` when missing or corrupt.
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt persisted value; using default");
            T::default()
        }
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).with_context(|| format!("serialize {key}"))?;
    store.set(key, &raw).with_context(|| format!("persist {key}"))
}

/// Fire-and-forget write: failures are reported as a warning, never propagated.
pub fn persist_or_warn<T, S>(store: &mut S, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    match save_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %format!("{e:#}"), "failed to persist state");
            false
        }
    }
}
