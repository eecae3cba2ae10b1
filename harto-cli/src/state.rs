use anyhow::{Context, Result};
use harto_core::FileStore;
use std::fs;
use std::path::PathBuf;

/// `$HARTO_HOME`, else `~/.harto`.
pub fn harto_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("HARTO_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".harto"))
}

pub fn ensure_harto_home() -> Result<PathBuf> {
    let dir = harto_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Persisted key-value state (completions, custom cards, preferences, content cache).
pub fn open_store() -> Result<FileStore> {
    FileStore::open(ensure_harto_home()?.join("state"))
}
