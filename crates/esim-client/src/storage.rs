//! # Session Storage
//!
//! Small string key/value persistence for the admin session, standing in for
//! browser local storage.

use esim_core::{StorefrontError, StorefrontResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const AUTH_USER_KEY: &str = "auth_user";

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> StorefrontResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorefrontResult<()>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> StorefrontResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Entries kept in a single JSON object on disk.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash never leaves a half-written session.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorefrontResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                StorefrontError::Storage(format!("{} is corrupt: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorefrontResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> StorefrontError {
    StorefrontError::Storage(format!("{}: {}", path.display(), err))
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> StorefrontResult<Option<String>> {
        let _guard = lock(&self.guard);
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorefrontResult<()> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> StorefrontResult<()> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage, used by tests and one-shot callers
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorefrontResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorefrontResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorefrontResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        storage.set(AUTH_TOKEN_KEY, "tok_123").unwrap();
        storage.set(AUTH_USER_KEY, r#"{"email":"a@b.co","role":"admin"}"#).unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok_123"));

        reopened.remove(AUTH_TOKEN_KEY).unwrap();
        reopened.remove(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert!(storage.get(AUTH_USER_KEY).unwrap().is_some());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get(AUTH_TOKEN_KEY).unwrap_err();
        assert!(matches!(err, StorefrontError::Storage(_)));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
