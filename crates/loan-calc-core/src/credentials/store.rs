use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::CredentialError;

/// What is persisted per user: hex salt and hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub salt: String,
    pub password_hash: String,
}

/// Key-value store of credentials keyed by username.
pub trait CredentialStore: Send + Sync {
    /// Insert `record` unless the username exists. Returns whether it was
    /// inserted; the check and the insert happen under one lock.
    fn insert_if_absent(&self, record: CredentialRecord) -> Result<bool, CredentialError>;

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, CredentialError>;
}

type UserMap = HashMap<String, CredentialRecord>;

fn poisoned<T>(_: T) -> CredentialError {
    CredentialError::StoreUnavailable("lock poisoned".into())
}

/// A thread-safe in-memory credential store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<UserMap>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn insert_if_absent(&self, record: CredentialRecord) -> Result<bool, CredentialError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(&record.username) {
            return Ok(false);
        }
        users.insert(record.username.clone(), record);
        Ok(true)
    }

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, CredentialError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(username).cloned())
    }
}

/// Credential store backed by a JSON file.
///
/// Every operation takes an OS lock on a `<file>.lock` sidecar and re-reads
/// the file, so separate handles (and separate processes) on the same path
/// see each other's inserts. Inserts hold the lock exclusively across
/// read, check, write and rename.
#[derive(Debug)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileCredentialStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    /// A file that exists but cannot be parsed is rejected here.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref().to_path_buf();
        let lock_path = path.with_extension("json.lock");
        let store = Self { path, lock_path };
        store.with_lock(LockMode::Shared, || store.load())?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_lock<T>(
        &self,
        mode: LockMode,
        f: impl FnOnce() -> Result<T, CredentialError>,
    ) -> Result<T, CredentialError> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| unavailable("open lock", &self.lock_path, e))?;

        let locked = match mode {
            LockMode::Shared => FileExt::lock_shared(&lock_file),
            LockMode::Exclusive => FileExt::lock_exclusive(&lock_file),
        };
        locked.map_err(|e| unavailable("lock", &self.lock_path, e))?;

        let result = f();
        // Closing the descriptor releases the lock even if this fails.
        let _ = FileExt::unlock(&lock_file);
        result
    }

    fn load(&self) -> Result<UserMap, CredentialError> {
        if !self.path.exists() {
            return Ok(UserMap::new());
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|e| unavailable("read", &self.path, e))?;
        let records: Vec<CredentialRecord> =
            serde_json::from_str(&contents).map_err(|e| unavailable("parse", &self.path, e))?;
        Ok(records
            .into_iter()
            .map(|r| (r.username.clone(), r))
            .collect())
    }

    fn persist(&self, users: &UserMap) -> Result<(), CredentialError> {
        let mut records: Vec<&CredentialRecord> = users.values().collect();
        records.sort_by(|a, b| a.username.cmp(&b.username));
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| CredentialError::StoreUnavailable(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| unavailable("write", &self.path, e))
    }
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

fn unavailable(action: &str, path: &Path, e: impl std::fmt::Display) -> CredentialError {
    CredentialError::StoreUnavailable(format!("{action} '{}': {e}", path.display()))
}

impl CredentialStore for JsonFileCredentialStore {
    fn insert_if_absent(&self, record: CredentialRecord) -> Result<bool, CredentialError> {
        self.with_lock(LockMode::Exclusive, || {
            let mut users = self.load()?;
            if users.contains_key(&record.username) {
                return Ok(false);
            }
            users.insert(record.username.clone(), record);
            self.persist(&users)?;
            Ok(true)
        })
    }

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, CredentialError> {
        self.with_lock(LockMode::Shared, || {
            Ok(self.load()?.remove(username))
        })
    }
}
