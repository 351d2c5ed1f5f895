//! Persistent fingerprint cache keyed by reciter identity.
//!
//! One fingerprint per identity, no versioning, no eviction: an entry lives
//! until it is overwritten by a later [`FingerprintStore::save`].

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::StoreError;
use crate::fingerprint::Fingerprint;

/// Fingerprint persistence.
pub trait FingerprintStore: Send + Sync {
    /// Returns the stored fingerprint, or `None` if the identity has none.
    fn load(&self, identity: &str) -> Result<Option<Fingerprint>, StoreError>;

    /// Writes or overwrites the fingerprint for `identity`.
    fn save(&self, identity: &str, fingerprint: &Fingerprint) -> Result<(), StoreError>;
}

/// Rejects identities that cannot safely name a single file.
pub fn validate_identity(identity: &str) -> Result<(), StoreError> {
    let bad = identity.is_empty()
        || identity == "."
        || identity == ".."
        || identity.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidIdentity(identity.to_string()));
    }
    Ok(())
}

/// Directory-backed store: `<dir>/<identity>.json`, each file a JSON array
/// of the fingerprint's coefficients.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `identity`'s fingerprint.
    pub fn path_for(&self, identity: &str) -> Result<PathBuf, StoreError> {
        validate_identity(identity)?;
        Ok(self.dir.join(format!("{identity}.json")))
    }
}

impl FingerprintStore for DirStore {
    fn load(&self, identity: &str) -> Result<Option<Fingerprint>, StoreError> {
        let path = self.path_for(identity)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let fp = serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            identity: identity.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(fp))
    }

    fn save(&self, identity: &str, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        let path = self.path_for(identity)?;
        let data = serde_json::to_vec(fingerprint).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Write beside the target and rename so readers never see a torn file.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(identity, path = %path.display(), "saved fingerprint");
        Ok(())
    }
}

/// An in-memory fingerprint store for tests and embedding.
///
/// Accepts exactly the identities [`DirStore`] accepts.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, Fingerprint>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FingerprintStore for MemoryStore {
    fn load(&self, identity: &str) -> Result<Option<Fingerprint>, StoreError> {
        validate_identity(identity)?;
        let data = self
            .data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(data.get(identity).copied())
    }

    fn save(&self, identity: &str, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        validate_identity(identity)?;
        let mut data = self
            .data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        data.insert(identity.to_string(), *fingerprint);
        Ok(())
    }
}
