//! Reciter metadata records.
//!
//! The catalog is append-only from the engine's point of view: records are
//! added by the add-reciter workflow and never edited or removed.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::CatalogError;

/// A known reciter.
///
/// Serialized with the catalog file's field names (`name`, `audio_url`,
/// `source`). Extra fields found in older files are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciterRecord {
    /// Display name; unique within the catalog.
    #[serde(rename = "name")]
    pub identity: String,

    /// Reference recitation: an http(s) URL or a local path.
    #[serde(rename = "audio_url")]
    pub audio_source: String,

    /// Where the recording comes from (free text or URL).
    #[serde(rename = "source", default)]
    pub source_reference: String,
}

impl ReciterRecord {
    pub fn new(
        identity: impl Into<String>,
        audio_source: impl Into<String>,
        source_reference: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            audio_source: audio_source.into(),
            source_reference: source_reference.into(),
        }
    }

    /// Checks that all three fields are filled in.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (field, value) in [
            ("name", &self.identity),
            ("audio_url", &self.audio_source),
            ("source", &self.source_reference),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::InvalidRecord(format!("{field} is empty")));
            }
        }
        Ok(())
    }
}

/// Reciter record persistence.
pub trait ReciterCatalog: Send + Sync {
    /// Returns all records in insertion order.
    fn load_all(&self) -> Result<Vec<ReciterRecord>, CatalogError>;

    /// Appends a record. Fails with [`CatalogError::Duplicate`] if the
    /// identity is already present.
    fn append(&self, record: ReciterRecord) -> Result<(), CatalogError>;

    /// Looks up a record by identity.
    fn find(&self, identity: &str) -> Result<Option<ReciterRecord>, CatalogError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|r| r.identity == identity))
    }
}

/// Catalog stored as a pretty-printed JSON array in a single file.
///
/// A missing file reads as an empty catalog.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[ReciterRecord]) -> Result<(), CatalogError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&buf)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| CatalogError::Io(e.error))?;
        Ok(())
    }
}

impl ReciterCatalog for JsonCatalog {
    fn load_all(&self) -> Result<Vec<ReciterRecord>, CatalogError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append(&self, record: ReciterRecord) -> Result<(), CatalogError> {
        record.validate()?;
        let mut records = self.load_all()?;
        if records.iter().any(|r| r.identity == record.identity) {
            return Err(CatalogError::Duplicate(record.identity));
        }
        records.push(record);
        self.write_all(&records)
    }
}

/// An in-memory catalog for tests and embedding.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<Mutex<Vec<ReciterRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-filled with `records`, bypassing validation.
    pub fn with_records(records: Vec<ReciterRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl ReciterCatalog for MemoryCatalog {
    fn load_all(&self) -> Result<Vec<ReciterRecord>, CatalogError> {
        let records = self
            .records
            .lock()
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        Ok(records.clone())
    }

    fn append(&self, record: ReciterRecord) -> Result<(), CatalogError> {
        record.validate()?;
        let mut records = self
            .records
            .lock()
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        if records.iter().any(|r| r.identity == record.identity) {
            return Err(CatalogError::Duplicate(record.identity));
        }
        records.push(record);
        Ok(())
    }
}
