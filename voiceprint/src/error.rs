use thiserror::Error;

pub use qari_audio::DecodeError;

/// Failure to bring a reciter's reference audio onto local disk.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("acquire: {url}: http status {status}")]
    Status { url: String, status: u16 },

    #[error("acquire: {url}: {message}")]
    Transport { url: String, message: String },

    #[error("acquire: local file not found: {0}")]
    NotFound(String),

    #[error("acquire: io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reading or writing persisted fingerprints.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: invalid identity {0:?}")]
    InvalidIdentity(String),

    #[error("store: corrupt entry for {identity:?}: {message}")]
    Corrupt { identity: String, message: String },

    #[error("store: io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Storage(String),
}

/// Failure reading or appending reciter records.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog: reciter {0:?} already exists")]
    Duplicate(String),

    #[error("catalog: invalid record: {0}")]
    InvalidRecord(String),

    #[error("catalog: io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog: serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("catalog: {0}")]
    Storage(String),
}

/// Errors returned by request-level voiceprint operations.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
