//! Reciter identification via mean-pooled cepstral fingerprints.
//!
//! # Architecture
//!
//! ```text
//! ReciterCatalog ──records──▶ DatabaseBuilder ──▶ FingerprintDatabase
//!                                │   ▲                    │
//!                     AudioSource│   │FingerprintStore    │
//!                                ▼   │                    ▼
//!                         FeatureExtractor          Matcher::find_best
//! ```
//!
//! 1. [`FeatureExtractor::extract`]: decoded audio -> 13-dim [`Fingerprint`]
//!    (per-frame MFCCs, averaged over time)
//! 2. [`DatabaseBuilder::build`]: catalog records -> fingerprint database,
//!    reusing cached fingerprints and computing missing ones
//! 3. [`Matcher::find_best`]: query -> nearest reciter by cosine distance
//!
//! [`Recognizer`] ties these together for the two request-level workflows:
//! recognizing a clip and adding a reciter.
//!
//! # Example
//!
//! ```no_run
//! use qari_voiceprint::{
//!     DirStore, Fetcher, JsonCatalog, Matcher, MfccExtractor, Recognizer,
//! };
//!
//! let recognizer = Recognizer::new(
//!     Box::new(JsonCatalog::new("reciters_db.json")),
//!     Box::new(DirStore::open("features_cache")?),
//!     Box::new(Fetcher::default()),
//!     Box::new(MfccExtractor::new()),
//!     Matcher::new(),
//! );
//! let result = recognizer.recognize_file("clip.mp3".as_ref())?;
//! if let Some(best) = &result.best {
//!     println!("{} ({:.2})", best.record.identity, result.similarity());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod acquire;
mod builder;
mod catalog;
mod error;
mod extractor;
mod fingerprint;
mod matcher;
mod recognizer;
mod store;

pub use acquire::{AcquiredAudio, AudioSource, DEFAULT_FETCH_TIMEOUT, Fetcher};
pub use builder::{
    Build, BuildReport, DatabaseBuilder, EntryOutcome, EntryReport, FingerprintDatabase,
    FingerprintEntry, fingerprint_source,
};
pub use catalog::{JsonCatalog, MemoryCatalog, ReciterCatalog, ReciterRecord};
pub use error::{AcquisitionError, CatalogError, DecodeError, StoreError, VoiceprintError};
pub use extractor::{FeatureExtractor, MfccExtractor};
pub use fingerprint::{DIMENSION, Fingerprint};
pub use matcher::{MatchResult, Matcher, MatcherConfig, Verdict, cosine_distance};
pub use recognizer::{Recognition, Recognizer};
pub use store::{DirStore, FingerprintStore, MemoryStore, validate_identity};
