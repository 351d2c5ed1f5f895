use std::fmt;

use tracing::{debug, info, warn};

use crate::acquire::AudioSource;
use crate::catalog::ReciterRecord;
use crate::extractor::FeatureExtractor;
use crate::fingerprint::Fingerprint;
use crate::store::FingerprintStore;
use crate::VoiceprintError;

/// A catalog record paired with its fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintEntry {
    pub record: ReciterRecord,
    pub fingerprint: Fingerprint,
}

/// In-memory fingerprint database, in catalog order.
///
/// Rebuilt for every recognition request; persistence happens per identity
/// through a [`FingerprintStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FingerprintDatabase {
    entries: Vec<FingerprintEntry>,
}

impl FingerprintDatabase {
    pub fn new(entries: Vec<FingerprintEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FingerprintEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FingerprintEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, record: ReciterRecord, fingerprint: Fingerprint) {
        self.entries.push(FingerprintEntry { record, fingerprint });
    }
}

impl<'a> IntoIterator for &'a FingerprintDatabase {
    type Item = &'a FingerprintEntry;
    type IntoIter = std::slice::Iter<'a, FingerprintEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// How one catalog record was resolved during a build.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Fingerprint came from the store.
    Cached,
    /// Fingerprint was extracted from freshly acquired audio and saved.
    Computed,
    /// Record was left out of the database.
    Skipped { reason: String },
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cached => write!(f, "cached"),
            Self::Computed => write!(f, "computed"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    pub identity: String,
    pub outcome: EntryOutcome,
}

/// Per-record outcomes of a build, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub entries: Vec<EntryReport>,
    /// Number of audio acquisitions attempted.
    pub acquisitions: usize,
}

impl BuildReport {
    /// Skipped records as `(identity, reason)` pairs.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            EntryOutcome::Skipped { reason } => Some((e.identity.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Result of [`DatabaseBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct Build {
    pub database: FingerprintDatabase,
    pub report: BuildReport,
}

/// Fetches `locator`, decodes it, and fingerprints it. The downloaded
/// file, if any, is gone when this returns.
pub fn fingerprint_source(
    source: &dyn AudioSource,
    extractor: &dyn FeatureExtractor,
    locator: &str,
) -> Result<Fingerprint, VoiceprintError> {
    let audio = source.fetch(locator)?;
    Ok(extractor.extract_file(audio.path())?)
}

/// Assembles a [`FingerprintDatabase`] from catalog records, reusing cached
/// fingerprints and computing missing ones.
///
/// Failures are contained per record: a record whose fingerprint cannot be
/// loaded, acquired, decoded, or saved is skipped with a warning and the
/// build moves on. `build` itself never fails.
pub struct DatabaseBuilder<'a> {
    store: &'a dyn FingerprintStore,
    source: &'a dyn AudioSource,
    extractor: &'a dyn FeatureExtractor,
}

impl<'a> DatabaseBuilder<'a> {
    pub fn new(
        store: &'a dyn FingerprintStore,
        source: &'a dyn AudioSource,
        extractor: &'a dyn FeatureExtractor,
    ) -> Self {
        Self {
            store,
            source,
            extractor,
        }
    }

    pub fn build(&self, records: &[ReciterRecord]) -> Build {
        let mut build = Build::default();

        for record in records {
            let identity = record.identity.as_str();
            let resolved = self.resolve(record, &mut build.report.acquisitions);

            let outcome = match resolved {
                Ok((fingerprint, outcome)) => {
                    build.database.push(record.clone(), fingerprint);
                    outcome
                }
                Err(e) => {
                    warn!(identity, error = %e, "skipping reciter");
                    EntryOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };
            build.report.entries.push(EntryReport {
                identity: identity.to_string(),
                outcome,
            });
        }

        debug!(
            records = records.len(),
            entries = build.database.len(),
            acquisitions = build.report.acquisitions,
            "built fingerprint database"
        );
        build
    }

    fn resolve(
        &self,
        record: &ReciterRecord,
        acquisitions: &mut usize,
    ) -> Result<(Fingerprint, EntryOutcome), VoiceprintError> {
        let identity = record.identity.as_str();
        if let Some(fp) = self.store.load(identity)? {
            debug!(identity, "fingerprint cache hit");
            return Ok((fp, EntryOutcome::Cached));
        }

        info!(identity, source = %record.audio_source, "fingerprinting reference audio");
        *acquisitions += 1;
        let fp = fingerprint_source(self.source, self.extractor, &record.audio_source)?;
        self.store.save(identity, &fp)?;
        Ok((fp, EntryOutcome::Computed))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use qari_audio::Waveform;

    use super::*;
    use crate::acquire::AcquiredAudio;
    use crate::store::MemoryStore;
    use crate::{AcquisitionError, DecodeError};

    /// Hands back the locator as a "local path" and fails for locators
    /// containing "broken".
    #[derive(Default)]
    struct FakeSource {
        fetched: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn calls(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    impl AudioSource for FakeSource {
        fn fetch(&self, locator: &str) -> Result<AcquiredAudio, AcquisitionError> {
            self.fetched.lock().unwrap().push(locator.to_string());
            if locator.contains("broken") {
                return Err(AcquisitionError::Transport {
                    url: locator.to_string(),
                    message: "connection reset".into(),
                });
            }
            Ok(AcquiredAudio::local(locator))
        }
    }

    /// Maps "/audio/<n>" to the one-hot fingerprint on axis n; anything
    /// else is undecodable.
    struct AxisExtractor;

    impl FeatureExtractor for AxisExtractor {
        fn extract(&self, _wave: &Waveform) -> Result<Fingerprint, DecodeError> {
            Err(DecodeError::Empty)
        }

        fn extract_file(&self, path: &Path) -> Result<Fingerprint, DecodeError> {
            path.to_str()
                .and_then(|p| p.strip_prefix("/audio/"))
                .and_then(|n| n.parse::<usize>().ok())
                .map(Fingerprint::unit)
                .ok_or_else(|| DecodeError::Unsupported(path.display().to_string()))
        }
    }

    fn rec(name: &str, audio: &str) -> ReciterRecord {
        ReciterRecord::new(name, audio, "test")
    }

    #[test]
    fn computes_and_caches_missing_fingerprints() {
        let store = MemoryStore::new();
        let source = FakeSource::default();
        let builder = DatabaseBuilder::new(&store, &source, &AxisExtractor);
        let records = vec![rec("A", "/audio/0"), rec("B", "/audio/1")];

        let first = builder.build(&records);
        assert_eq!(first.database.len(), 2);
        assert_eq!(first.report.acquisitions, 2);
        assert_eq!(store.load("B").unwrap(), Some(Fingerprint::unit(1)));
        assert!(first.report.entries.iter().all(|e| e.outcome == EntryOutcome::Computed));

        let second = builder.build(&records);
        assert_eq!(second.report.acquisitions, 0);
        assert_eq!(source.calls(), 2);
        assert_eq!(second.database, first.database);
        assert!(second.report.entries.iter().all(|e| e.outcome == EntryOutcome::Cached));
    }

    #[test]
    fn failed_acquisition_skips_entry() {
        let store = MemoryStore::new();
        let source = FakeSource::default();
        let builder = DatabaseBuilder::new(&store, &source, &AxisExtractor);
        let records = vec![
            rec("first", "/audio/0"),
            rec("second", "https://broken.example/2.mp3"),
            rec("third", "/audio/2"),
        ];

        let build = builder.build(&records);
        let names: Vec<_> = build.database.iter().map(|e| e.record.identity.as_str()).collect();
        assert_eq!(names, ["first", "third"]);

        let warnings: Vec<_> = build.report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, "second");
        assert!(warnings[0].1.contains("connection reset"));
        assert_eq!(store.load("second").unwrap(), None);
    }

    #[test]
    fn decode_failure_skips_entry() {
        let store = MemoryStore::new();
        let source = FakeSource::default();
        let builder = DatabaseBuilder::new(&store, &source, &AxisExtractor);

        let build = builder.build(&[rec("x", "/not-audio"), rec("y", "/audio/4")]);
        assert_eq!(build.database.len(), 1);
        assert_eq!(build.database.entries()[0].record.identity, "y");
        assert_eq!(build.report.count(|o| matches!(o, EntryOutcome::Skipped { .. })), 1);
    }

    #[test]
    fn invalid_identity_skips_without_acquiring() {
        let store = MemoryStore::new();
        let source = FakeSource::default();
        let builder = DatabaseBuilder::new(&store, &source, &AxisExtractor);

        let build = builder.build(&[rec("a/b", "/audio/0"), rec("ok", "/audio/1")]);
        assert_eq!(build.database.len(), 1);
        assert_eq!(build.report.acquisitions, 1);
        assert_eq!(source.calls(), 1);
        assert!(build.report.warnings().next().unwrap().1.contains("invalid identity"));
        assert!(matches!(
            build.report.entries[0].outcome,
            EntryOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn empty_catalog_builds_empty_database() {
        let store = MemoryStore::new();
        let source = FakeSource::default();
        let build = DatabaseBuilder::new(&store, &source, &AxisExtractor).build(&[]);
        assert!(build.database.is_empty());
        assert!(build.report.entries.is_empty());
    }

    #[test]
    fn outcome_display() {
        assert_eq!(EntryOutcome::Cached.to_string(), "cached");
        assert_eq!(
            EntryOutcome::Skipped { reason: "boom".into() }.to_string(),
            "skipped: boom"
        );
    }
}
