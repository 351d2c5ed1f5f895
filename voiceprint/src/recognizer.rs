use std::path::Path;

use tracing::info;

use crate::acquire::AudioSource;
use crate::builder::{Build, BuildReport, DatabaseBuilder, FingerprintEntry, fingerprint_source};
use crate::catalog::{ReciterCatalog, ReciterRecord};
use crate::extractor::FeatureExtractor;
use crate::fingerprint::Fingerprint;
use crate::matcher::{Matcher, Verdict};
use crate::store::{FingerprintStore, validate_identity};
use crate::{CatalogError, VoiceprintError};

/// Result of a recognition request.
#[derive(Debug, Clone)]
pub struct Recognition {
    pub query: Fingerprint,
    /// Closest reciter, if the database had any entry.
    pub best: Option<FingerprintEntry>,
    /// Cosine distance to `best`; `+inf` when there is none.
    pub distance: f64,
    pub verdict: Verdict,
    /// Every database entry with its distance, closest first.
    pub ranked: Vec<(FingerprintEntry, f64)>,
    /// How each catalog record was resolved while building the database.
    pub report: BuildReport,
}

impl Recognition {
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// The recognition and add-reciter workflows over injected stores.
///
/// Everything runs synchronously on the caller's thread.
pub struct Recognizer {
    catalog: Box<dyn ReciterCatalog>,
    store: Box<dyn FingerprintStore>,
    source: Box<dyn AudioSource>,
    extractor: Box<dyn FeatureExtractor>,
    matcher: Matcher,
}

impl Recognizer {
    pub fn new(
        catalog: Box<dyn ReciterCatalog>,
        store: Box<dyn FingerprintStore>,
        source: Box<dyn AudioSource>,
        extractor: Box<dyn FeatureExtractor>,
        matcher: Matcher,
    ) -> Self {
        Self {
            catalog,
            store,
            source,
            extractor,
            matcher,
        }
    }

    pub fn catalog(&self) -> &dyn ReciterCatalog {
        self.catalog.as_ref()
    }

    pub fn store(&self) -> &dyn FingerprintStore {
        self.store.as_ref()
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Loads the catalog and resolves every record to a fingerprint.
    ///
    /// Only a catalog read failure is an error; per-record failures are
    /// reported in the returned [`BuildReport`].
    pub fn build_database(&self) -> Result<Build, VoiceprintError> {
        let records = self.catalog.load_all()?;
        let builder = DatabaseBuilder::new(
            self.store.as_ref(),
            self.source.as_ref(),
            self.extractor.as_ref(),
        );
        Ok(builder.build(&records))
    }

    /// Fingerprints the uploaded clip and matches it against the catalog.
    ///
    /// A clip that cannot be decoded fails the whole request.
    pub fn recognize_file(&self, clip: &Path) -> Result<Recognition, VoiceprintError> {
        let query = self.extractor.extract_file(clip)?;
        self.recognize(query)
    }

    /// Matches an already-computed query fingerprint against the catalog.
    pub fn recognize(&self, query: Fingerprint) -> Result<Recognition, VoiceprintError> {
        let Build { database, report } = self.build_database()?;
        let result = self.matcher.find_best(&query, &database);
        let verdict = self.matcher.verdict(&result);

        if let Some(best) = result.best {
            info!(
                identity = %best.record.identity,
                distance = result.distance,
                %verdict,
                "recognized reciter"
            );
        }

        let ranked = self
            .matcher
            .rank(&query, &database)
            .into_iter()
            .map(|(entry, d)| (entry.clone(), d))
            .collect();

        Ok(Recognition {
            query,
            best: result.best.cloned(),
            distance: result.distance,
            verdict,
            ranked,
            report,
        })
    }

    /// Registers a new reciter.
    ///
    /// The reference audio is acquired and fingerprinted before anything is
    /// written. The fingerprint is saved first and the catalog record is
    /// appended last, so the catalog never names a reciter without a
    /// fingerprint. If the append fails, the saved fingerprint is left as an
    /// orphan that a later add of the same identity overwrites.
    pub fn add_reciter(&self, record: ReciterRecord) -> Result<Fingerprint, VoiceprintError> {
        record.validate()?;
        validate_identity(&record.identity)?;
        if self.catalog.find(&record.identity)?.is_some() {
            return Err(CatalogError::Duplicate(record.identity).into());
        }

        info!(identity = %record.identity, source = %record.audio_source, "adding reciter");
        let fp = fingerprint_source(
            self.source.as_ref(),
            self.extractor.as_ref(),
            &record.audio_source,
        )?;

        self.store.save(&record.identity, &fp)?;
        self.catalog.append(record)?;
        Ok(fp)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use qari_audio::Waveform;

    use super::*;
    use crate::acquire::AcquiredAudio;
    use crate::catalog::MemoryCatalog;
    use crate::matcher::MatcherConfig;
    use crate::store::MemoryStore;
    use crate::{AcquisitionError, DecodeError, StoreError};

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl AudioSource for CountingSource {
        fn fetch(&self, locator: &str) -> Result<AcquiredAudio, AcquisitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if locator.contains("unreachable") {
                return Err(AcquisitionError::Status {
                    url: locator.to_string(),
                    status: 404,
                });
            }
            Ok(AcquiredAudio::local(locator))
        }
    }

    /// "/audio/<n>" decodes to the one-hot fingerprint on axis n.
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
                .ok_or(DecodeError::NoTrack)
        }
    }

    fn recognizer(
        catalog: MemoryCatalog,
        store: MemoryStore,
        source: CountingSource,
        cfg: MatcherConfig,
    ) -> Recognizer {
        Recognizer::new(
            Box::new(catalog),
            Box::new(store),
            Box::new(source),
            Box::new(AxisExtractor),
            Matcher::with_config(cfg),
        )
    }

    fn rec(name: &str, audio: &str) -> ReciterRecord {
        ReciterRecord::new(name, audio, "test")
    }

    #[test]
    fn recognizes_closest_reciter() {
        let catalog = MemoryCatalog::with_records(vec![rec("A", "/audio/0"), rec("B", "/audio/1")]);
        let r = recognizer(catalog, MemoryStore::new(), CountingSource::default(), MatcherConfig::default());

        let got = r.recognize_file(Path::new("/audio/1")).unwrap();
        assert_eq!(got.best.as_ref().unwrap().record.identity, "B");
        assert_eq!(got.distance, 0.0);
        assert_eq!(got.similarity(), 1.0);
        assert_eq!(got.verdict, Verdict::Match);
        assert_eq!(got.report.acquisitions, 2);

        let order: Vec<_> = got.ranked.iter().map(|(e, _)| e.record.identity.as_str()).collect();
        assert_eq!(order, ["B", "A"]);
        assert_eq!(got.ranked[1].1, 1.0);
    }

    #[test]
    fn undecodable_clip_fails_request() {
        let catalog = MemoryCatalog::with_records(vec![rec("A", "/audio/0")]);
        let source = CountingSource::default();
        let r = recognizer(catalog, MemoryStore::new(), source.clone(), MatcherConfig::default());

        let err = r.recognize_file(Path::new("/garbage.bin")).unwrap_err();
        assert!(matches!(err, VoiceprintError::Decode(_)));
        // The query is fingerprinted before any reference audio is fetched.
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_catalog_has_no_candidates() {
        let r = recognizer(
            MemoryCatalog::new(),
            MemoryStore::new(),
            CountingSource::default(),
            MatcherConfig::default(),
        );
        let got = r.recognize(Fingerprint::unit(0)).unwrap();
        assert!(got.best.is_none());
        assert_eq!(got.distance, f64::INFINITY);
        assert_eq!(got.verdict, Verdict::NoCandidates);
    }

    #[test]
    fn skipped_reciters_reported_but_recognition_succeeds() {
        let catalog = MemoryCatalog::with_records(vec![
            rec("gone", "https://unreachable.example/x.mp3"),
            rec("A", "/audio/0"),
        ]);
        let r = recognizer(catalog, MemoryStore::new(), CountingSource::default(), MatcherConfig::default());

        let got = r.recognize(Fingerprint::unit(0)).unwrap();
        assert_eq!(got.best.unwrap().record.identity, "A");
        let warnings: Vec<_> = got.report.warnings().map(|(id, _)| id).collect();
        assert_eq!(warnings, ["gone"]);
    }

    #[test]
    fn below_floor_is_not_confident() {
        let catalog = MemoryCatalog::with_records(vec![rec("A", "/audio/0")]);
        let r = recognizer(
            catalog,
            MemoryStore::new(),
            CountingSource::default(),
            MatcherConfig {
                min_similarity: Some(0.5),
            },
        );
        let got = r.recognize(Fingerprint::unit(3)).unwrap();
        assert_eq!(got.best.unwrap().record.identity, "A");
        assert_eq!(got.verdict, Verdict::NoConfidentMatch);
    }

    #[test]
    fn add_reciter_stores_fingerprint_and_record() {
        let catalog = MemoryCatalog::new();
        let store = MemoryStore::new();
        let r = recognizer(catalog.clone(), store.clone(), CountingSource::default(), MatcherConfig::default());

        let fp = r.add_reciter(rec("new", "/audio/5")).unwrap();
        assert_eq!(fp, Fingerprint::unit(5));
        assert_eq!(store.load("new").unwrap(), Some(fp));
        assert_eq!(catalog.load_all().unwrap(), vec![rec("new", "/audio/5")]);

        // Recognition now uses the cached fingerprint.
        let got = r.recognize(Fingerprint::unit(5)).unwrap();
        assert_eq!(got.report.acquisitions, 0);
        assert_eq!(got.best.unwrap().record.identity, "new");
    }

    #[test]
    fn failed_acquisition_leaves_nothing_behind() {
        let catalog = MemoryCatalog::new();
        let store = MemoryStore::new();
        let r = recognizer(catalog.clone(), store.clone(), CountingSource::default(), MatcherConfig::default());

        let err = r
            .add_reciter(rec("ghost", "https://unreachable.example/g.mp3"))
            .unwrap_err();
        assert!(matches!(
            err,
            VoiceprintError::Acquisition(AcquisitionError::Status { status: 404, .. })
        ));
        assert!(catalog.load_all().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn undecodable_reference_leaves_nothing_behind() {
        let catalog = MemoryCatalog::new();
        let store = MemoryStore::new();
        let r = recognizer(catalog.clone(), store.clone(), CountingSource::default(), MatcherConfig::default());

        let err = r.add_reciter(rec("noise", "/not/audio")).unwrap_err();
        assert!(matches!(err, VoiceprintError::Decode(_)));
        assert!(catalog.load_all().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_rejected_before_fetch() {
        let catalog = MemoryCatalog::with_records(vec![rec("A", "/audio/0")]);
        let source = CountingSource::default();
        let r = recognizer(catalog, MemoryStore::new(), source.clone(), MatcherConfig::default());

        let err = r.add_reciter(rec("A", "/audio/1")).unwrap_err();
        assert!(matches!(err, VoiceprintError::Catalog(CatalogError::Duplicate(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_records_rejected() {
        let r = recognizer(
            MemoryCatalog::new(),
            MemoryStore::new(),
            CountingSource::default(),
            MatcherConfig::default(),
        );
        assert!(matches!(
            r.add_reciter(ReciterRecord::new("A", "/audio/0", "")),
            Err(VoiceprintError::Catalog(CatalogError::InvalidRecord(_)))
        ));
        assert!(matches!(
            r.add_reciter(rec("../escape", "/audio/0")),
            Err(VoiceprintError::Store(StoreError::InvalidIdentity(_)))
        ));
    }
}
