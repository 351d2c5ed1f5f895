use std::cmp::Ordering;
use std::fmt;

use crate::builder::{FingerprintDatabase, FingerprintEntry};
use crate::fingerprint::Fingerprint;

/// Compute the cosine distance between two vectors.
///
/// Returns a value in `[0, 2]` where 0 means identical direction and
/// 2 means opposite direction. A vector compared with itself is exactly 0.
///
/// Uses f64 intermediate precision.
/// Returns 2.0 for zero vectors or dimension mismatches.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 2.0;
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;

    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 2.0;
    }

    // sqrt(n * n) == n exactly, which keeps self-distance at 0.
    let similarity = dot / (norm_a * norm_b).sqrt();
    // Clamp to [-1, 1] to handle floating point errors.
    let similarity = similarity.clamp(-1.0, 1.0);
    1.0 - similarity
}

/// Options for [`Matcher`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatcherConfig {
    /// Minimum similarity (`1 - distance`) for the best candidate to count
    /// as a confident match. `None` accepts any best candidate.
    pub min_similarity: Option<f64>,
}

/// Outcome of matching a query against a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The best candidate is accepted.
    Match,
    /// The best candidate falls below the configured similarity floor.
    NoConfidentMatch,
    /// The database is empty.
    NoCandidates,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::NoConfidentMatch => write!(f, "no_confident_match"),
            Self::NoCandidates => write!(f, "no_candidates"),
        }
    }
}

/// Closest database entry to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    /// `None` only when the database is empty.
    pub best: Option<&'a FingerprintEntry>,
    /// Cosine distance to `best`, or `+inf` when there is none.
    pub distance: f64,
}

impl MatchResult<'_> {
    /// `1 - distance`; higher is more similar.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Nearest-neighbour search over a [`FingerprintDatabase`] by cosine
/// distance.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    cfg: MatcherConfig,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: MatcherConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Linear scan for the entry closest to `query`.
    ///
    /// An entry replaces the current best only when strictly closer, so on
    /// exact ties the earliest entry in catalog order wins.
    pub fn find_best<'a>(
        &self,
        query: &Fingerprint,
        database: &'a FingerprintDatabase,
    ) -> MatchResult<'a> {
        let mut best = None;
        let mut best_distance = f64::INFINITY;

        for entry in database {
            let d = cosine_distance(query.as_slice(), entry.fingerprint.as_slice());
            if d < best_distance {
                best_distance = d;
                best = Some(entry);
            }
        }

        MatchResult {
            best,
            distance: best_distance,
        }
    }

    /// Applies the acceptance floor to a result.
    pub fn verdict(&self, result: &MatchResult<'_>) -> Verdict {
        if result.best.is_none() {
            return Verdict::NoCandidates;
        }
        match self.cfg.min_similarity {
            Some(floor) if result.similarity() < floor => Verdict::NoConfidentMatch,
            _ => Verdict::Match,
        }
    }

    /// All entries ordered by ascending distance; ties keep catalog order.
    pub fn rank<'a>(
        &self,
        query: &Fingerprint,
        database: &'a FingerprintDatabase,
    ) -> Vec<(&'a FingerprintEntry, f64)> {
        let mut ranked: Vec<_> = database
            .iter()
            .map(|e| (e, cosine_distance(query.as_slice(), e.fingerprint.as_slice())))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        ranked
    }
}
