use std::path::Path;

use qari_audio::{Waveform, mfcc};
use tracing::debug;

use crate::fingerprint::{DIMENSION, Fingerprint};
use crate::DecodeError;

/// Turns decoded audio into a [`Fingerprint`].
///
/// Implementations must be pure: the same samples and sample rate always
/// produce the same fingerprint.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait FeatureExtractor: Send + Sync {
    /// Computes a fingerprint from a mono or interleaved multi-channel
    /// waveform at its native sample rate.
    fn extract(&self, wave: &Waveform) -> Result<Fingerprint, DecodeError>;

    /// Decodes an audio file and fingerprints it.
    fn extract_file(&self, path: &Path) -> Result<Fingerprint, DecodeError> {
        let wave = qari_audio::decode_file(path)?;
        self.extract(&wave)
    }
}

/// Default extractor: 13 MFCCs per frame, averaged over the whole clip.
///
/// Averaging makes the fingerprint independent of clip length and of where
/// in the recitation the clip starts.
pub struct MfccExtractor {
    mfcc: mfcc::Extractor,
}

impl MfccExtractor {
    pub fn new() -> Self {
        Self {
            mfcc: mfcc::Extractor::new(mfcc::Config {
                num_coeffs: DIMENSION,
                ..mfcc::Config::default()
            }),
        }
    }
}

impl Default for MfccExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for MfccExtractor {
    fn extract(&self, wave: &Waveform) -> Result<Fingerprint, DecodeError> {
        wave.validate()?;

        let mono = wave.to_mono();
        let frames = self.mfcc.extract(&mono, wave.sample_rate);
        if frames.is_empty() {
            return Err(DecodeError::Empty);
        }

        // num_coeffs is DIMENSION, so every pooled vector fits.
        let pooled = mfcc::mean_pool(&frames);
        let mut values = [0.0f32; DIMENSION];
        values.copy_from_slice(&pooled);

        debug!(
            frames = frames.len(),
            seconds = wave.duration().as_secs_f64(),
            "extracted fingerprint"
        );
        Ok(Fingerprint::new(values))
    }
}
