//! Mel-frequency cepstral coefficients from mono PCM.
//!
//! The pipeline follows the common analysis defaults for music and speech
//! toolkits, so fingerprints stay comparable with other implementations:
//!
//! - Centered frames: `fft_size / 2` zeros of padding on both sides
//! - FFTSize: 2048, HopSize: 512, periodic Hann window
//! - Power spectrum into 128 Slaney-normalised mel bands, 0 Hz to Nyquist
//! - Decibels `10 * log10(max(1e-10, S))`, floored at `max - 80 dB` per clip
//! - Orthonormal DCT-II, first 13 coefficients
//!
//! No resampling takes place: the filterbank is laid out for the clip's
//! own sample rate.

mod dct;
mod fft;
mod mel;

pub use mel::{hann_window, hz_to_mel, mel_to_hz};

use dct::Dct;
use tracing::debug;

/// Configuration for MFCC extraction.
#[derive(Debug, Clone)]
pub struct Config {
    /// FFT and window length in samples. Must be a power of two.
    pub fft_size: usize,
    pub hop_size: usize,
    pub num_mels: usize,
    /// Number of cepstral coefficients kept per frame.
    pub num_coeffs: usize,
    pub low_freq: f64,
    /// Upper edge of the filterbank; `None` means Nyquist.
    pub high_freq: Option<f64>,
    /// Power floor before taking the logarithm.
    pub amin: f64,
    /// Dynamic range kept below the clip's loudest mel cell.
    pub top_db: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            hop_size: 512,
            num_mels: 128,
            num_coeffs: 13,
            low_freq: 0.0,
            high_freq: None,
            amin: 1e-10,
            top_db: Some(80.0),
        }
    }
}

/// MFCC extractor. Cheap to share; holds only the window and DCT basis.
pub struct Extractor {
    cfg: Config,
    window: Vec<f64>,
    dct: Dct,
}

impl Extractor {
    /// Creates a new extractor with the given config.
    ///
    /// # Panics
    ///
    /// Panics if `fft_size` is not a power of two, or `hop_size` or
    /// `num_mels` is zero.
    pub fn new(cfg: Config) -> Self {
        assert!(cfg.fft_size.is_power_of_two(), "fft_size must be a power of two");
        assert!(cfg.hop_size > 0, "hop_size must be positive");
        assert!(cfg.num_mels > 0, "num_mels must be positive");
        let window = mel::hann_window(cfg.fft_size);
        let dct = Dct::new(cfg.num_mels, cfg.num_coeffs);
        Self { cfg, window, dct }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of frames produced for `num_samples` mono samples.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        if num_samples == 0 {
            return 0;
        }
        1 + num_samples / self.cfg.hop_size
    }

    /// Extracts MFCCs from normalized mono samples (range [-1, 1]).
    ///
    /// Returns `[T][num_coeffs]` with `T = 1 + len(pcm) / hop_size`, or an
    /// empty matrix when `pcm` is empty or `sample_rate` is zero.
    pub fn extract(&self, pcm: &[f32], sample_rate: u32) -> Vec<Vec<f32>> {
        let cfg = &self.cfg;
        let num_frames = self.num_frames(pcm.len());
        if num_frames == 0 || sample_rate == 0 {
            return Vec::new();
        }

        let nfft = cfg.fft_size;
        let half_fft = nfft / 2 + 1;
        let pad = nfft / 2;
        let nyquist = sample_rate as f64 / 2.0;
        let high_freq = cfg.high_freq.unwrap_or(nyquist).min(nyquist);
        let mel_bank =
            mel::mel_filter_bank(cfg.num_mels, nfft, sample_rate as f64, cfg.low_freq, high_freq);
        let supports: Vec<_> = mel_bank.iter().map(|f| mel::support(f)).collect();

        let num_mels = cfg.num_mels;
        let mut log_mel = vec![0.0f64; num_frames * num_mels];
        let mut max_db = f64::NEG_INFINITY;
        let mut real = vec![0.0f64; nfft];
        let mut imag = vec![0.0f64; nfft];
        let mut power = vec![0.0f64; half_fft];

        for t in 0..num_frames {
            // Frame t covers padded positions [t*hop, t*hop + nfft).
            let start = (t * cfg.hop_size) as isize - pad as isize;
            for i in 0..nfft {
                let idx = start + i as isize;
                let s = if idx >= 0 && (idx as usize) < pcm.len() {
                    pcm[idx as usize] as f64
                } else {
                    0.0
                };
                real[i] = s * self.window[i];
            }
            imag.fill(0.0);
            fft::fft(&mut real, &mut imag);

            for k in 0..half_fft {
                power[k] = real[k] * real[k] + imag[k] * imag[k];
            }

            let bands = &mut log_mel[t * num_mels..(t + 1) * num_mels];
            for (m, (filter, range)) in mel_bank.iter().zip(&supports).enumerate() {
                let energy: f64 = filter[range.clone()]
                    .iter()
                    .zip(&power[range.clone()])
                    .map(|(w, p)| w * p)
                    .sum();
                let db = 10.0 * energy.max(cfg.amin).log10();
                if db > max_db {
                    max_db = db;
                }
                bands[m] = db;
            }
        }

        if let Some(top_db) = cfg.top_db {
            let floor = max_db - top_db;
            for v in log_mel.iter_mut() {
                if *v < floor {
                    *v = floor;
                }
            }
        }

        debug!(
            frames = num_frames,
            sample_rate,
            max_db,
            "computed mfcc matrix"
        );

        log_mel
            .chunks_exact(num_mels)
            .map(|bands| self.dct.apply(bands).into_iter().map(|c| c as f32).collect())
            .collect()
    }
}

/// Averages each coefficient across frames.
///
/// Returns an empty vector for an empty matrix.
pub fn mean_pool(frames: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };
    let mut sums = vec![0.0f64; first.len()];
    for frame in frames {
        for (acc, &v) in sums.iter_mut().zip(frame) {
            *acc += v as f64;
        }
    }
    let t = frames.len() as f64;
    sums.into_iter().map(|s| (s / t) as f32).collect()
}
