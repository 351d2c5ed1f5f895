//! Slaney mel scale, analysis window and filterbank generation.

use std::f64::consts::PI;
use std::ops::Range;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Periodic Hann window of length `n` (the DFT-even variant used for STFT).
pub fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Converts Hz to the Slaney mel scale: linear below 1 kHz, logarithmic above.
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Inverse of [`hz_to_mel`].
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Creates an area-normalised triangular mel filterbank.
///
/// Returns `[num_mels][fft_size / 2 + 1]`. Filter edges are placed at
/// `num_mels + 2` points equally spaced in mel between `low_freq` and
/// `high_freq`; the slopes are evaluated at the exact FFT bin frequencies.
pub fn mel_filter_bank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: f64,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let bin_freqs: Vec<f64> = (0..half_fft)
        .map(|k| k as f64 * sample_rate / fft_size as f64)
        .collect();

    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);
    let step = (high_mel - low_mel) / (num_mels + 1) as f64;
    let edges: Vec<f64> = (0..num_mels + 2)
        .map(|i| mel_to_hz(low_mel + i as f64 * step))
        .collect();

    let mut bank = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
        let norm = 2.0 / (right - left);
        let filter = bin_freqs
            .iter()
            .map(|&f| {
                let rising = (f - left) / (center - left);
                let falling = (right - f) / (right - center);
                rising.min(falling).max(0.0) * norm
            })
            .collect();
        bank.push(filter);
    }
    bank
}

/// Range of bins where `filter` is non-zero; empty if it is zero everywhere.
pub fn support(filter: &[f64]) -> Range<usize> {
    match filter.iter().position(|&w| w != 0.0) {
        Some(start) => {
            let end = filter.iter().rposition(|&w| w != 0.0).map_or(start, |e| e + 1);
            start..end
        }
        None => 0..0,
    }
}
