use std::borrow::Cow;
use std::time::Duration;

use crate::DecodeError;

/// Decoded PCM audio at its native sample rate.
///
/// Samples are interleaved `f32` in `[-1, 1]`; a stereo waveform stores
/// `L R L R ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: usize) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Checks that the waveform can be analysed: non-zero rate and channel
    /// count, and at least one full sample frame.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.sample_rate == 0 {
            return Err(DecodeError::InvalidWaveform("sample rate is zero".into()));
        }
        if self.channels == 0 {
            return Err(DecodeError::InvalidWaveform("channel count is zero".into()));
        }
        if self.frames() == 0 {
            return Err(DecodeError::Empty);
        }
        Ok(())
    }

    /// Averages all channels of each frame into a single mono sample.
    ///
    /// A trailing partial frame is dropped.
    pub fn to_mono(&self) -> Cow<'_, [f32]> {
        if self.channels <= 1 {
            return Cow::Borrowed(&self.samples);
        }
        let ch = self.channels;
        Cow::Owned(
            self.samples
                .chunks_exact(ch)
                .map(|frame| {
                    let sum: f64 = frame.iter().map(|&s| s as f64).sum();
                    (sum / ch as f64) as f32
                })
                .collect(),
        )
    }
}
