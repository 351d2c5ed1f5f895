//! Audio decoding and cepstral analysis.
//!
//! This crate provides the signal side of reciter identification:
//!
//! - `decode`: container/codec decoding (WAV, MP3, FLAC, ...) into a
//!   [`Waveform`] of interleaved `f32` samples at the native sample rate
//! - `mfcc`: Mel-frequency cepstral coefficients over centered STFT frames
//!
//! # Example
//!
//! ```rust
//! use qari_audio::{mfcc, Waveform};
//!
//! // Half a second of a 220Hz tone at 16kHz, mono.
//! let samples: Vec<f32> = (0..8000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16000.0).sin())
//!     .collect();
//! let wave = Waveform::new(samples, 16000, 1);
//!
//! let extractor = mfcc::Extractor::new(mfcc::Config::default());
//! let coeffs = extractor.extract(&wave.to_mono(), wave.sample_rate);
//! assert_eq!(coeffs[0].len(), 13);
//! ```

pub mod decode;
mod error;
pub mod mfcc;
mod waveform;

pub use decode::{decode_bytes, decode_file};
pub use error::DecodeError;
pub use waveform::Waveform;
