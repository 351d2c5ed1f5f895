use thiserror::Error;

/// Errors raised while turning encoded audio into samples.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("decode: cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("decode: unsupported or unrecognized format: {0}")]
    Unsupported(String),

    #[error("decode: no decodable audio track")]
    NoTrack,

    #[error("decode: stream does not declare a sample rate")]
    NoSampleRate,

    #[error("decode: codec error: {0}")]
    Codec(String),

    #[error("decode: audio contains no samples")]
    Empty,

    #[error("decode: invalid waveform: {0}")]
    InvalidWaveform(String),
}
