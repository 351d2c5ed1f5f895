//! Container and codec decoding via symphonia.
//!
//! Any format enabled in the workspace's symphonia features can be decoded;
//! reciter recordings are usually MP3 or WAV. The sample rate is kept as-is.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::{DecodeError, Waveform};

/// Decodes an audio file. The file extension, if any, is used as a probe hint.
pub fn decode_file(path: &Path) -> Result<Waveform, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    decode_source(Box::new(file), hint)
}

/// Decodes an in-memory audio buffer.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<Waveform, DecodeError> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    decode_source(Box::new(Cursor::new(bytes)), hint)
}

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<Waveform, DecodeError> {
    let stream = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::NoSampleRate)?;
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut corrupt_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if channels == 0 {
                    channels = spec.channels.count();
                }
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // A damaged frame is dropped; the rest of the stream is still usable.
            Err(SymphoniaError::DecodeError(_)) => corrupt_packets += 1,
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        }
    }

    if samples.is_empty() || channels == 0 {
        return Err(DecodeError::Empty);
    }

    let wave = Waveform::new(samples, sample_rate, channels);
    debug!(
        sample_rate,
        channels,
        frames = wave.frames(),
        corrupt_packets,
        "decoded audio"
    );
    Ok(wave)
}
