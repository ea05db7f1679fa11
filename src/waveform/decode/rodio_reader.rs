use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, Source};

use crate::waveform::{AudioBuffer, DecodeError};

/// Decode any container rodio's symphonia backend understands (flac, mp3, ogg, aiff, odd wavs).
pub(super) fn decode_via_rodio(path: &Path, bytes: &[u8]) -> Result<AudioBuffer, DecodeError> {
    let owned: Arc<[u8]> = Arc::from(bytes.to_vec());
    let byte_len = owned.len() as u64;
    let mut builder = Decoder::builder()
        .with_data(std::io::Cursor::new(owned))
        .with_byte_len(byte_len)
        .with_seekable(false);
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        builder = builder.with_hint(extension);
    }
    let decoder = builder.build().map_err(|error| DecodeError::Unsupported {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let sample_rate = decoder.sample_rate();
    let channels = decoder.channels();
    let samples: Vec<f32> = decoder.collect();
    Ok(AudioBuffer::new(channels, sample_rate, samples))
}
