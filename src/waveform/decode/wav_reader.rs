use std::path::Path;

use hound::SampleFormat;

use crate::waveform::{AudioBuffer, DecodeError};

/// Decode WAV bytes with `hound`, returning `None` when the bytes are not a WAV `hound` accepts.
pub(super) fn decode_wav(path: &Path, bytes: &[u8]) -> Result<Option<AudioBuffer>, DecodeError> {
    let mut reader = match hound::WavReader::new(std::io::Cursor::new(bytes)) {
        Ok(reader) => reader,
        Err(_) => return Ok(None),
    };
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => read_float_samples(path, &mut reader)?,
        SampleFormat::Int => read_int_samples(path, &mut reader, spec.bits_per_sample)?,
    };
    Ok(Some(AudioBuffer::new(
        spec.channels,
        spec.sample_rate,
        samples,
    )))
}

fn read_float_samples(
    path: &Path,
    reader: &mut hound::WavReader<std::io::Cursor<&[u8]>>,
) -> Result<Vec<f32>, DecodeError> {
    reader
        .samples::<f32>()
        .map(|s| s.map_err(|source| sample_error(path, source)))
        .collect()
}

fn read_int_samples(
    path: &Path,
    reader: &mut hound::WavReader<std::io::Cursor<&[u8]>>,
    bits_per_sample: u16,
) -> Result<Vec<f32>, DecodeError> {
    let scale = (1i64 << bits_per_sample.saturating_sub(1)).max(1) as f32;
    reader
        .samples::<i32>()
        .map(|s| {
            s.map(|v| v as f32 / scale)
                .map_err(|source| sample_error(path, source))
        })
        .collect()
}

fn sample_error(path: &Path, source: hound::Error) -> DecodeError {
    DecodeError::Sample {
        path: path.to_path_buf(),
        source,
    }
}
