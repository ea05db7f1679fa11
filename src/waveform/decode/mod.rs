mod rodio_reader;
mod wav_reader;

use std::io::Read;
use std::path::Path;

use crate::waveform::{AudioBuffer, DecodeError};

/// Files larger than this are rejected instead of being read into memory.
pub const MAX_AUDIO_BYTES: u64 = 512 * 1024 * 1024;

/// Open `path`, decode every frame and return the PCM buffer.
///
/// WAV files go through `hound`; anything `hound` rejects is handed to the symphonia-backed
/// `rodio` decoder. Zero-frame audio is reported as [`DecodeError::Empty`].
pub fn load_audio_buffer(path: &Path) -> Result<AudioBuffer, DecodeError> {
    let bytes = read_audio_bytes_with_limit(path, MAX_AUDIO_BYTES)?;
    decode_bytes(path, &bytes)
}

pub(crate) fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<AudioBuffer, DecodeError> {
    let buffer = match wav_reader::decode_wav(path, bytes)? {
        Some(buffer) => buffer,
        None => rodio_reader::decode_via_rodio(path, bytes)?,
    };
    if buffer.frame_count() == 0 {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(
        "Decoded {}: {} ch, {} Hz, {} frames",
        path.display(),
        buffer.channels(),
        buffer.sample_rate(),
        buffer.frame_count()
    );
    Ok(buffer)
}

fn read_audio_bytes_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>, DecodeError> {
    let read_error = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DecodeError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            DecodeError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    };
    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > max_bytes {
        return Err(DecodeError::TooLarge {
            path: path.to_path_buf(),
            size_bytes: size,
            limit_bytes: max_bytes,
        });
    }
    let file = std::fs::File::open(path).map_err(read_error)?;
    let mut bytes = Vec::new();
    file.take(max_bytes + 1)
        .read_to_end(&mut bytes)
        .map_err(read_error)?;
    if bytes.len() as u64 > max_bytes {
        return Err(DecodeError::TooLarge {
            path: path.to_path_buf(),
            size_bytes: bytes.len() as u64,
            limit_bytes: max_bytes,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_audio_buffer(&dir.path().join("nope.wav")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn rejects_files_over_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.wav");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(10).unwrap();

        let err = read_audio_bytes_with_limit(&path, 5).unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { .. }));
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.bin");
        std::fs::write(&path, [0_u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        let err = load_audio_buffer(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }), "{err}");
    }

    #[test]
    fn zero_frame_wav_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, &[]);
        let err = load_audio_buffer(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Empty { .. }), "{err}");
    }

    #[test]
    fn loads_stereo_wav_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, &[0, 100, -100, 0, 200, -200]);
        let buffer = load_audio_buffer(&path).unwrap();
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate(), 8_000);
        assert_eq!(buffer.frame_count(), 3);
    }
}
