use std::path::PathBuf;
use thiserror::Error;

/// Reasons an audio file could not be turned into an [`AudioBuffer`](super::AudioBuffer).
///
/// Callers render a blank waveform for every variant; none of them is fatal.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("File missing: {path}")]
    Missing { path: PathBuf },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is {size_bytes} bytes, over the {limit_bytes} byte limit")]
    TooLarge {
        path: PathBuf,
        size_bytes: u64,
        limit_bytes: u64,
    },
    #[error("Unsupported audio in {path}: {message}")]
    Unsupported { path: PathBuf, message: String },
    #[error("No audio frames in {path}")]
    Empty { path: PathBuf },
    #[error("Sample error in {path}: {source}")]
    Sample {
        path: PathBuf,
        source: hound::Error,
    },
}

impl DecodeError {
    /// True when the file does not exist on disk.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}
