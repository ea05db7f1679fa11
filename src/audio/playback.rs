use std::path::{Path, PathBuf};

use thiserror::Error;

/// Snapshot of the transport as reported by the playback backend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// Current position in milliseconds.
    pub position_ms: f64,
    /// Total length in milliseconds; 0 when nothing is loaded or the length is unknown.
    pub duration_ms: f64,
    pub playing: bool,
}

impl PlaybackState {
    /// True when a seek target can be computed from this state.
    pub fn is_seekable(&self) -> bool {
        self.duration_ms > 0.0
    }
}

/// Errors from the playback backend.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No audio output available: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path} for playback: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("Audio seek failed: {0}")]
    Seek(#[from] rodio::source::SeekError),
    #[error("Load an audio file first")]
    NothingLoaded,
}

/// Operations the waveform view needs from whatever plays the audio.
pub trait MediaPlayback {
    /// Replace the current track with `path`, paused at the start.
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Drop the current track.
    fn unload(&mut self);

    /// Current position, length and transport flag.
    fn state(&self) -> PlaybackState;

    /// Jump to `position_ms`.
    fn seek(&mut self, position_ms: f64) -> Result<(), PlaybackError>;

    /// Start or pause playback.
    fn set_playing(&mut self, playing: bool);

    /// Output volume in `0.0..=1.0`.
    fn set_volume(&mut self, _volume: f32) {}
}
