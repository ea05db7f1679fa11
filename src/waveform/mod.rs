mod decode;
mod downsample;
mod error;
pub mod playhead;
mod render;

use std::sync::atomic::{AtomicU64, Ordering};

pub use decode::{MAX_AUDIO_BYTES, load_audio_buffer};
pub use downsample::downsample;
pub use error::DecodeError;
pub use render::{RenderKey, ViewportState, WaveformBitmapCache, WaveformRenderer};

static NEXT_CACHE_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_cache_token() -> u64 {
    NEXT_CACHE_TOKEN.fetch_add(1, Ordering::Relaxed)
}

/// Decoded PCM audio held in memory for one envelope computation.
///
/// Samples are interleaved and decoder-normalized to roughly `[-1.0, 1.0]`. The buffer is
/// immutable once built; trailing samples that do not form a whole frame are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    channels: u16,
    sample_rate: u32,
    frame_count: usize,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Wrap interleaved samples. A channel count of zero is treated as mono.
    pub fn new(channels: u16, sample_rate: u32, mut samples: Vec<f32>) -> Self {
        let channels = channels.max(1);
        let frame_count = samples.len() / channels as usize;
        samples.truncate(frame_count * channels as usize);
        Self {
            channels,
            sample_rate,
            frame_count,
            samples,
        }
    }

    /// Number of interleaved channels (at least 1).
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of whole frames.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Interleaved samples for every frame.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Iterate frames as channel slices.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &[f32]> {
        self.samples.chunks_exact(self.channels as usize)
    }

    /// Length of the audio in milliseconds, or 0 when the sample rate is unknown.
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 * 1000.0 / self.sample_rate as f64
    }
}

/// One normalized amplitude per pixel column of the viewport it was computed for.
///
/// Values lie in `[-1.0, 1.0]`. The `cache_token` changes every time an envelope is computed,
/// so render caches can key off it instead of comparing values.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformEnvelope {
    cache_token: u64,
    values: Vec<f32>,
}

impl WaveformEnvelope {
    pub(crate) fn from_values(values: Vec<f32>) -> Self {
        Self {
            cache_token: next_cache_token(),
            values,
        }
    }

    /// Flat envelope of `width` silent columns, drawn when nothing could be decoded.
    pub fn blank(width: usize) -> Self {
        Self::from_values(vec![0.0; width])
    }

    /// Token identifying this computation.
    pub fn cache_token(&self) -> u64 {
        self.cache_token
    }

    /// Amplitude values, one per column.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
