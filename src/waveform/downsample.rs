//! Reduce a PCM buffer to one amplitude per pixel column.
//!
//! Channels are folded by averaging each frame. The folded signal is scaled down only when its
//! peak exceeds unit amplitude. Each column then keeps the signed sample with the largest
//! magnitude among the frames it covers (first one wins on ties), so transients stay visible
//! at any zoom level and identical input always gives identical output.

use super::{AudioBuffer, WaveformEnvelope};

/// Compute an envelope of exactly `width` columns for `buffer`.
///
/// A zero width yields an empty envelope and a buffer without frames yields a flat one. When
/// there are fewer frames than columns, each column repeats the frame nearest its centre.
pub fn downsample(buffer: &AudioBuffer, width: usize) -> WaveformEnvelope {
    if width == 0 {
        return WaveformEnvelope::from_values(Vec::new());
    }
    if buffer.frame_count() == 0 {
        return WaveformEnvelope::blank(width);
    }
    let mut mono = fold_channels(buffer);
    normalize_peak(&mut mono);
    WaveformEnvelope::from_values(column_peaks(&mono, width))
}

fn fold_channels(buffer: &AudioBuffer) -> Vec<f32> {
    let channels = buffer.channels() as f32;
    buffer
        .frames()
        .map(|frame| {
            let sum: f32 = frame.iter().copied().map(finite_or_silent).sum();
            sum / channels
        })
        .collect()
}

fn finite_or_silent(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}

fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak > 1.0 {
        let gain = 1.0 / peak;
        for sample in samples.iter_mut() {
            *sample = (*sample * gain).clamp(-1.0, 1.0);
        }
    }
}

fn column_peaks(samples: &[f32], width: usize) -> Vec<f32> {
    let frame_count = samples.len();
    (0..width)
        .map(|column| {
            let (start, end) = column_span(column, width, frame_count);
            signed_peak(&samples[start..end])
        })
        .collect()
}

/// Frame range `[start, end)` backing `column`, computed in integer math so the split is exact.
fn column_span(column: usize, width: usize, frame_count: usize) -> (usize, usize) {
    let start = column * frame_count / width;
    let end = (column + 1) * frame_count / width;
    if end > start {
        return (start, end);
    }
    let nearest = ((2 * column + 1) * frame_count / (2 * width)).min(frame_count - 1);
    (nearest, nearest + 1)
}

fn signed_peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .copied()
        .fold(0.0_f32, |best, s| if s.abs() > best.abs() { s } else { best })
}
