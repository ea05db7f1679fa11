//! Conversions between playback time and horizontal pixel offsets.

/// Pixel offset of `position_ms` within a `width`-pixel view of `duration_ms` of audio.
///
/// Returns 0 when the duration is zero, negative or not a number.
pub fn time_to_pixel(position_ms: f64, duration_ms: f64, width: f32) -> f32 {
    if !(duration_ms > 0.0) || !position_ms.is_finite() || !width.is_finite() {
        return 0.0;
    }
    (width as f64 * (position_ms / duration_ms)) as f32
}

/// Playback time in milliseconds under pixel `x` of a `width`-pixel view.
///
/// Returns 0 when the width is zero, negative or not a number.
pub fn pixel_to_time(x: f32, width: f32, duration_ms: f64) -> f64 {
    if !(width > 0.0) || !x.is_finite() || !duration_ms.is_finite() {
        return 0.0;
    }
    duration_ms * (x as f64 / width as f64)
}
