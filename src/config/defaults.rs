use super::types::WaveformColor;

pub(super) const MIN_TICK_INTERVAL_MS: u64 = 1;
pub(super) const MAX_TICK_INTERVAL_MS: u64 = 1_000;
pub(super) const MAX_HOVER_TOLERANCE_PX: f32 = 50.0;

pub(super) fn default_waveform_color() -> WaveformColor {
    WaveformColor::from_rgb(0xfa, 0xf6, 0xf0)
}

pub(super) fn default_background_color() -> WaveformColor {
    WaveformColor::from_rgb(0x12, 0x10, 0x0e)
}

pub(super) fn default_tick_interval_ms() -> u64 {
    100
}

pub(super) fn default_drag_tick_interval_ms() -> u64 {
    5
}

pub(super) fn default_volume() -> f32 {
    1.0
}

pub(super) fn default_hover_tolerance_px() -> f32 {
    crate::egui_app::controller::interaction::DEFAULT_HOVER_TOLERANCE_PX
}

pub(super) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        default_volume()
    }
}

pub(super) fn clamp_tick_interval(ms: u64) -> u64 {
    ms.clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS)
}

pub(super) fn clamp_tolerance(px: f32) -> f32 {
    if px.is_finite() {
        px.clamp(0.0, MAX_HOVER_TOLERANCE_PX)
    } else {
        default_hover_tolerance_px()
    }
}
