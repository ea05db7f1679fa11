use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::*;
use crate::egui_app::controller::interaction::HoverTolerance;

/// Everything persisted in `settings.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    /// File shown when the app last closed.
    #[serde(default)]
    pub last_selected: Option<PathBuf>,
    #[serde(default)]
    pub waveform: WaveformSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
}

impl AppSettings {
    pub(super) fn normalized(mut self) -> Self {
        self.playback.volume = clamp_volume(self.playback.volume);
        self.playback.tick_interval_ms = clamp_tick_interval(self.playback.tick_interval_ms);
        self.playback.drag_tick_interval_ms =
            clamp_tick_interval(self.playback.drag_tick_interval_ms);
        self.interaction.hover_tolerance_x_px =
            clamp_tolerance(self.interaction.hover_tolerance_x_px);
        self.interaction.hover_tolerance_y_px =
            clamp_tolerance(self.interaction.hover_tolerance_y_px);
        self
    }
}

/// Config keys: `color`, `background`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSettings {
    #[serde(default = "default_waveform_color")]
    pub color: WaveformColor,
    #[serde(default = "default_background_color")]
    pub background: WaveformColor,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            color: default_waveform_color(),
            background: default_background_color(),
        }
    }
}

/// Config keys: `tick_interval_ms`, `drag_tick_interval_ms`, `volume`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Playhead refresh interval during normal playback.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Refresh interval while the playhead is being dragged.
    #[serde(default = "default_drag_tick_interval_ms")]
    pub drag_tick_interval_ms: u64,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl PlaybackSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn drag_tick_interval(&self) -> Duration {
        Duration::from_millis(self.drag_tick_interval_ms)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            drag_tick_interval_ms: default_drag_tick_interval_ms(),
            volume: default_volume(),
        }
    }
}

/// Config keys: `hover_tolerance_x_px`, `hover_tolerance_y_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    #[serde(default = "default_hover_tolerance_px")]
    pub hover_tolerance_x_px: f32,
    #[serde(default = "default_hover_tolerance_px")]
    pub hover_tolerance_y_px: f32,
}

impl InteractionSettings {
    pub fn hover_tolerance(&self) -> HoverTolerance {
        HoverTolerance {
            x: self.hover_tolerance_x_px,
            y: self.hover_tolerance_y_px,
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            hover_tolerance_x_px: default_hover_tolerance_px(),
            hover_tolerance_y_px: default_hover_tolerance_px(),
        }
    }
}

/// Opaque RGB color stored as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WaveformColor(Color32);

impl WaveformColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Color32::from_rgb(r, g, b))
    }

    /// Drops any alpha; the waveform is always drawn opaque.
    pub fn from_color32(color: Color32) -> Self {
        Self::from_rgb(color.r(), color.g(), color.b())
    }

    pub fn to_color32(self) -> Color32 {
        self.0
    }
}

impl fmt::Display for WaveformColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.r(), self.0.g(), self.0.b())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color {0:?}: expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for WaveformColor {
    type Err = ParseColorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColorError(text.to_string());
        let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for WaveformColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WaveformColor> for String {
    fn from(color: WaveformColor) -> Self {
        color.to_string()
    }
}

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No suitable config directory available")]
    NoConfigDir,
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}
