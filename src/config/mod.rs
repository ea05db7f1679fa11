//! Persisted user settings stored as `settings.toml` in the app root.

mod defaults;
mod io;
mod types;

pub use io::{SETTINGS_FILE_NAME, load_from_path, load_or_default, save, save_to_path, settings_path};
pub use types::{
    AppSettings, ConfigError, InteractionSettings, PlaybackSettings, WaveformColor,
    WaveformSettings,
};
