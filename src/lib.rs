//! Library exports for the binary, benchmarks and integration tests.
/// Application directory resolution.
pub mod app_dirs;
/// Playback backend.
pub mod audio;
/// Persisted settings.
pub mod config;
/// egui front end and its controller.
pub mod egui_app;
/// Tracing setup.
pub mod logging;
/// Decoding, downsampling, rendering and playhead mapping.
pub mod waveform;
