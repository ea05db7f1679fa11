#![deny(missing_docs)]

//! Entry point for the hivewave waveform player.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::path::PathBuf;

use eframe::egui;
use hivewave::audio::{AudioPlayer, MediaPlayback};
use hivewave::config;
use hivewave::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use hivewave::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1100.0, 420.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "hivewave",
        native_options,
        Box::new(move |_cc| {
            let settings = match config::load_or_default() {
                Ok(settings) => settings,
                Err(err) => {
                    let app: Box<dyn eframe::App> = Box::new(LaunchError {
                        message: format!("Failed to load settings: {err}"),
                    });
                    return Ok(app);
                }
            };
            let player = match AudioPlayer::new() {
                Ok(player) => Some(Box::new(player) as Box<dyn MediaPlayback>),
                Err(err) => {
                    tracing::warn!("Playback disabled: {err}");
                    None
                }
            };
            let app: Box<dyn eframe::App> = Box::new(EguiApp::new(settings, player, files));
            Ok(app)
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
