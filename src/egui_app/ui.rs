//! egui renderer for the waveform player.

mod pointer_capture;
mod style;
mod waveform_view;

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui::{
    self, ColorImage, Key, RichText, TextureHandle, Ui, color_picker::Alpha,
};
use rfd::FileDialog;

use crate::audio::MediaPlayback;
use crate::config::AppSettings;
use crate::egui_app::controller::WaveformController;
pub use pointer_capture::EguiPointerCapture;

/// Smallest window the layout still fits in.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(640.0, 360.0);
const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "aif", "aiff"];

/// Renders the egui UI on top of the waveform controller.
pub struct EguiApp {
    controller: WaveformController,
    capture: Rc<EguiPointerCapture>,
    visuals_set: bool,
    waveform_tex: Option<TextureHandle>,
    uploaded_image: Option<Arc<ColorImage>>,
}

impl EguiApp {
    /// `files` seed the file list; the last selected file is restored when it still exists.
    pub fn new(
        settings: AppSettings,
        player: Option<Box<dyn MediaPlayback>>,
        files: Vec<PathBuf>,
    ) -> Self {
        let capture = Rc::new(EguiPointerCapture::default());
        let restore = settings.last_selected.clone().filter(|path| path.is_file());
        let mut controller = WaveformController::new(settings, player, capture.clone());
        for path in files.iter().cloned() {
            controller.ui.library.insert(path);
        }
        controller.select(restore.or_else(|| files.first().cloned()));
        Self {
            controller,
            capture,
            visuals_set: false,
            waveform_tex: None,
            uploaded_image: None,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn persist_settings(&self) {
        if let Err(err) = self.controller.save_settings() {
            tracing::warn!("Failed to save settings: {err}");
        }
    }

    fn open_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Audio", AUDIO_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.controller.select(Some(path));
        self.persist_settings();
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(Key::Space)) {
            self.controller.toggle_playback();
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open…").clicked() {
                    self.open_via_dialog();
                }
                ui.separator();
                let playing = self.controller.playback().playing;
                let label = if playing { "Pause" } else { "Play" };
                let can_play =
                    self.controller.has_player() && self.controller.playback().is_seekable();
                if ui.add_enabled(can_play, egui::Button::new(label)).clicked() {
                    self.controller.toggle_playback();
                }
                ui.separator();
                self.render_color_picker(ui);
                ui.separator();
                let mut volume = self.controller.settings().playback.volume;
                let slider = ui.add(egui::Slider::new(&mut volume, 0.0..=1.0).text("Volume"));
                if slider.changed() {
                    self.controller.set_volume(volume);
                }
                if slider.drag_stopped() || slider.lost_focus() {
                    self.persist_settings();
                }
                if !self.controller.has_player() {
                    ui.label(RichText::new("No audio output").color(palette.warning));
                }
            });
        });
    }

    fn render_color_picker(&mut self, ui: &mut Ui) {
        ui.label("Waveform");
        let mut color = self.controller.viewport().color;
        let response = egui::color_picker::color_edit_button_srgba(ui, &mut color, Alpha::Opaque);
        if response.changed() && self.controller.set_waveform_color(color) {
            self.persist_settings();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let paths = dropped_audio_paths(dropped);
        let Some(first) = paths.first().cloned() else {
            self.controller.ui.status.notice = Some("Drop an audio file to open it".into());
            return;
        };
        for path in paths {
            self.controller.ui.library.insert(path);
        }
        self.controller.select(Some(first));
        self.persist_settings();
    }

    fn render_file_list(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("files")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.label(RichText::new("Files").strong());
                ui.add_space(6.0);
                let mut clicked = None;
                egui::ScrollArea::vertical()
                    .id_salt("files_scroll")
                    .show(ui, |ui| {
                        let library = &self.controller.ui.library;
                        for (index, path) in library.files.iter().enumerate() {
                            let name = path
                                .file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_else(|| path.display().to_string());
                            let response = ui
                                .selectable_label(library.selected == Some(index), name)
                                .on_hover_text(path.display().to_string());
                            if response.clicked() {
                                clicked = Some(index);
                            }
                        }
                    });
                if let Some(index) = clicked {
                    if self.controller.ui.library.selected != Some(index) {
                        self.controller.select_row(index);
                        self.persist_settings();
                    }
                }
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let status = &self.controller.ui.status;
                match self.controller.selected() {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.label(RichText::new("No file selected").color(palette.text_muted)),
                };
                if let Some(track) = status.track {
                    ui.separator();
                    ui.label(format!(
                        "{} ch · {} Hz · {}",
                        track.channels,
                        track.sample_rate,
                        format_time(track.duration_ms)
                    ));
                }
                let playback = self.controller.playback();
                if playback.duration_ms > 0.0 {
                    ui.separator();
                    ui.label(format!(
                        "{} / {}",
                        format_time(playback.position_ms),
                        format_time(playback.duration_ms)
                    ));
                }
                if let Some(notice) = status.notice.as_ref() {
                    ui.separator();
                    ui.label(RichText::new(notice).color(palette.warning));
                }
            });
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_loader();
        self.controller.tick();
        self.handle_hotkeys(ctx);
        self.handle_dropped_files(ctx);
        self.render_top_bar(ctx);
        self.render_status(ctx);
        self.render_file_list(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_waveform(ui);
        });
        ctx.request_repaint_after(self.controller.tick_interval());
    }
}

fn dropped_audio_paths(files: Vec<egui::DroppedFile>) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter_map(|file| file.path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    AUDIO_EXTENSIONS
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(ext))
                })
        })
        .collect()
}

/// `m:ss.mmm`
fn format_time(ms: f64) -> String {
    let total_ms = ms.max(0.0).round() as u64;
    format!(
        "{}:{:02}.{:03}",
        total_ms / 60_000,
        (total_ms / 1_000) % 60,
        total_ms % 1_000
    )
}
