//! Wires the waveform pipeline, playback and pointer handling together for the egui view.

pub mod envelope_loader;
pub mod interaction;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use egui::{Color32, ColorImage};

use crate::audio::{MediaPlayback, PlaybackState};
use crate::config::{self, AppSettings, ConfigError, WaveformColor};
use crate::egui_app::state::{StatusState, TrackInfo, UiState};
use crate::waveform::{
    ViewportState, WaveformBitmapCache, WaveformEnvelope, WaveformRenderer,
};
use envelope_loader::{EnvelopeJob, EnvelopeResult, spawn_envelope_loader};
use interaction::{
    InteractionController, InteractionPhase, PlayheadLayout, PointerCaptureHost, PointerCursor,
};

struct PendingEnvelope {
    request_id: u64,
}

/// Owns everything the waveform view needs and reacts to host events.
pub struct WaveformController {
    pub ui: UiState,
    settings: AppSettings,
    viewport: ViewportState,
    playback: PlaybackState,
    selected: Option<PathBuf>,
    envelope: Option<WaveformEnvelope>,
    renderer: WaveformRenderer,
    bitmap_cache: WaveformBitmapCache,
    interaction: InteractionController,
    player: Option<Box<dyn MediaPlayback>>,
    loader_tx: Sender<EnvelopeJob>,
    loader_rx: Receiver<EnvelopeResult>,
    next_request_id: u64,
    pending: Option<PendingEnvelope>,
}

impl WaveformController {
    /// `player` is `None` when no audio output is available; the waveform still loads.
    pub fn new(
        settings: AppSettings,
        player: Option<Box<dyn MediaPlayback>>,
        capture_host: Rc<dyn PointerCaptureHost>,
    ) -> Self {
        let (loader_tx, loader_rx) = spawn_envelope_loader();
        let mut controller = Self {
            ui: UiState::default(),
            viewport: ViewportState {
                width: 0,
                height: 0,
                color: settings.waveform.color.to_color32(),
            },
            renderer: WaveformRenderer::new(settings.waveform.background.to_color32()),
            interaction: InteractionController::new(
                capture_host,
                settings.interaction.hover_tolerance(),
            ),
            settings,
            playback: PlaybackState::default(),
            selected: None,
            envelope: None,
            bitmap_cache: WaveformBitmapCache::new(),
            player,
            loader_tx,
            loader_rx,
            next_request_id: 0,
            pending: None,
        };
        let volume = controller.settings.playback.volume;
        if let Some(player) = controller.player.as_deref_mut() {
            player.set_volume(volume);
        }
        controller
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Persist the current settings to the app root.
    pub fn save_settings(&self) -> Result<(), ConfigError> {
        config::save(&self.settings)
    }

    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn envelope(&self) -> Option<&WaveformEnvelope> {
        self.envelope.as_ref()
    }

    /// True while an envelope for the current selection and width is being computed.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.interaction.phase()
    }

    pub fn cursor(&self) -> PointerCursor {
        self.interaction.cursor()
    }

    pub fn background(&self) -> Color32 {
        self.renderer.background()
    }

    /// Number of bitmaps drawn so far.
    pub fn render_count(&self) -> u64 {
        self.bitmap_cache.render_count()
    }

    /// Select `path` (or nothing) for display and playback.
    ///
    /// Any drag is abandoned, the previous waveform is dropped and results still in flight for
    /// the old selection are ignored when they arrive.
    pub fn select(&mut self, path: Option<PathBuf>) {
        self.interaction.reset();
        self.envelope = None;
        self.bitmap_cache.invalidate();
        self.pending = None;
        self.ui.status = StatusState::default();
        self.ui.library.selected = None;
        if let Some(path) = path.clone() {
            self.ui.library.selected = Some(self.ui.library.insert(path));
        }
        self.settings.last_selected = path.clone();
        self.selected = path;

        if let Some(player) = self.player.as_deref_mut() {
            match self.selected.as_deref() {
                Some(path) => {
                    if let Err(err) = player.load(path) {
                        tracing::warn!("Playback unavailable for {}: {err}", path.display());
                        self.ui.status.notice = Some(err.to_string());
                    }
                }
                None => player.unload(),
            }
        }
        self.refresh_playback();
        self.request_envelope();
    }

    /// Select the row at `index` in the file list.
    pub fn select_row(&mut self, index: usize) {
        if let Some(path) = self.ui.library.files.get(index).cloned() {
            self.select(Some(path));
        }
    }

    /// React to a new viewport size. Returns true when anything changed.
    ///
    /// A width change needs a new envelope; the current bitmap keeps being shown until it lands.
    /// A height change only redraws the bitmap.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.viewport.width == width && self.viewport.height == height {
            return false;
        }
        let width_changed = self.viewport.width != width;
        self.viewport.width = width;
        self.viewport.height = height;
        if width_changed {
            self.request_envelope();
        }
        true
    }

    /// Change the waveform color. Returns true when it differs from the current one.
    pub fn set_waveform_color(&mut self, color: Color32) -> bool {
        let color = WaveformColor::from_color32(color);
        if self.settings.waveform.color == color {
            return false;
        }
        self.settings.waveform.color = color;
        self.viewport.color = color.to_color32();
        true
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.settings.playback.volume = volume;
        if let Some(player) = self.player.as_deref_mut() {
            player.set_volume(volume);
        }
    }

    pub fn toggle_playback(&mut self) {
        let playing = !self.playback.playing;
        if let Some(player) = self.player.as_deref_mut() {
            player.set_playing(playing);
        }
        self.refresh_playback();
    }

    /// Apply finished envelopes from the worker. Returns true when the display changed.
    pub fn poll_loader(&mut self) -> bool {
        let mut applied = false;
        while let Ok(result) = self.loader_rx.try_recv() {
            let current = self
                .pending
                .as_ref()
                .is_some_and(|pending| pending.request_id == result.request_id);
            if !current {
                tracing::debug!(
                    "Discarding stale envelope {} for {}",
                    result.request_id,
                    result.path.display()
                );
                continue;
            }
            self.pending = None;
            self.apply_envelope(result);
            applied = true;
        }
        applied
    }

    /// Timer tick: pull the transport state from the player.
    pub fn tick(&mut self) {
        self.refresh_playback();
    }

    /// Timer tick from an external transport.
    pub fn update_playback(&mut self, state: PlaybackState) {
        self.playback = state;
    }

    /// How soon the next tick should run.
    pub fn tick_interval(&self) -> Duration {
        match self.interaction.phase() {
            InteractionPhase::Dragging => self.settings.playback.drag_tick_interval(),
            _ => self.settings.playback.tick_interval(),
        }
    }

    pub fn layout(&self) -> PlayheadLayout {
        PlayheadLayout {
            width: self.viewport.width as f32,
            position_ms: self.playback.position_ms,
            duration_ms: self.playback.duration_ms,
        }
    }

    /// Where to draw the playhead: under the pointer while dragging, else at the transport time.
    pub fn playhead_x(&self) -> f32 {
        let layout = self.layout();
        match self.interaction.drag_x() {
            Some(x) => x.clamp(0.0, layout.width.max(0.0)),
            None => layout.playhead_x(),
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) -> PointerCursor {
        let layout = self.layout();
        self.interaction.pointer_moved(x, y, &layout)
    }

    pub fn pointer_pressed(&mut self, x: f32) -> bool {
        self.interaction.pointer_pressed(x)
    }

    /// Returns the seek target when the release ended a drag on a loaded track.
    pub fn pointer_released(&mut self, x: f32) -> Option<f64> {
        let layout = self.layout();
        let target = match self.player.as_deref_mut() {
            Some(player) => self.interaction.pointer_released(x, &layout, player),
            None => {
                self.interaction.reset();
                None
            }
        };
        if target.is_some() {
            self.refresh_playback();
        }
        target
    }

    pub fn capture_lost(&mut self) {
        self.interaction.capture_lost();
    }

    /// Bitmap for the current envelope, redrawn only when its inputs changed.
    ///
    /// While a new envelope is pending the previous bitmap is returned as is.
    pub fn bitmap(&mut self) -> Option<Arc<ColorImage>> {
        if self.viewport.is_degenerate() {
            return None;
        }
        match self.envelope.as_ref() {
            Some(envelope) if !envelope.is_empty() => {
                let key = self.viewport.render_key(envelope);
                Some(
                    self.bitmap_cache
                        .get_or_render(&self.renderer, envelope, key),
                )
            }
            _ => self.bitmap_cache.last_image(),
        }
    }

    fn refresh_playback(&mut self) {
        self.playback = self
            .player
            .as_deref()
            .map(|player| player.state())
            .unwrap_or_default();
    }

    fn request_envelope(&mut self) {
        let width = self.viewport.width as usize;
        let Some(path) = self.selected.clone() else {
            self.pending = None;
            return;
        };
        if width == 0 {
            self.pending = None;
            return;
        }
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let request_id = self.next_request_id;
        let job = EnvelopeJob {
            request_id,
            path,
            width,
        };
        if self.loader_tx.send(job).is_err() {
            tracing::warn!("Envelope loader is not running");
            self.pending = None;
            self.ui.status.notice = Some("Waveform loader stopped".into());
            return;
        }
        self.pending = Some(PendingEnvelope { request_id });
    }

    fn apply_envelope(&mut self, result: EnvelopeResult) {
        match result.result {
            Ok(outcome) => {
                tracing::info!(
                    "Loaded waveform for {} ({} ch, {} Hz, {:.0} ms)",
                    result.path.display(),
                    outcome.channels,
                    outcome.sample_rate,
                    outcome.duration_ms
                );
                self.ui.status.track = Some(TrackInfo {
                    channels: outcome.channels,
                    sample_rate: outcome.sample_rate,
                    duration_ms: outcome.duration_ms,
                });
                self.envelope = Some(outcome.envelope);
            }
            Err(err) => {
                tracing::warn!("Showing blank waveform: {err}");
                self.ui.status.notice = Some(err.to_string());
                self.ui.status.track = None;
                self.envelope = Some(WaveformEnvelope::blank(result.width));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
