use std::sync::Arc;

use egui::{Color32, ColorImage};

use super::WaveformRenderer;
use crate::waveform::WaveformEnvelope;

/// Inputs a rendered bitmap depends on. Any change means a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub envelope_token: u64,
    pub width: u32,
    pub height: u32,
    pub color: Color32,
}

/// Holds the last rendered waveform bitmap and the key it was drawn for.
///
/// Paint calls go through [`get_or_render`](Self::get_or_render); the image is only redrawn
/// when the key differs from the stored one.
#[derive(Default)]
pub struct WaveformBitmapCache {
    key: Option<RenderKey>,
    image: Option<Arc<ColorImage>>,
    renders: u64,
}

impl WaveformBitmapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the stored bitmap was drawn for `key`.
    pub fn is_valid_for(&self, key: &RenderKey) -> bool {
        self.image.is_some() && self.key.as_ref() == Some(key)
    }

    /// Last rendered image regardless of key, used to stretch a stale bitmap while a new
    /// envelope is on its way.
    pub fn last_image(&self) -> Option<Arc<ColorImage>> {
        self.image.clone()
    }

    /// Number of times the bitmap has been redrawn.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Drop the stored bitmap so the next request redraws.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.image = None;
    }

    /// Return the bitmap for `key`, redrawing `envelope` first when the key changed.
    pub fn get_or_render(
        &mut self,
        renderer: &WaveformRenderer,
        envelope: &WaveformEnvelope,
        key: RenderKey,
    ) -> Arc<ColorImage> {
        if self.is_valid_for(&key) {
            if let Some(image) = self.image.as_ref() {
                return Arc::clone(image);
            }
        }
        debug_assert_eq!(key.envelope_token, envelope.cache_token());
        let image = Arc::new(renderer.render(envelope, key.width, key.height, key.color));
        self.renders += 1;
        self.key = Some(key);
        self.image = Some(Arc::clone(&image));
        tracing::debug!(
            "Rendered waveform bitmap {}x{} (render #{})",
            key.width,
            key.height,
            self.renders
        );
        image
    }
}
