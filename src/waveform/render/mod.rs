mod cache;

use egui::{Color32, ColorImage};

use super::WaveformEnvelope;

pub use cache::{RenderKey, WaveformBitmapCache};

/// Paints envelopes into offscreen images.
#[derive(Clone, Debug)]
pub struct WaveformRenderer {
    background: Color32,
}

impl WaveformRenderer {
    /// Create a renderer that clears to `background`.
    pub fn new(background: Color32) -> Self {
        Self { background }
    }

    /// Background color used when clearing.
    pub fn background(&self) -> Color32 {
        self.background
    }

    /// Clear a `width` x `height` image and draw one vertical line per envelope column.
    ///
    /// Each line is centered on the horizontal midline and reaches `|amplitude| * half height`
    /// above and below it. Columns beyond the image width are ignored. Sizes are clamped to at
    /// least one pixel.
    pub fn render(
        &self,
        envelope: &WaveformEnvelope,
        width: u32,
        height: u32,
        color: Color32,
    ) -> ColorImage {
        let width = width.max(1) as usize;
        let height = height.max(1) as usize;
        let mut image = ColorImage::new([width, height], vec![self.background; width * height]);
        let half_height = (height - 1) as f32 / 2.0;
        let limit = (height - 1) as f32;
        for (x, amplitude) in envelope.values().iter().take(width).enumerate() {
            let extent = amplitude.abs().min(1.0) * half_height;
            let top = (half_height - extent).round().clamp(0.0, limit) as usize;
            let bottom = (half_height + extent).round().clamp(0.0, limit) as usize;
            for y in top..=bottom {
                image.pixels[y * width + x] = color;
            }
        }
        image
    }
}

/// Viewport inputs the cached bitmap depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub color: Color32,
}

impl ViewportState {
    /// Cache key for drawing `envelope` into this viewport.
    ///
    /// The image is as wide as the envelope, which matches the viewport once the envelope for
    /// the current width has arrived.
    pub fn render_key(&self, envelope: &WaveformEnvelope) -> RenderKey {
        RenderKey {
            envelope_token: envelope.cache_token(),
            width: envelope.len() as u32,
            height: self.height,
            color: self.color,
        }
    }

    /// True when nothing can be drawn.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
