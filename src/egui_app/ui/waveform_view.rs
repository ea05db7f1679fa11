use std::sync::Arc;

use eframe::egui::{self, Align2, CursorIcon, TextStyle, TextureOptions, Ui};

use super::{EguiApp, style};
use crate::egui_app::controller::interaction::{InteractionPhase, PointerCursor};

const WAVEFORM_TEXTURE_NAME: &str = "waveform_texture";

impl EguiApp {
    pub(super) fn render_waveform(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        style::section_frame().show(ui, |ui| {
            let desired = ui.available_size().max(egui::vec2(1.0, 1.0));
            let (rect, _response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());
            self.controller.resize(
                rect.width().round().max(0.0) as u32,
                rect.height().round().max(0.0) as u32,
            );

            match self.waveform_texture(ui.ctx()) {
                Some(id) => {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(id, rect, uv, egui::Color32::WHITE);
                }
                None => {
                    ui.painter()
                        .rect_filled(rect, 0.0, self.controller.background());
                }
            }

            if self.controller.is_loading() {
                ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "LOADING",
                    TextStyle::Heading.resolve(ui.style()),
                    style::with_alpha(palette.text_primary, 180),
                );
            }

            self.handle_pointer(ui, rect);

            let x = rect.left() + self.controller.playhead_x();
            let stroke_width = match self.controller.phase() {
                InteractionPhase::Idle => 1.5,
                _ => 2.5,
            };
            ui.painter().line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                egui::Stroke::new(stroke_width, palette.playhead),
            );
        });
    }

    /// Upload the bitmap only when the controller produced a new one.
    fn waveform_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let Some(image) = self.controller.bitmap() else {
            self.waveform_tex = None;
            self.uploaded_image = None;
            return None;
        };
        let unchanged = self
            .uploaded_image
            .as_ref()
            .is_some_and(|uploaded| Arc::ptr_eq(uploaded, &image));
        match self.waveform_tex.as_mut() {
            Some(tex) if unchanged => return Some(tex.id()),
            Some(tex) if tex.size() == image.size => {
                tex.set(Arc::clone(&image), TextureOptions::LINEAR);
            }
            _ => {
                self.waveform_tex = Some(ctx.load_texture(
                    WAVEFORM_TEXTURE_NAME,
                    Arc::clone(&image),
                    TextureOptions::LINEAR,
                ));
            }
        }
        self.uploaded_image = Some(image);
        self.waveform_tex.as_ref().map(|tex| tex.id())
    }

    /// Feed pointer input to the controller in waveform-local coordinates.
    fn handle_pointer(&mut self, ui: &Ui, rect: egui::Rect) {
        let (pos, pressed, released, down, focused) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.focused,
            )
        });
        let tolerance = self.controller.settings().interaction.hover_tolerance();
        let reach = rect.expand2(egui::vec2(tolerance.x, tolerance.y));

        if let Some(pos) = pos {
            let local = pos - rect.min;
            let hovering = self.controller.phase() == InteractionPhase::Hovering;
            if self.capture.is_held() || hovering || reach.contains(pos) {
                self.controller.pointer_moved(local.x, local.y);
            }
            // The grab zone extends past the rect edges by the hover tolerance.
            if pressed && self.controller.phase() == InteractionPhase::Hovering {
                self.controller.pointer_pressed(local.x);
            }
            if released {
                self.controller.pointer_released(local.x);
            }
        }
        if self.capture.is_held() && (!down || !focused) && !released {
            self.controller.capture_lost();
        }

        match self.controller.cursor() {
            PointerCursor::Default => {}
            PointerCursor::Grab => ui.ctx().set_cursor_icon(CursorIcon::Grab),
            PointerCursor::Grabbing => ui.ctx().set_cursor_icon(CursorIcon::Grabbing),
        }
    }
}
