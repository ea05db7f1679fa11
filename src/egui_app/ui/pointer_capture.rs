use std::cell::Cell;

use crate::egui_app::controller::interaction::PointerCaptureHost;

/// egui keeps routing pointer input to the window while a button is held, so capture here is
/// a flag telling the view to follow the pointer outside the waveform rect.
#[derive(Default)]
pub struct EguiPointerCapture {
    held: Cell<bool>,
}

impl EguiPointerCapture {
    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

impl PointerCaptureHost for EguiPointerCapture {
    fn acquire(&self) {
        self.held.set(true);
    }

    fn release(&self) {
        self.held.set(false);
    }
}
