//! Pointer handling for grabbing and dragging the playhead.
//!
//! States: `Idle -> Hovering` when the pointer comes within tolerance of the playhead near the
//! top edge, `Hovering -> Dragging` on press (pointer captured), `Dragging -> Idle` on release
//! (seek issued), on capture loss, or on reset. `Idle`/`Hovering` follow pointer motion.

use std::rc::Rc;

use crate::audio::MediaPlayback;
use crate::waveform::playhead::{pixel_to_time, time_to_pixel};

/// Default distance in pixels within which the playhead can be grabbed.
pub const DEFAULT_HOVER_TOLERANCE_PX: f32 = 5.0;

/// Grab distances: horizontal from the playhead, vertical from the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverTolerance {
    pub x: f32,
    pub y: f32,
}

impl Default for HoverTolerance {
    fn default() -> Self {
        Self {
            x: DEFAULT_HOVER_TOLERANCE_PX,
            y: DEFAULT_HOVER_TOLERANCE_PX,
        }
    }
}

/// Public view of the interaction state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Hovering,
    Dragging,
}

/// Cursor the host should show over the waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerCursor {
    Default,
    Grab,
    Grabbing,
}

/// Host side of pointer capture: routes pointer events to the waveform while held.
pub trait PointerCaptureHost {
    fn acquire(&self);
    fn release(&self);
}

/// Held pointer capture. Dropping it releases the capture.
pub struct PointerCapture {
    host: Rc<dyn PointerCaptureHost>,
}

impl PointerCapture {
    fn acquire(host: &Rc<dyn PointerCaptureHost>) -> Self {
        host.acquire();
        Self {
            host: Rc::clone(host),
        }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.host.release();
    }
}

/// Receiver of seek requests issued when a drag ends.
pub trait SeekRequester {
    fn request_seek(&mut self, target_ms: f64);
}

impl<T: MediaPlayback + ?Sized> SeekRequester for T {
    fn request_seek(&mut self, target_ms: f64) {
        match self.seek(target_ms) {
            Ok(()) => tracing::info!("Seeked to {target_ms:.0} ms"),
            Err(err) => tracing::warn!("Seek to {target_ms:.0} ms failed: {err}"),
        }
    }
}

/// Waveform width and transport used to locate the playhead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayheadLayout {
    pub width: f32,
    pub position_ms: f64,
    pub duration_ms: f64,
}

impl PlayheadLayout {
    /// Pixel offset of the playhead; 0 when nothing is loaded.
    pub fn playhead_x(&self) -> f32 {
        time_to_pixel(self.position_ms, self.duration_ms, self.width)
    }
}

enum InteractionState {
    Idle,
    Hovering,
    Dragging {
        // Released when the state is replaced.
        _capture: PointerCapture,
        pointer_x: f32,
    },
}

pub struct InteractionController {
    state: InteractionState,
    capture_host: Rc<dyn PointerCaptureHost>,
    tolerance: HoverTolerance,
}

impl InteractionController {
    pub fn new(capture_host: Rc<dyn PointerCaptureHost>, tolerance: HoverTolerance) -> Self {
        Self {
            state: InteractionState::Idle,
            capture_host,
            tolerance,
        }
    }

    pub fn set_tolerance(&mut self, tolerance: HoverTolerance) {
        self.tolerance = tolerance;
    }

    pub fn phase(&self) -> InteractionPhase {
        match self.state {
            InteractionState::Idle => InteractionPhase::Idle,
            InteractionState::Hovering => InteractionPhase::Hovering,
            InteractionState::Dragging { .. } => InteractionPhase::Dragging,
        }
    }

    pub fn cursor(&self) -> PointerCursor {
        match self.state {
            InteractionState::Idle => PointerCursor::Default,
            InteractionState::Hovering => PointerCursor::Grab,
            InteractionState::Dragging { .. } => PointerCursor::Grabbing,
        }
    }

    /// Pointer x while dragging, for drawing the playhead under the pointer.
    pub fn drag_x(&self) -> Option<f32> {
        match self.state {
            InteractionState::Dragging { pointer_x, .. } => Some(pointer_x),
            _ => None,
        }
    }

    /// Track pointer motion. Coordinates are relative to the waveform's top-left corner.
    pub fn pointer_moved(&mut self, x: f32, y: f32, layout: &PlayheadLayout) -> PointerCursor {
        if let InteractionState::Dragging { pointer_x, .. } = &mut self.state {
            *pointer_x = x;
        } else if self.is_over_playhead(x, y, layout) {
            self.state = InteractionState::Hovering;
        } else {
            self.state = InteractionState::Idle;
        }
        self.cursor()
    }

    /// Start a drag when the press lands while hovering the playhead.
    pub fn pointer_pressed(&mut self, x: f32) -> bool {
        if !matches!(self.state, InteractionState::Hovering) {
            return false;
        }
        self.state = InteractionState::Dragging {
            _capture: PointerCapture::acquire(&self.capture_host),
            pointer_x: x,
        };
        true
    }

    /// Finish a drag: seek to the time under `x` and release the pointer.
    ///
    /// Returns the requested target, or `None` when not dragging or nothing is loaded.
    pub fn pointer_released<S>(
        &mut self,
        x: f32,
        layout: &PlayheadLayout,
        seek: &mut S,
    ) -> Option<f64>
    where
        S: SeekRequester + ?Sized,
    {
        if !matches!(self.state, InteractionState::Dragging { .. }) {
            return None;
        }
        let finished = std::mem::replace(&mut self.state, InteractionState::Idle);
        let target = if layout.duration_ms > 0.0 && layout.width > 0.0 {
            let x = x.clamp(0.0, layout.width);
            let target = pixel_to_time(x, layout.width, layout.duration_ms);
            seek.request_seek(target);
            Some(target)
        } else {
            tracing::debug!("Ignoring drag release with nothing to seek");
            None
        };
        drop(finished);
        target
    }

    /// The host lost the pointer mid-drag; abandon it without seeking.
    pub fn capture_lost(&mut self) {
        if matches!(self.state, InteractionState::Dragging { .. }) {
            tracing::debug!("Pointer capture lost during playhead drag");
            self.state = InteractionState::Idle;
        }
    }

    /// Return to `Idle`, releasing any capture. Called when the selection changes.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    fn is_over_playhead(&self, x: f32, y: f32, layout: &PlayheadLayout) -> bool {
        (x - layout.playhead_x()).abs() <= self.tolerance.x && y.abs() <= self.tolerance.y
    }
}
