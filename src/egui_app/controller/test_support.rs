use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::interaction::PointerCaptureHost;
use crate::audio::{MediaPlayback, PlaybackError, PlaybackState};

/// Counts capture acquisitions and releases.
#[derive(Default)]
pub(crate) struct CountingCapture {
    pub acquired: Cell<usize>,
    pub released: Cell<usize>,
}

impl CountingCapture {
    /// Captures currently held.
    pub fn held(&self) -> usize {
        self.acquired.get() - self.released.get()
    }
}

impl PointerCaptureHost for CountingCapture {
    fn acquire(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }
}

#[derive(Default)]
struct FakeTransport {
    track_duration_ms: f64,
    loaded: Option<PathBuf>,
    state: PlaybackState,
    seeks: Vec<f64>,
    fail_loads: bool,
    volume: Option<f32>,
}

/// In-memory playback backend. Clones share state so tests can inspect a boxed copy.
#[derive(Clone, Default)]
pub(crate) struct FakePlayback {
    inner: Rc<RefCell<FakeTransport>>,
}

impl FakePlayback {
    /// Backend whose loads report `duration_ms`; starts with a track already loaded.
    pub fn loaded(duration_ms: f64) -> Self {
        let playback = Self::with_track_duration(duration_ms);
        {
            let mut inner = playback.inner.borrow_mut();
            inner.loaded = Some(PathBuf::from("loaded.wav"));
            inner.state.duration_ms = duration_ms;
        }
        playback
    }

    /// Backend with nothing loaded whose future loads report `duration_ms`.
    pub fn with_track_duration(duration_ms: f64) -> Self {
        let playback = Self::default();
        playback.inner.borrow_mut().track_duration_ms = duration_ms;
        playback
    }

    pub fn failing_loads(self) -> Self {
        self.inner.borrow_mut().fail_loads = true;
        self
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.inner.borrow().seeks.clone()
    }

    pub fn loaded_path(&self) -> Option<PathBuf> {
        self.inner.borrow().loaded.clone()
    }

    pub fn volume(&self) -> Option<f32> {
        self.inner.borrow().volume
    }

    /// Simulate the transport advancing.
    pub fn set_position(&self, position_ms: f64) {
        self.inner.borrow_mut().state.position_ms = position_ms;
    }
}

impl MediaPlayback for FakePlayback {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_loads {
            inner.loaded = None;
            inner.state = PlaybackState::default();
            return Err(PlaybackError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::other("fake load failure"),
            });
        }
        inner.loaded = Some(path.to_path_buf());
        inner.state = PlaybackState {
            position_ms: 0.0,
            duration_ms: inner.track_duration_ms,
            playing: false,
        };
        Ok(())
    }

    fn unload(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.loaded = None;
        inner.state = PlaybackState::default();
    }

    fn state(&self) -> PlaybackState {
        self.inner.borrow().state
    }

    fn seek(&mut self, position_ms: f64) -> Result<(), PlaybackError> {
        let mut inner = self.inner.borrow_mut();
        if inner.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        inner.seeks.push(position_ms);
        inner.state.position_ms = position_ms;
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.state.playing = playing && inner.loaded.is_some();
    }

    fn set_volume(&mut self, volume: f32) {
        self.inner.borrow_mut().volume = Some(volume);
    }
}

/// Mono float WAV at 8 Hz, so each sample is 125 ms.
pub(crate) fn write_test_wav(path: &Path, samples: &[f32]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for sample in samples {
        writer.write_sample(*sample).unwrap();
    }
    writer.finalize().unwrap();
}
