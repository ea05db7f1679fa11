use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::playback::{MediaPlayback, PlaybackError, PlaybackState};

/// `rodio` playback of the selected file on the default output device.
pub struct AudioPlayer {
    // Keeps the device open for as long as the sink plays.
    stream: OutputStream,
    sink: Sink,
    track: Option<LoadedTrack>,
    volume: f32,
}

struct LoadedTrack {
    path: PathBuf,
    duration: Duration,
}

impl AudioPlayer {
    /// Open the default output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        Ok(Self {
            stream,
            sink,
            track: None,
            volume: 1.0,
        })
    }

    /// Path of the loaded track, if any.
    pub fn loaded_path(&self) -> Option<&Path> {
        self.track.as_ref().map(|track| track.path.as_path())
    }

    fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
        let open_error = |source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        let byte_len = file.metadata().map_err(open_error)?.len();
        let mut builder = Decoder::builder()
            .with_data(BufReader::new(file))
            .with_byte_len(byte_len)
            .with_seekable(true);
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            builder = builder.with_hint(extension);
        }
        builder.build().map_err(|source| PlaybackError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Queue the loaded track again after the sink ran dry, keeping the transport flag.
    fn requeue(&mut self) -> Result<(), PlaybackError> {
        let track = self.track.as_ref().ok_or(PlaybackError::NothingLoaded)?;
        let decoder = Self::open_decoder(&track.path)?;
        let was_paused = self.sink.is_paused();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.sink.set_volume(self.volume);
        self.sink.append(decoder);
        if was_paused {
            self.sink.pause();
        }
        Ok(())
    }
}

impl MediaPlayback for AudioPlayer {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.sink.clear();
        self.track = None;
        let decoder = Self::open_decoder(path)?;
        let duration = decoder.total_duration().unwrap_or(Duration::ZERO);
        self.sink.append(decoder);
        self.sink.pause();
        self.track = Some(LoadedTrack {
            path: path.to_path_buf(),
            duration,
        });
        tracing::info!(
            "Loaded {} for playback ({:.1} s)",
            path.display(),
            duration.as_secs_f32()
        );
        Ok(())
    }

    fn unload(&mut self) {
        self.sink.clear();
        self.track = None;
    }

    fn state(&self) -> PlaybackState {
        let Some(track) = self.track.as_ref() else {
            return PlaybackState::default();
        };
        let duration_ms = track.duration.as_secs_f64() * 1000.0;
        if self.sink.empty() {
            return PlaybackState {
                position_ms: duration_ms,
                duration_ms,
                playing: false,
            };
        }
        let position_ms = (self.sink.get_pos().as_secs_f64() * 1000.0).min(duration_ms);
        PlaybackState {
            position_ms,
            duration_ms,
            playing: !self.sink.is_paused(),
        }
    }

    fn seek(&mut self, position_ms: f64) -> Result<(), PlaybackError> {
        if self.track.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        if self.sink.empty() {
            self.requeue()?;
        }
        let target = Duration::from_secs_f64(position_ms.max(0.0) / 1000.0);
        self.sink.try_seek(target)?;
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        if !playing {
            self.sink.pause();
            return;
        }
        if self.sink.empty() && self.track.is_some() {
            if let Err(err) = self.requeue() {
                tracing::warn!("Failed to restart playback: {err}");
                return;
            }
        }
        self.sink.play();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.volume);
    }
}
