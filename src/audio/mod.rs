//! Media-playback collaborator: loads the selected file, plays it and reports progress.

mod playback;
mod player;

pub use playback::{MediaPlayback, PlaybackError, PlaybackState};
pub use player::AudioPlayer;
