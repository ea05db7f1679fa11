//! Plain data the view reads each frame.

use std::path::PathBuf;

/// Format details of the track whose envelope is shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub duration_ms: f64,
}

/// Status line content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusState {
    /// Last user-facing problem, cleared on the next selection.
    pub notice: Option<String>,
    pub track: Option<TrackInfo>,
}

/// Files offered in the side list.
#[derive(Clone, Debug, Default)]
pub struct LibraryState {
    pub files: Vec<PathBuf>,
    pub selected: Option<usize>,
}

impl LibraryState {
    /// Add `path` if it is not listed yet and return its row.
    pub fn insert(&mut self, path: PathBuf) -> usize {
        if let Some(index) = self.files.iter().position(|existing| *existing == path) {
            return index;
        }
        self.files.push(path);
        self.files.len() - 1
    }

    pub fn selected_path(&self) -> Option<&PathBuf> {
        self.selected.and_then(|index| self.files.get(index))
    }
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub status: StatusState,
    pub library: LibraryState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reuses_existing_rows() {
        let mut library = LibraryState::default();
        assert_eq!(library.insert(PathBuf::from("a.wav")), 0);
        assert_eq!(library.insert(PathBuf::from("b.wav")), 1);
        assert_eq!(library.insert(PathBuf::from("a.wav")), 0);
        assert_eq!(library.files.len(), 2);
        library.selected = Some(1);
        assert_eq!(library.selected_path(), Some(&PathBuf::from("b.wav")));
    }
}
