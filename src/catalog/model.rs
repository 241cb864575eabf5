use std::path::PathBuf;

use super::CatalogError;

/// One playable entry of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub cover: Option<PathBuf>,
}

impl Track {
    /// "Artist - Title", or just the title when the artist is unknown.
    pub fn label(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }
}

/// The static, ordered and never-empty list of tracks the player can choose from.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index after `index`, wrapping to the first track after the last.
    pub fn next_index(&self, index: usize) -> usize {
        (index % self.len() + 1) % self.len()
    }

    /// Index before `index`, wrapping to the last track before the first.
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.len();
        (index % len + len - 1) % len
    }
}
