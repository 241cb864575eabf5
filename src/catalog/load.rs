use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::CatalogSettings;

use super::model::{Catalog, Track};
use super::scan::{read_tags, scan, stem_title};
use super::CatalogError;

/// On-disk shape of a catalog file: a list of `[[track]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "track", default)]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    source: PathBuf,
    title: Option<String>,
    artist: Option<String>,
    cover: Option<PathBuf>,
}

/// Load the catalog from `source`: a directory is scanned for audio files,
/// anything else is read as a TOML catalog file.
pub fn load(source: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    let tracks = if source.is_dir() {
        scan(source, settings)
    } else {
        read_catalog_file(source)?
    };
    Catalog::new(tracks)
}

fn read_catalog_file(path: &Path) -> Result<Vec<Track>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or(Path::new("."));
    parse_catalog(&text, base).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse catalog TOML, resolving relative paths against `base`.
pub(super) fn parse_catalog(text: &str, base: &Path) -> Result<Vec<Track>, toml::de::Error> {
    let file: CatalogFile = toml::from_str(text)?;
    Ok(file
        .tracks
        .into_iter()
        .map(|entry| entry.into_track(base))
        .collect())
}

impl TrackEntry {
    fn into_track(self, base: &Path) -> Track {
        let source = resolve(base, self.source);
        let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let artist = self.artist.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

        // Only touch the file when the catalog leaves something out.
        let (title, artist) = match (title, artist) {
            (Some(title), Some(artist)) => (title, Some(artist)),
            (title, artist) => {
                let tags = read_tags(&source);
                (
                    title.or(tags.title).unwrap_or_else(|| stem_title(&source)),
                    artist.or(tags.artist),
                )
            }
        };

        Track {
            source,
            title,
            artist,
            cover: self.cover.map(|c| resolve(base, c)),
        }
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
