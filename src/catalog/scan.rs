use std::path::{Path, PathBuf};

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::Track;

const COVER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const COVER_STEMS: [&str; 3] = ["cover", "folder", "front"];

/// Title and artist read from a file's tags, if any.
#[derive(Debug, Default)]
pub(super) struct Tags {
    pub title: Option<String>,
    pub artist: Option<String>,
}

pub(super) fn read_tags(path: &Path) -> Tags {
    let mut tags = Tags::default();
    let Ok(tagged) = lofty::read_from_path(path) else {
        return tags;
    };
    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = tag
            .title()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        tags.artist = tag
            .artist()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }
    tags
}

/// The file stem, used as a last-resort title.
pub(super) fn stem_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Look for artwork next to `audio`: `<stem>.jpg` first, then `cover.*`,
/// `folder.*` and `front.*` in the same directory.
pub(super) fn find_cover(audio: &Path) -> Option<PathBuf> {
    let dir = audio.parent()?;
    let stem = audio.file_stem().and_then(|s| s.to_str());

    stem.into_iter()
        .chain(COVER_STEMS)
        .flat_map(|name| {
            COVER_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{name}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
}

/// Build tracks from every audio file under `dir`, sorted by label.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let tags = read_tags(path);
        tracks.push(Track {
            source: path.to_path_buf(),
            title: tags.title.unwrap_or_else(|| stem_title(path)),
            artist: tags.artist,
            cover: find_cover(path),
        });
    }

    tracks.sort_by_key(|t| t.label().to_lowercase());
    tracing::debug!(dir = %dir.display(), count = tracks.len(), "scanned music directory");
    tracks
}
