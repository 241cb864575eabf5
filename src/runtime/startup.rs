use std::path::PathBuf;
use std::time::Duration;

use crate::config;
use crate::player::PlayerOptions;

/// Where to load the catalog from: the command-line argument, then the
/// configured `catalog.path`, then the current directory.
pub fn catalog_source(arg: Option<String>, settings: &config::CatalogSettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.path.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn player_options(settings: &config::Settings) -> PlayerOptions {
    PlayerOptions {
        seek_seconds: settings.controls.seek_seconds,
        volume_hide_delay: Duration::from_millis(settings.ui.volume_hide_delay_ms),
    }
}
