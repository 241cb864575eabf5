use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::Error;

/// Configuration loading helpers.
///
/// `Settings::load` layers an optional config file under environment variables
/// (prefix `VITROLA__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, Error> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("VITROLA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings the player cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        let volume = self.audio.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(Error::InvalidConfig(format!(
                "audio.initial_volume must be within [0, 1], got {volume}"
            )));
        }
        if self.audio.time_update_ms == 0 {
            return Err(Error::InvalidConfig(
                "audio.time_update_ms must be >= 1".to_string(),
            ));
        }
        if self.controls.seek_seconds == 0 {
            return Err(Error::InvalidConfig(
                "controls.seek_seconds must be >= 1".to_string(),
            ));
        }
        let step = self.controls.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "controls.volume_step must be within (0, 1], got {step}"
            )));
        }
        Ok(())
    }
}

/// Resolve the config path from `VITROLA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("VITROLA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/vitrola/config.toml`
/// or `~/.config/vitrola/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("vitrola").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/vitrola/vitrola.log`
/// or `~/.local/state/vitrola/vitrola.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("vitrola").join("vitrola.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
