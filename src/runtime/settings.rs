use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(err) = s.validate() {
                eprintln!("vitrola: {err}, using defaults");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the player from starting.
            eprintln!("vitrola: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
