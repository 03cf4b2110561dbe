use crate::config;

/// Load settings, falling back to defaults. The second value is a warning to
/// log once the logger is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("varispeed: invalid config, using defaults: {msg}");
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("varispeed: failed to load config, using defaults: {e}");
            (
                config::Settings::default(),
                Some(format!("failed to load config, using defaults: {e}")),
            )
        }
    }
}
