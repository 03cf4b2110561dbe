use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `VARISPEED__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("VARISPEED")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ramp.ticks_per_second == 0 {
            return Err("ramp.ticks_per_second must be >= 1".to_string());
        }
        if !self.ramp.percent_per_second.is_finite() {
            return Err("ramp.percent_per_second must be a finite number".to_string());
        }
        let rate = self.playback.initial_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err("playback.initial_rate must be a finite number > 0".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `VARISPEED_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("VARISPEED_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}

/// Compute the default config path under `$XDG_CONFIG_HOME/varispeed/config.toml`
/// or `~/.config/varispeed/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("varispeed").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/varispeed/` or `~/.local/state/varispeed/`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("varispeed").join("varispeed.log"))
}
