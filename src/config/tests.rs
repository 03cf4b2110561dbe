use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_varispeed_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VARISPEED_CONFIG_PATH", "/tmp/varispeed-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/varispeed-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("varispeed")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    let home = std::path::PathBuf::from("/tmp/home-dir");
    assert_eq!(
        default_config_path().unwrap(),
        home.join(".config").join("varispeed").join("config.toml")
    );
    assert_eq!(
        default_log_path().unwrap(),
        home.join(".local/state").join("varispeed").join("varispeed.log")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.ramp.ticks_per_second, 60);
    assert_eq!(s.playback.advance_delay_ms, 100);
    assert_eq!(s.playback.initial_rate, 1.0);
}

#[test]
fn validate_rejects_bad_rates_and_tick_counts() {
    let mut s = Settings::default();
    s.ramp.ticks_per_second = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.initial_rate = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.initial_rate = f64::INFINITY;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ramp.percent_per_second = f64::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
loop_on_completion = false
initial_rate = 1.25
advance_delay_ms = 40

[ramp]
mode = "exponential"
percent_per_second = -2.5
ticks_per_second = 30

[ui]
follow_playback = false
header_text = "hello"

[log]
file = "/tmp/varispeed-test.log"
filter = "varispeed=debug"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
display_fields = ["name"]
display_separator = "::"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VARISPEED_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VARISPEED__PLAYBACK__ADVANCE_DELAY_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(!s.playback.loop_on_completion);
    assert_eq!(s.playback.initial_rate, 1.25);
    assert_eq!(s.playback.advance_delay_ms, 40);
    assert_eq!(s.ramp.mode, RampModeSetting::Multiplicative);
    assert_eq!(s.ramp.percent_per_second, -2.5);
    assert_eq!(s.ramp.ticks_per_second, 30);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.log.file,
        Some(std::path::PathBuf::from("/tmp/varispeed-test.log"))
    );
    assert_eq!(s.log.filter, "varispeed=debug");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.display_separator, "::");
    assert_eq!(s.library.display_fields, vec![TrackDisplayField::Name]);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
advance_delay_ms = 100
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VARISPEED_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VARISPEED__PLAYBACK__ADVANCE_DELAY_MS", "250");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.advance_delay_ms, 250);
}
