//! Fixed daemon settings and the display-session environment.
//!
//! There is no config file and no CLI. [`Settings`] collects the tuning constants in one
//! place so they can be logged at startup and overridden in tests.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Pointer displacement per raw touchpad unit.
pub const DEFAULT_SCALE: f64 = 0.5;
/// Scaled deltas at or below this magnitude (on both axes) do not move the pointer.
pub const JITTER_THRESHOLD: f64 = 0.5;
/// Pause between detecting three fingers and pressing the button.
pub const PRESS_DELAY: Duration = Duration::from_micros(2500);
/// Pointer controller connection attempts before giving up.
pub const CONNECT_ATTEMPTS: u32 = 5;
/// Pause between failed connection attempts.
pub const CONNECT_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_LOG_FILE: &str = "/tmp/three-finger-select.log";
pub const DEFAULT_DISPLAY: &str = ":0";

#[derive(Clone, Debug, Serialize)]
pub struct Settings {
    pub scale: f64,
    pub jitter_threshold: f64,
    #[serde(with = "duration_ms")]
    pub press_delay: Duration,
    pub connect_attempts: u32,
    #[serde(with = "duration_ms")]
    pub connect_backoff: Duration,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            jitter_threshold: JITTER_THRESHOLD,
            press_delay: PRESS_DELAY,
            connect_attempts: CONNECT_ATTEMPTS,
            connect_backoff: CONNECT_BACKOFF,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// One-line JSON rendering for the startup log.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_nanos() as f64 / 1_000_000.0)
    }
}

/// Display-session variables the pointer backend depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionEnv {
    pub display: Option<String>,
    pub xauthority: Option<String>,
    pub xdg_runtime_dir: Option<String>,
}

impl SessionEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            display: lookup("DISPLAY"),
            xauthority: lookup("XAUTHORITY"),
            xdg_runtime_dir: lookup("XDG_RUNTIME_DIR"),
        }
    }

    /// Fill in `DISPLAY` if it is missing. Returns `true` when the default was applied.
    pub fn default_display(&mut self) -> bool {
        if self.display.as_deref().map_or(true, str::is_empty) {
            self.display = Some(DEFAULT_DISPLAY.to_string());
            true
        } else {
            false
        }
    }

    /// Export `DISPLAY` into the process environment.
    ///
    /// Must run before any other thread is spawned.
    pub fn export_display(&self) {
        if let Some(display) = &self.display {
            std::env::set_var("DISPLAY", display);
        }
    }
}
