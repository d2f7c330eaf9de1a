use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::VoiceError;

pub const DEFAULT_SPEAK_URL: &str = "http://127.0.0.1:8765/speak";
pub const DEFAULT_LOCK_URL: &str = "http://127.0.0.1:8765/can-speak";
pub const DEFAULT_FALLBACK_BIN: &str = "say";
pub const DEFAULT_IDLE_MESSAGE: &str = "Úkol dokončen.";
pub const DEFAULT_HOST_URL: &str = "http://127.0.0.1:4096";
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 1_000;

/// Whether the lock gate is consulted before speaking. Applies to every
/// caller of the relay, the speak tool and the idle announcement alike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockPolicy {
    #[default]
    Always,
    Never,
}

impl FromStr for LockPolicy {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" | "on" | "true" | "1" => Ok(LockPolicy::Always),
            "never" | "off" | "false" | "0" => Ok(LockPolicy::Never),
            other => Err(VoiceError::Config(format!("unknown lock policy '{}'", other))),
        }
    }
}

/// How loudly channel failures are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
}

impl Verbosity {
    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }
}

impl FromStr for Verbosity {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiet" | "silent" => Ok(Verbosity::Quiet),
            "verbose" | "debug" => Ok(Verbosity::Verbose),
            other => Err(VoiceError::Config(format!("unknown verbosity '{}'", other))),
        }
    }
}

/// Relay configuration, resolved once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct Config {
    /// Primary speech endpoint (HTTP POST `{"text": ...}`)
    pub speak_url: String,
    /// Lock-check endpoint (HTTP GET, answers `{"canSpeak": bool}`)
    pub lock_url: String,
    /// Local executable used when the primary endpoint fails
    pub fallback_bin: PathBuf,
    pub idle_announce: bool,
    pub idle_message: String,
    /// SQLite file receiving captured responses
    pub db_path: PathBuf,
    pub save_responses: bool,
    pub lock_policy: LockPolicy,
    pub verbosity: Verbosity,
    /// Base URL of the host's session API
    pub host_url: String,
    pub lock_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Empty values count as unset and
    /// values that fail to parse fall back to their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let flag = |key: &str, default: bool| {
            get(key)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };

        let home = get("HOME");

        Self {
            speak_url: get("VOICE_SPEAK_URL").unwrap_or_else(|| DEFAULT_SPEAK_URL.to_string()),
            lock_url: get("VOICE_LOCK_URL").unwrap_or_else(|| DEFAULT_LOCK_URL.to_string()),
            fallback_bin: get("VOICE_FALLBACK_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FALLBACK_BIN)),
            idle_announce: flag("VOICE_IDLE_ANNOUNCE", true),
            idle_message: get("VOICE_IDLE_MESSAGE")
                .unwrap_or_else(|| DEFAULT_IDLE_MESSAGE.to_string()),
            db_path: get("VOICE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_db_path(home.as_deref())),
            save_responses: flag("VOICE_SAVE_RESPONSES", true),
            lock_policy: get("VOICE_LOCK_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            verbosity: get("VOICE_VERBOSITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            host_url: get("VOICE_HOST_URL").unwrap_or_else(|| DEFAULT_HOST_URL.to_string()),
            lock_timeout: Duration::from_millis(
                get("VOICE_LOCK_TIMEOUT_MS")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_LOCK_TIMEOUT_MS),
            ),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_db_path(home: Option<&str>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("voice-relay")
            .join("responses.db"),
        None => PathBuf::from("responses.db"),
    }
}
