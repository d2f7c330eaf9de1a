#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use voice_relay::agent::session::{SessionMessage, SessionSource};
use voice_relay::config::{Config, LockPolicy};
use voice_relay::error::{VoiceError, VoiceResult};

/// Config with every endpoint pointed at `base` and nothing reaching the
/// real speech stack.
pub fn test_config(base: &str, db_path: &Path) -> Config {
    Config {
        speak_url: format!("{}/speak", base),
        lock_url: format!("{}/can-speak", base),
        fallback_bin: PathBuf::from("false"),
        idle_announce: false,
        db_path: db_path.to_path_buf(),
        save_responses: true,
        lock_policy: LockPolicy::Always,
        host_url: base.to_string(),
        lock_timeout: Duration::from_millis(300),
        ..Config::default()
    }
}

pub fn message(id: &str, role: &str, parts: serde_json::Value) -> SessionMessage {
    serde_json::from_value(json!({
        "info": { "id": id, "role": role },
        "parts": parts
    }))
    .unwrap()
}

pub fn text_message(id: &str, role: &str, text: &str) -> SessionMessage {
    message(id, role, json!([{ "type": "text", "text": text }]))
}

/// In-memory session history that can be swapped between events.
#[derive(Default)]
pub struct FakeSessions {
    messages: Mutex<Vec<SessionMessage>>,
    failing: Mutex<bool>,
    calls: AtomicUsize,
}

impl FakeSessions {
    pub fn with(messages: Vec<SessionMessage>) -> Self {
        let sessions = Self::default();
        sessions.set(messages);
        sessions
    }

    pub fn set(&self, messages: Vec<SessionMessage>) {
        *self.messages.lock().unwrap() = messages;
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionSource for FakeSessions {
    async fn messages(&self, _session_id: &str) -> VoiceResult<Vec<SessionMessage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(VoiceError::Status(503));
        }
        Ok(self.messages.lock().unwrap().clone())
    }
}

/// Shell script that appends its first argument to `log` and exits with
/// `code`.
#[cfg(unix)]
pub fn recording_script(dir: &Path, log: &Path, code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-say.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s\\n' \"$1\" >> '{}'\nexit {}\n",
            log.display(),
            code
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

pub fn recorded_lines(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
