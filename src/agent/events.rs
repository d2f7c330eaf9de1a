use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::memory::ResponseStore;
use crate::agent::session::{latest_assistant, SessionSource};
use crate::config::Config;
use crate::error::VoiceResult;
use crate::voice::tts::SpeechRelay;

pub const SESSION_IDLE: &str = "session.idle";

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: Value,
}

/// Lifecycle event emitted by the host. Only idle sessions matter here;
/// everything else decodes to `Other`. An idle event without a session id
/// is still an idle event, it just cannot be captured.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawEvent")]
pub enum HostEvent {
    SessionIdle { session_id: Option<String> },
    Other { kind: String },
}

impl From<RawEvent> for HostEvent {
    fn from(raw: RawEvent) -> Self {
        let session_id = raw
            .properties
            .get("sessionID")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        if raw.kind == SESSION_IDLE {
            HostEvent::SessionIdle { session_id }
        } else {
            HostEvent::Other { kind: raw.kind }
        }
    }
}

/// Reacts to host lifecycle events: announces idle sessions and captures
/// each new assistant response once.
pub struct SessionEventProcessor {
    config: Arc<Config>,
    relay: Arc<SpeechRelay>,
    store: Arc<ResponseStore>,
    sessions: Arc<dyn SessionSource>,
    /// Id of the last assistant message handed to the store.
    last_captured: Option<String>,
}

impl SessionEventProcessor {
    pub fn new(
        config: Arc<Config>,
        relay: Arc<SpeechRelay>,
        store: Arc<ResponseStore>,
        sessions: Arc<dyn SessionSource>,
    ) -> Self {
        Self {
            config,
            relay,
            store,
            sessions,
            last_captured: None,
        }
    }

    pub fn marker(&self) -> Option<&str> {
        self.last_captured.as_deref()
    }

    pub async fn on_event(&mut self, event: &HostEvent) {
        let HostEvent::SessionIdle { session_id } = event else {
            return;
        };

        if self.config.idle_announce {
            let _ = self.relay.speak(&self.config.idle_message).await;
        }

        if !self.store.is_enabled() {
            return;
        }

        let Some(session_id) = session_id else {
            debug!("Idle event without session id, nothing to capture");
            return;
        };

        if let Err(e) = self.capture(session_id).await {
            debug!("Capture skipped for session {}: {}", session_id, e);
        }
    }

    async fn capture(&mut self, session_id: &str) -> VoiceResult<()> {
        let messages = self.sessions.messages(session_id).await?;

        let Some(latest) = latest_assistant(&messages) else {
            return Ok(());
        };

        if self.last_captured.as_deref() == Some(latest.info.id.as_str()) {
            return Ok(());
        }

        // Marked before storing: a failed write is not retried.
        self.last_captured = Some(latest.info.id.clone());

        let content = latest.joined_text();
        if content.trim().is_empty() {
            return Ok(());
        }

        info!(
            "Capturing response {} ({} chars)",
            latest.info.id,
            content.chars().count()
        );
        self.store.store(&content).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_session_idle() {
        let event: HostEvent = serde_json::from_value(json!({
            "type": "session.idle",
            "properties": { "sessionID": "ses_42" }
        }))
        .unwrap();
        assert_eq!(
            event,
            HostEvent::SessionIdle {
                session_id: Some("ses_42".to_string())
            }
        );
    }

    #[test]
    fn other_event_types_are_kept_opaque() {
        let event: HostEvent = serde_json::from_value(json!({
            "type": "message.updated",
            "properties": { "info": {} }
        }))
        .unwrap();
        assert_eq!(
            event,
            HostEvent::Other {
                kind: "message.updated".to_string()
            }
        );
    }

    #[test]
    fn idle_without_session_id_is_still_idle() {
        let bare: HostEvent = serde_json::from_value(json!({ "type": "session.idle" })).unwrap();
        let numeric: HostEvent = serde_json::from_value(json!({
            "type": "session.idle",
            "properties": { "sessionID": 17 }
        }))
        .unwrap();
        assert_eq!(bare, HostEvent::SessionIdle { session_id: None });
        assert_eq!(numeric, HostEvent::SessionIdle { session_id: None });
    }
}
