use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::{VoiceError, VoiceResult};

pub const ASSISTANT_ROLE: &str = "assistant";
const TEXT_PART: &str = "text";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageInfo {
    pub id: String,
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One message of a host session, as served by the host's session API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionMessage {
    pub info: MessageInfo,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl SessionMessage {
    pub fn is_assistant(&self) -> bool {
        self.info.role == ASSISTANT_ROLE
    }

    /// Text of the `text` parts in their original order, one per line.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| part.kind == TEXT_PART)
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Newest message authored by the assistant.
pub fn latest_assistant(messages: &[SessionMessage]) -> Option<&SessionMessage> {
    messages.iter().rev().find(|msg| msg.is_assistant())
}

/// Read access to the host's session history.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn messages(&self, session_id: &str) -> VoiceResult<Vec<SessionMessage>>;
}

/// `SessionSource` backed by the host's HTTP API
/// (`GET {base}/session/{id}/message`).
#[derive(Debug, Clone)]
pub struct HttpSessionSource {
    client: Client,
    base_url: String,
}

impl HttpSessionSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Each path segment is percent-encoded, so ids containing `/`, `?` or
    /// `#` stay inside their segment.
    fn messages_url(&self, session_id: &str) -> VoiceResult<Url> {
        let invalid = |reason: String| {
            VoiceError::Config(format!("invalid host url '{}': {}", self.base_url, reason))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("session")
            .push(session_id)
            .push("message");
        Ok(url)
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    async fn messages(&self, session_id: &str) -> VoiceResult<Vec<SessionMessage>> {
        let res = self
            .client
            .get(self.messages_url(session_id)?)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(VoiceError::Status(res.status().as_u16()));
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
