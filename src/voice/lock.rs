use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{VoiceError, VoiceResult};

#[derive(Deserialize, Debug)]
struct LockStatus {
    #[serde(rename = "canSpeak")]
    can_speak: bool,
}

/// Asks the lock service whether speech is currently allowed.
#[derive(Debug, Clone)]
pub struct LockGate {
    client: Client,
    url: String,
    timeout: Duration,
}

impl LockGate {
    pub fn new(client: Client, url: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: url.to_string(),
            timeout,
        }
    }

    /// One bounded query per call, never cached. Only an explicit
    /// `"canSpeak": false` blocks speech; anything indeterminate allows it.
    pub async fn can_speak(&self) -> bool {
        match self.query().await {
            Ok(allowed) => allowed,
            Err(e) => {
                debug!("Lock check failed, allowing speech: {}", e);
                true
            }
        }
    }

    async fn query(&self) -> VoiceResult<bool> {
        let res = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(VoiceError::Status(res.status().as_u16()));
        }

        let body = res.bytes().await?;
        let status: LockStatus = serde_json::from_slice(&body)?;
        Ok(status.can_speak)
    }
}
