use reqwest::Client;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::{Config, LockPolicy, Verbosity};
use crate::error::{VoiceError, VoiceResult};
use crate::voice::lock::LockGate;

#[derive(Serialize, Debug)]
struct SpeakRequest<'a> {
    text: &'a str,
}

/// Primary/fallback speech delivery.
///
/// Text goes to the remote speech endpoint first; if that fails for any
/// reason the local fallback executable is run with the text as its only
/// argument. Neither channel is retried.
#[derive(Debug, Clone)]
pub struct SpeechRelay {
    client: Client,
    speak_url: String,
    fallback_bin: PathBuf,
    lock: LockGate,
    lock_policy: LockPolicy,
    verbosity: Verbosity,
}

impl SpeechRelay {
    pub fn new(config: &Config) -> Self {
        let client = Client::new();
        Self {
            lock: LockGate::new(client.clone(), &config.lock_url, config.lock_timeout),
            client,
            speak_url: config.speak_url.clone(),
            fallback_bin: config.fallback_bin.clone(),
            lock_policy: config.lock_policy,
            verbosity: config.verbosity,
        }
    }

    /// Returns true when speech was delivered or deliberately suppressed by
    /// the lock, false only when both channels failed.
    pub async fn speak(&self, text: &str) -> bool {
        if self.lock_policy == LockPolicy::Always && !self.lock.can_speak().await {
            debug!("Speech locked, skipping delivery");
            return true;
        }

        match self.speak_remote(text).await {
            Ok(()) => return true,
            Err(e) => {
                if self.verbosity.is_verbose() {
                    warn!("Speech endpoint failed, using fallback: {}", e);
                }
            }
        }

        match self.speak_local(text).await {
            Ok(()) => true,
            Err(e) => {
                if self.verbosity.is_verbose() {
                    warn!("Fallback speech failed: {}", e);
                }
                false
            }
        }
    }

    async fn speak_remote(&self, text: &str) -> VoiceResult<()> {
        let res = self
            .client
            .post(&self.speak_url)
            .json(&SpeakRequest { text })
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(VoiceError::Status(res.status().as_u16()));
        }
        Ok(())
    }

    async fn speak_local(&self, text: &str) -> VoiceResult<()> {
        let status = Command::new(&self.fallback_bin)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(VoiceError::ExitStatus(status.code()));
        }
        Ok(())
    }
}
