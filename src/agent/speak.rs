use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::agent::tools::{Tool, ToolResult};
use crate::voice::tts::SpeechRelay;

#[derive(Deserialize, JsonSchema, Debug)]
pub struct SpeakArgs {
    /// Text to say out loud, in natural language.
    pub text: String,
}

/// Lets the assistant speak to the user through the relay.
pub struct SpeakTool {
    relay: Arc<SpeechRelay>,
}

impl SpeakTool {
    pub fn new(relay: Arc<SpeechRelay>) -> Self {
        Self { relay }
    }
}

pub fn spoken_message(text: &str) -> String {
    format!("🔊 Spoke: {}", text)
}

pub fn failed_message(text: &str) -> String {
    format!("⚠️ Speech failed: {}", text)
}

impl Tool for SpeakTool {
    fn name(&self) -> &str {
        "speak"
    }

    fn description(&self) -> &str {
        "Say something out loud to the user. Keep it brief and conversational, one or two \
         short sentences, the way you would talk rather than write. Prefer Czech unless the \
         user is clearly using another language."
    }

    fn parameters(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(SpeakArgs)).unwrap_or_default()
    }

    fn execute(&self, args: Value) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        Box::pin(async move {
            let args: SpeakArgs = serde_json::from_value(args)
                .map_err(|e| anyhow::anyhow!("Invalid speak arguments: {}", e))?;

            if args.text.trim().is_empty() {
                return Err(anyhow::anyhow!("Missing text"));
            }

            if self.relay.speak(&args.text).await {
                Ok(spoken_message(&args.text))
            } else {
                Ok(failed_message(&args.text))
            }
        })
    }
}
