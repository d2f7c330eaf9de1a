//! Message-passing bridge to the assistant host.
//!
//! The host sends one JSON object per line: lifecycle events and tool calls.
//! Every frame is handled to completion before the next one is read, so the
//! session processor never sees two events at once. Tool calls are answered
//! with one JSON line each; events produce no reply.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::agent::events::{HostEvent, SessionEventProcessor};
use crate::agent::tools::ToolDispatcher;

#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inbound {
    Event {
        event: HostEvent,
    },
    Tool {
        id: String,
        name: String,
        #[serde(default)]
        args: Value,
    },
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    Register { tools: Value },
    ToolResult { id: String, output: String },
    ToolError { id: String, error: String },
}

pub struct Host {
    processor: SessionEventProcessor,
    dispatcher: ToolDispatcher,
}

impl Host {
    pub fn new(processor: SessionEventProcessor, dispatcher: ToolDispatcher) -> Self {
        Self {
            processor,
            dispatcher,
        }
    }

    pub fn registration(&self) -> Outbound {
        Outbound::Register {
            tools: self.dispatcher.get_tools_schema(),
        }
    }

    pub fn processor(&self) -> &SessionEventProcessor {
        &self.processor
    }

    pub async fn handle(&mut self, frame: Inbound) -> Option<Outbound> {
        match frame {
            Inbound::Event { event } => {
                debug!("Event: {:?}", event);
                self.processor.on_event(&event).await;
                None
            }
            Inbound::Tool { id, name, args } => {
                debug!("Tool call {} -> {}", id, name);
                Some(match self.dispatcher.execute(&name, args).await {
                    Ok(output) => Outbound::ToolResult { id, output },
                    Err(e) => Outbound::ToolError {
                        id,
                        error: e.to_string(),
                    },
                })
            }
        }
    }
}

pub async fn write_frame<W>(out: &mut W, frame: &Outbound) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(frame)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Announce the tools, then handle frames until the sender side closes.
pub async fn run_host_loop<W>(
    mut host: Host,
    mut rx: mpsc::UnboundedReceiver<String>,
    out: &mut W,
) -> Result<Host>
where
    W: AsyncWrite + Unpin,
{
    write_frame(out, &host.registration()).await?;

    while let Some(line) = rx.recv().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame: Inbound = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping malformed frame: {}", e);
                continue;
            }
        };

        if let Some(reply) = host.handle(frame).await {
            write_frame(out, &reply).await?;
        }
    }

    Ok(host)
}
