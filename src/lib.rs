//! Speech output and response capture for an AI assistant host.
//!
//! Speech goes out through [`voice::tts::SpeechRelay`] (remote endpoint with a
//! local executable as fallback, gated by the lock service). Idle-session
//! events are handled by [`agent::events::SessionEventProcessor`], which
//! announces the idle state and archives each new assistant response once.

pub mod agent;
pub mod config;
pub mod error;
pub mod host;
pub mod voice;

use std::sync::Arc;

use crate::agent::events::SessionEventProcessor;
use crate::agent::memory::ResponseStore;
use crate::agent::session::{HttpSessionSource, SessionSource};
use crate::agent::speak::SpeakTool;
use crate::agent::tools::ToolDispatcher;
use crate::config::Config;
use crate::host::Host;
use crate::voice::tts::SpeechRelay;

/// Wire every component against one shared configuration.
pub fn build_host(config: Arc<Config>) -> Host {
    let sessions: Arc<dyn SessionSource> = Arc::new(HttpSessionSource::new(&config.host_url));
    build_host_with(config, sessions)
}

/// Same as [`build_host`] with a caller-provided session source.
pub fn build_host_with(config: Arc<Config>, sessions: Arc<dyn SessionSource>) -> Host {
    let relay = Arc::new(SpeechRelay::new(&config));
    let store = Arc::new(ResponseStore::new(&config));

    let mut dispatcher = ToolDispatcher::new();
    dispatcher.register(Box::new(SpeakTool::new(Arc::clone(&relay))));

    let processor = SessionEventProcessor::new(config, relay, store, sessions);
    Host::new(processor, dispatcher)
}
