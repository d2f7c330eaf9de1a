//! Error types for the voice relay

use thiserror::Error;

/// Result type alias for relay operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Failures inside the relay. None of these cross the public component
/// boundaries; they are folded into booleans or swallowed there.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fallback executable exited with {}", exit_code_label(*.0))]
    ExitStatus(Option<i32>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn exit_code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}
