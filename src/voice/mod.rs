pub mod lock;
pub mod tts;
