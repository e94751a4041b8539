pub mod audio;
pub mod chat;
pub mod config;
pub mod http;
pub mod session;
pub mod talk;
pub mod transcribe;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource,
    UtteranceBuffer,
};
pub use chat::{ask_or_report, ChatClient, OllamaChat};
pub use config::Config;
pub use http::{create_router, AppState};
pub use session::{RecordingSession, SessionConfig, SessionStats, Utterance};
pub use transcribe::{create_transcriber, Transcriber};
