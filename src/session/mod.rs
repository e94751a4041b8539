pub mod config;
pub mod session;
pub mod stats;

pub use config::SessionConfig;
pub use session::{RecordingSession, Utterance};
pub use stats::SessionStats;
