use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// When the recording started
    pub started_at: DateTime<Utc>,

    /// Total recorded duration in seconds
    pub duration_secs: f64,

    /// Number of audio frames assembled into the utterance
    pub frames_captured: usize,

    /// Total samples in the utterance
    pub samples_captured: usize,

    /// Frames dropped because the channel was full
    pub frames_dropped: usize,
}
