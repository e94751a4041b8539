use crate::audio::AudioSource;

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "utterance-<uuid>")
    pub session_id: String,

    /// Where the audio comes from (microphone or file)
    pub source: AudioSource,

    /// Sample rate for captured audio (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Samples per capture block
    pub block_samples: usize,

    /// Frame channel capacity
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("utterance-{}", uuid::Uuid::new_v4()),
            source: AudioSource::Microphone { device: None },
            sample_rate: 16000, // Whisper expects 16kHz
            block_samples: 1024,
            channel_capacity: 64,
        }
    }
}
