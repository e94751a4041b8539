//! Speech-to-text transcription.
//!
//! Provides local transcription using whisper.cpp via the whisper-rs crate.
//! The engine is treated as a black box behind the `Transcriber` trait so the
//! HTTP handlers and the console UI can be tested with stubs.

pub mod whisper;

use crate::audio::{decode, wav};
use crate::config::WhisperConfig;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Trait for speech-to-text implementations
pub trait Transcriber: Send + Sync {
    /// Transcribe audio samples to text
    /// Input: f32 samples, mono, 16kHz
    fn transcribe_samples(&self, samples: &[f32]) -> Result<String>;

    /// Transcribe an audio file to text. The default implementation decodes
    /// the file to 16kHz mono and delegates to `transcribe_samples`.
    fn transcribe_file(&self, path: &Path) -> Result<String> {
        let samples = decode::load_mono(path, 16000)?;
        let floats: Vec<f32> = samples.iter().map(|&s| s as f32 / 32_768.0).collect();
        self.transcribe_samples(&floats)
    }
}

/// Factory function to create the transcription engine
pub fn create_transcriber(config: &WhisperConfig) -> Result<Arc<dyn Transcriber>> {
    Ok(Arc::new(whisper::WhisperTranscriber::new(config)?))
}

/// Write an utterance to a scratch WAV file and run transcription on it.
///
/// The temp file is removed when this returns, whether or not the engine
/// succeeded.
pub fn transcribe_utterance(
    transcriber: &dyn Transcriber,
    samples: &[i16],
    sample_rate: u32,
) -> Result<String> {
    let wav_file = wav::write_temp_wav(samples, sample_rate)?;
    transcriber.transcribe_file(wav_file.path())
    // wav_file drops here, deleting the scratch file.
}
