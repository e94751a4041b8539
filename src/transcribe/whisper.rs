//! Whisper.cpp transcription engine.
//!
//! The GGML model is loaded once at startup and reused for every request;
//! each call gets its own inference state.

use super::Transcriber;
use crate::config::WhisperConfig;
use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

pub struct WhisperTranscriber {
    ctx: WhisperContext,
    language: String,
}

impl WhisperTranscriber {
    /// Load the whisper model from disk.
    pub fn new(config: &WhisperConfig) -> Result<Self> {
        info!("Loading whisper model from {}", config.model_path);

        let ctx =
            WhisperContext::new_with_params(&config.model_path, WhisperContextParameters::default())
                .with_context(|| {
                    format!("Failed to load whisper model from {}", config.model_path)
                })?;

        info!("Whisper model loaded");

        Ok(Self {
            ctx,
            language: config.language.clone(),
        })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe_samples(&self, samples: &[f32]) -> Result<String> {
        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create whisper state")?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if self.language.eq_ignore_ascii_case("auto") {
            params.set_language(None);
            params.set_detect_language(true);
        } else {
            params.set_language(Some(&self.language));
            params.set_detect_language(false);
        }
        params.set_print_progress(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_translate(false);

        state
            .full(params, samples)
            .context("Whisper inference failed")?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow!("Failed to read segment count: {}", e))?;
        if num_segments < 0 {
            return Err(anyhow!("Whisper returned a negative segment count"));
        }

        // Whisper splits output into small segments; stitch them together.
        let mut transcript = String::new();
        for i in 0..num_segments {
            match state.full_get_segment_text_lossy(i) {
                Ok(text) => transcript.push_str(&text),
                Err(e) => debug!("Failed to read whisper segment {}: {}", i, e),
            }
        }

        // Whisper emits [BLANK_AUDIO] for silent input; callers want empty text.
        let filtered = transcript.replace("[BLANK_AUDIO]", "");
        Ok(filtered.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_model() {
        let config = WhisperConfig {
            enabled: true,
            model_path: "/no/such/model.bin".to_string(),
            language: "auto".to_string(),
        };
        assert!(WhisperTranscriber::new(&config).is_err());
    }
}
