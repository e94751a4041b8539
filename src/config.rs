use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub whisper: WhisperConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "cuely".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate (Whisper expects 16kHz)
    pub sample_rate: u32,
    /// Samples per capture block
    pub block_samples: usize,
    /// Frame channel capacity; frames drop when the channel is full
    pub channel_capacity: usize,
    /// Preferred input device name (None = system default)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            block_samples: 1024,
            channel_capacity: 64,
            device: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    /// Whether to load the transcription engine at startup
    pub enabled: bool,
    /// Path to the GGML whisper model file
    pub model_path: String,
    /// Language hint; "auto" enables language detection
    pub language: String,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: "models/ggml-small.bin".to_string(),
            language: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Whether the chat engine is available
    pub enabled: bool,
    /// Base URL of the ollama server
    pub url: String,
    /// Model identifier for single-turn chat
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:11434".to_string(),
            model: "gemma:2b".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (optional) plus CUELY_* environment
    /// overrides. `OLLAMA_MODEL` additionally overrides the chat model id.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CUELY").separator("__"))
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;

        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.is_empty() {
                cfg.ollama.model = model;
            }
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_a_file() {
        let cfg = Config::default();
        assert_eq!(cfg.audio.sample_rate, 16000);
        assert_eq!(cfg.audio.block_samples, 1024);
        assert_eq!(cfg.service.http.port, 8000);
        assert_eq!(cfg.ollama.model, "gemma:2b");
        assert!(cfg.whisper.enabled);
    }
}
