use super::ChatClient;
use crate::config::OllamaConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Client for the ollama chat API
pub struct OllamaChat {
    http: reqwest::Client,
    url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

impl OllamaChat {
    pub fn new(config: &OllamaConfig) -> Self {
        info!("Chat engine: {} at {}", config.model, config.url);

        Self {
            http: reqwest::Client::new(),
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ChatClient for OllamaChat {
    async fn ask(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.url))
            .json(&request)
            .send()
            .await
            .context("Failed to reach ollama server")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Ollama returned HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Failed to parse ollama response")?;

        Ok(reply.message.content)
    }
}
