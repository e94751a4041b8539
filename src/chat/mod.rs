//! Chat-completion client.
//!
//! The language model is an external black box reached over HTTP. Failures
//! here are the one place with an explicit recovery policy: `ask_or_report`
//! turns any error into a descriptive string so a transcript is never lost
//! because the chat engine was down.

pub mod ollama;

use anyhow::Result;

pub use ollama::OllamaChat;

/// Trait for single-turn chat-completion engines
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one user message and return the model's reply text.
    async fn ask(&self, prompt: &str) -> Result<String>;
}

/// Ask the chat engine, mapping failure into a descriptive string instead of
/// an error.
pub async fn ask_or_report(chat: &dyn ChatClient, prompt: &str) -> String {
    match chat.ask(prompt).await {
        Ok(answer) => answer,
        Err(e) => format!("Ollama error: {:#}", e),
    }
}
