// Tests for the chat client error policy
//
// A failing chat call must surface as a descriptive string, never as a
// panic or an unhandled error past the client boundary.

use cuely::chat::{self, ChatClient, OllamaChat};
use cuely::config::OllamaConfig;

fn unreachable_client() -> OllamaChat {
    // Port 1 refuses connections immediately on localhost
    OllamaChat::new(&OllamaConfig {
        enabled: true,
        url: "http://127.0.0.1:1".to_string(),
        model: "gemma:2b".to_string(),
    })
}

#[tokio::test]
async fn test_ask_returns_error_when_unreachable() {
    let client = unreachable_client();

    let result = client.ask("hello").await;
    assert!(result.is_err(), "Unreachable server should produce an error");
}

#[tokio::test]
async fn test_ask_or_report_embeds_error_string() {
    let client = unreachable_client();

    let answer = chat::ask_or_report(&client, "hello").await;

    assert!(
        answer.contains("Ollama error"),
        "Failure should be reported as a descriptive string, got: {}",
        answer
    );
}
