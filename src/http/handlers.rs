use super::state::AppState;
use crate::chat;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Prompt text forwarded to the chat engine
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Transcript of the uploaded audio
    pub text: String,

    /// Chat engine reply, or a descriptive error string, or empty when no
    /// chat engine is configured
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/ask
/// Forward text to the chat engine and return its reply
pub async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    let Some(chat_engine) = state.chat.clone() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Chat engine not available on server.".to_string(),
            }),
        )
            .into_response();
    };

    match chat_engine.ask(&req.text).await {
        Ok(answer) => (StatusCode::OK, Json(AskResponse { answer })).into_response(),
        Err(e) => {
            error!("Chat request failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Ollama error: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/transcribe
/// Multipart audio upload -> transcript, plus a chat answer when a chat
/// engine is configured. Chat failures are embedded in the answer field so
/// the transcript is never lost.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let Some(transcriber) = state.transcriber.clone() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Transcription engine not available on server.".to_string(),
            }),
        )
            .into_response();
    };

    // Pull the uploaded audio out of the multipart body
    let upload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    let filename = field.file_name().unwrap_or("upload.wav").to_string();
                    match field.bytes().await {
                        Ok(bytes) => break Some((filename, bytes)),
                        Err(e) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(ErrorResponse {
                                    error: format!("Failed to read upload: {}", e),
                                }),
                            )
                                .into_response()
                        }
                    }
                }
            }
            Ok(None) => break None,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid multipart body: {}", e),
                    }),
                )
                    .into_response()
            }
        }
    };

    let Some((filename, bytes)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing 'file' field in upload".to_string(),
            }),
        )
            .into_response();
    };

    info!("Transcribing upload: {} ({} bytes)", filename, bytes.len());

    // Preserve the extension so the decoder can use it as a container hint
    let suffix = Path::new(&filename)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".wav".to_string());

    // Save to a scratch file and transcribe on the blocking pool. The scratch
    // file drops inside the closure, so it is removed whether or not the
    // engine succeeded.
    let text = match tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let mut scratch = tempfile::Builder::new()
            .prefix("cuely-upload-")
            .suffix(&suffix)
            .tempfile()?;
        scratch.write_all(&bytes)?;
        scratch.flush()?;
        transcriber.transcribe_file(scratch.path())
    })
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Transcription failed: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Transcription failed: {:#}", e),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!("Transcription task panicked: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Transcription task failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Optionally forward the transcript to the chat engine
    let answer = match &state.chat {
        Some(chat_engine) => chat::ask_or_report(chat_engine.as_ref(), &text).await,
        None => String::new(),
    };

    (StatusCode::OK, Json(TranscribeResponse { text, answer })).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
