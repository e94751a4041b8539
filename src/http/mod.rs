//! HTTP API server for the decoupled front-end
//!
//! This module provides a REST API mirroring the console flow:
//! - POST /api/ask - Forward text to the chat engine
//! - POST /api/transcribe - Multipart audio upload -> transcript + answer
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
