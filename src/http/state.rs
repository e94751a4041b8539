use crate::chat::ChatClient;
use crate::transcribe::Transcriber;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// The engine handles are capabilities injected once at startup: an absent
/// engine is reported per request instead of being probed on every call.
#[derive(Clone)]
pub struct AppState {
    /// Speech-to-text engine, if one loaded at startup
    pub transcriber: Option<Arc<dyn Transcriber>>,

    /// Chat-completion engine, if configured
    pub chat: Option<Arc<dyn ChatClient>>,
}

impl AppState {
    pub fn new(
        transcriber: Option<Arc<dyn Transcriber>>,
        chat: Option<Arc<dyn ChatClient>>,
    ) -> Self {
        Self { transcriber, chat }
    }
}
