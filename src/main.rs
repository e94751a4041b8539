use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuely::audio;
use cuely::chat::{ChatClient, OllamaChat};
use cuely::transcribe::{self, Transcriber};
use cuely::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "cuely",
    version,
    about = "Voice question answering: local whisper transcription + ollama chat"
)]
struct Cli {
    /// Config file basename, without extension
    #[arg(long, default_value = "config/cuely")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve,
    /// Interactive voice Q&A in the terminal
    Talk {
        /// Input device name (default: system default microphone)
        #[arg(long)]
        device: Option<String>,
    },
    /// List audio input devices
    Devices,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Talk { device } => {
            let (transcriber, chat_engine) = build_engines(&cfg);
            let device = device.or_else(|| cfg.audio.device.clone());
            cuely::talk::run(&cfg, transcriber, chat_engine, device).await
        }
        Command::Devices => {
            for name in audio::list_input_devices()? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let (transcriber, chat_engine) = build_engines(&cfg);
    let state = AppState::new(transcriber, chat_engine);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server error")
}

/// Build the engine capabilities once at startup.
///
/// A whisper model that fails to load downgrades to a warning and an absent
/// capability; requests then get a clear error instead of a lazy load
/// attempt on every call.
fn build_engines(cfg: &Config) -> (Option<Arc<dyn Transcriber>>, Option<Arc<dyn ChatClient>>) {
    let transcriber = if cfg.whisper.enabled {
        match transcribe::create_transcriber(&cfg.whisper) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("Transcription disabled: {:#}", e);
                None
            }
        }
    } else {
        info!("Transcription disabled by config");
        None
    };

    let chat_engine: Option<Arc<dyn ChatClient>> = if cfg.ollama.enabled {
        Some(Arc::new(OllamaChat::new(&cfg.ollama)))
    } else {
        info!("Chat disabled by config");
        None
    };

    (transcriber, chat_engine)
}
