//! Interactive console mode: push-to-talk question answering.
//!
//! Enter toggles recording. On stop, the utterance is transcribed and the
//! transcript is forwarded to the chat engine; both are printed. This is the
//! same pipeline the HTTP service exposes, driven from a terminal.

use crate::audio::AudioSource;
use crate::chat::{self, ChatClient};
use crate::config::Config;
use crate::session::{RecordingSession, SessionConfig};
use crate::transcribe::{self, Transcriber};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

pub async fn run(
    config: &Config,
    transcriber: Option<Arc<dyn Transcriber>>,
    chat_engine: Option<Arc<dyn ChatClient>>,
    device: Option<String>,
) -> Result<()> {
    let Some(transcriber) = transcriber else {
        bail!("Talk mode needs a transcription engine; check whisper.model_path in the config");
    };

    if chat_engine.is_none() {
        warn!("No chat engine configured; transcripts will not be answered");
    }

    println!("Ask by voice. [Enter] to record, [q + Enter] to quit.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        println!();
        println!("[Enter] start recording");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let session_config = SessionConfig {
            source: AudioSource::Microphone {
                device: device.clone(),
            },
            sample_rate: config.audio.sample_rate,
            block_samples: config.audio.block_samples,
            channel_capacity: config.audio.channel_capacity,
            ..SessionConfig::default()
        };

        let session = RecordingSession::new(session_config)?;
        session.start().await?;

        println!("Recording... [Enter] stop");
        lines.next_line().await?;

        let utterance = session.stop().await?;
        if utterance.is_empty() {
            println!("No audio recorded");
            continue;
        }

        let engine = Arc::clone(&transcriber);
        let samples = utterance.samples;
        let sample_rate = utterance.sample_rate;
        let text = tokio::task::spawn_blocking(move || {
            transcribe::transcribe_utterance(engine.as_ref(), &samples, sample_rate)
        })
        .await
        .context("Transcription task panicked")??;

        if text.is_empty() {
            println!("No speech detected");
            continue;
        }

        println!("You: {}", text);

        if let Some(engine) = &chat_engine {
            let answer = chat::ask_or_report(engine.as_ref(), &text).await;
            println!("Answer: {}", answer);
        }
    }

    Ok(())
}
