use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::{AudioBackend, AudioBackendConfig, AudioBackendFactory, UtteranceBuffer};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One utterance worth of captured audio, returned by `stop`.
#[derive(Debug)]
pub struct Utterance {
    /// Concatenated mono samples, in frame arrival order
    pub samples: Vec<i16>,
    /// Sample rate of the capture
    pub sample_rate: u32,
    /// Capture statistics
    pub stats: SessionStats,
}

impl Utterance {
    /// True when no audio was captured between start and stop.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A recording session that manages audio capture and buffer assembly.
///
/// Owns the recording flag and the frame channel, so there is no shared
/// global state: dropping the session tears everything down.
pub struct RecordingSession {
    /// Session configuration
    config: SessionConfig,

    /// Capture backend (microphone or file)
    backend: Mutex<Box<dyn AudioBackend>>,

    /// Whether recording is currently active
    is_recording: Arc<AtomicBool>,

    /// When the session started
    started_at: Mutex<chrono::DateTime<chrono::Utc>>,

    /// Handle for the buffer assembler task
    assembler_handle: Mutex<Option<JoinHandle<UtteranceBuffer>>>,
}

impl RecordingSession {
    /// Create a new recording session
    pub fn new(config: SessionConfig) -> Result<Self> {
        info!("Creating recording session: {}", config.session_id);

        let backend_config = AudioBackendConfig {
            target_sample_rate: config.sample_rate,
            block_samples: config.block_samples,
            channel_capacity: config.channel_capacity,
        };

        let backend = AudioBackendFactory::create(config.source.clone(), backend_config)
            .context("Failed to create audio backend")?;

        Ok(Self {
            config,
            backend: Mutex::new(backend),
            is_recording: Arc::new(AtomicBool::new(false)),
            started_at: Mutex::new(Utc::now()),
            assembler_handle: Mutex::new(None),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Start recording
    pub async fn start(&self) -> Result<()> {
        if self.is_recording.load(Ordering::SeqCst) {
            warn!("Recording already started");
            return Ok(());
        }

        info!("Starting recording session: {}", self.config.session_id);

        let mut rx = {
            let mut backend = self.backend.lock().await;
            backend
                .start()
                .await
                .context("Failed to start audio capture")?
        };

        *self.started_at.lock().await = Utc::now();
        self.is_recording.store(true, Ordering::SeqCst);

        // Spawn the buffer assembler: drains the frame channel while the
        // recording flag is set. The bounded wait lets it notice a cleared
        // flag even when no frames arrive.
        let is_recording = Arc::clone(&self.is_recording);
        let assembler = tokio::spawn(async move {
            let mut buffer = UtteranceBuffer::new();

            loop {
                if !is_recording.load(Ordering::SeqCst) {
                    break;
                }

                match tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
                    Ok(Some(frame)) => {
                        // Frames arriving after stop are dropped.
                        if !is_recording.load(Ordering::SeqCst) {
                            break;
                        }
                        buffer.push(frame);
                    }
                    Ok(None) => break,
                    Err(_) => continue,
                }
            }

            buffer
        });

        {
            let mut handle = self.assembler_handle.lock().await;
            *handle = Some(assembler);
        }

        info!("Recording session started");
        Ok(())
    }

    /// Stop recording and return the assembled utterance.
    ///
    /// Stopping an idle session returns an empty utterance.
    pub async fn stop(&self) -> Result<Utterance> {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            warn!("Recording not active");
            return Ok(self.empty_utterance().await);
        }

        info!("Stopping recording session: {}", self.config.session_id);

        // Stop the backend first so the sender side closes and the assembler
        // drains out instead of waiting for its timeout.
        let frames_dropped = {
            let mut backend = self.backend.lock().await;
            backend.stop().await.context("Failed to stop capture")?;
            backend.frames_dropped()
        };

        let buffer = {
            let mut handle = self.assembler_handle.lock().await;
            match handle.take() {
                Some(task) => task.await.context("Assembler task panicked")?,
                None => UtteranceBuffer::new(),
            }
        };

        let started_at = *self.started_at.lock().await;
        let stats = SessionStats {
            session_id: self.config.session_id.clone(),
            started_at,
            duration_secs: buffer.duration_seconds(),
            frames_captured: buffer.frame_count(),
            samples_captured: buffer.sample_count(),
            frames_dropped,
        };

        info!(
            "Recording stopped: {} frames, {:.1}s of audio, {} dropped",
            stats.frames_captured, stats.duration_secs, stats.frames_dropped
        );

        Ok(Utterance {
            samples: buffer.into_samples(),
            sample_rate: self.config.sample_rate,
            stats,
        })
    }

    async fn empty_utterance(&self) -> Utterance {
        Utterance {
            samples: Vec::new(),
            sample_rate: self.config.sample_rate,
            stats: SessionStats {
                session_id: self.config.session_id.clone(),
                started_at: *self.started_at.lock().await,
                duration_secs: 0.0,
                frames_captured: 0,
                samples_captured: 0,
                frames_dropped: 0,
            },
        }
    }
}
