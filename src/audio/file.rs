//! File-based capture backend for testing and batch processing.
//!
//! Decodes the whole file up front, then streams it through the frame channel
//! exactly like a live capture would, so session code can be exercised
//! without a physical microphone.

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use super::decode;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

pub struct FileBackend {
    path: PathBuf,
    config: AudioBackendConfig,
    capturing: bool,
}

impl FileBackend {
    pub fn new(path: PathBuf, config: AudioBackendConfig) -> Self {
        Self {
            path,
            config,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            return Err(anyhow!("File capture already started"));
        }

        let path = self.path.clone();
        let target_rate = self.config.target_sample_rate;
        let block_samples = self.config.block_samples.max(1);

        let samples = tokio::task::spawn_blocking(move || decode::load_mono(&path, target_rate))
            .await
            .map_err(|e| anyhow!("Decode task panicked: {}", e))??;

        info!(
            "File backend streaming {} samples from {}",
            samples.len(),
            self.path.display()
        );

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        tokio::spawn(async move {
            for (index, block) in samples.chunks(block_samples).enumerate() {
                let frame = AudioFrame {
                    samples: block.to_vec(),
                    sample_rate: target_rate,
                    channels: 1,
                    timestamp_ms: (index * block_samples) as u64 * 1000 / target_rate.max(1) as u64,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            // Sender drops here; the receiver sees end-of-stream.
        });

        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn frames_dropped(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "file"
    }
}
