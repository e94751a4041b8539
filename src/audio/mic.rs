//! Microphone capture via cpal.
//!
//! The cpal stream is owned by a dedicated thread because streams are not
//! `Send`. The data callback downmixes whatever format the device delivers to
//! mono f32, slices it into fixed-size blocks, resamples each block to the
//! target rate, and pushes i16 frames into a bounded channel. When the channel
//! is full the frame is dropped and counted rather than blocking the callback.

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use super::resample;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// List input device names so the CLI can expose a selector.
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("No input devices available")?;
    let mut names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Microphone capture backend
pub struct MicBackend {
    /// Preferred device name (None = default input device)
    device_name: Option<String>,
    config: AudioBackendConfig,
    stop_flag: Arc<AtomicBool>,
    dropped: Arc<AtomicUsize>,
    stream_thread: Option<thread::JoinHandle<()>>,
    capturing: bool,
}

impl MicBackend {
    pub fn new(device_name: Option<String>, config: AudioBackendConfig) -> Self {
        Self {
            device_name,
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicUsize::new(0)),
            stream_thread: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            return Err(anyhow!("Microphone capture already started"));
        }

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let (ready_tx, ready_rx) = oneshot::channel();

        self.stop_flag.store(false, Ordering::SeqCst);
        let stop_flag = Arc::clone(&self.stop_flag);
        let dropped = Arc::clone(&self.dropped);
        let device_name = self.device_name.clone();
        let config = self.config.clone();

        // The stream must live on its own thread: cpal streams are !Send, so
        // they cannot be held across await points in an async task.
        let handle = thread::spawn(move || {
            stream_thread_main(device_name, config, tx, dropped, stop_flag, ready_tx);
        });
        self.stream_thread = Some(handle);

        ready_rx
            .await
            .context("Capture thread exited before reporting readiness")??;

        self.capturing = true;
        info!("Microphone capture started");

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.capturing = false;

        if let Some(handle) = self.stream_thread.take() {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .context("Failed to join capture thread")?
                .map_err(|_| anyhow!("Capture thread panicked"))?;
        }

        let dropped = self.dropped.load(Ordering::Relaxed);
        if dropped > 0 {
            warn!("Dropped {} audio frames (channel full)", dropped);
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn frames_dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Accumulates mono device-rate samples and emits fixed-size target-rate
/// frames into the channel.
struct FrameSlicer {
    pending: Vec<f32>,
    device_rate: u32,
    device_block: usize,
    target_rate: u32,
    block_samples: usize,
    started: Instant,
    tx: mpsc::Sender<AudioFrame>,
    dropped: Arc<AtomicUsize>,
}

impl FrameSlicer {
    fn new(
        device_rate: u32,
        config: &AudioBackendConfig,
        tx: mpsc::Sender<AudioFrame>,
        dropped: Arc<AtomicUsize>,
    ) -> Self {
        // Device-rate samples needed to fill one target-rate block.
        let device_block = ((config.block_samples as u64 * device_rate as u64)
            / config.target_sample_rate.max(1) as u64)
            .max(1) as usize;

        Self {
            pending: Vec::with_capacity(device_block * 2),
            device_rate,
            device_block,
            target_rate: config.target_sample_rate,
            block_samples: config.block_samples,
            started: Instant::now(),
            tx,
            dropped,
        }
    }

    /// Downmix interleaved device samples to mono and emit completed blocks.
    fn push<T: Copy>(&mut self, data: &[T], channels: usize, convert: impl Fn(T) -> f32) {
        let channels = channels.max(1);
        for frame in data.chunks(channels) {
            let sum: f32 = frame.iter().map(|s| convert(*s)).sum();
            self.pending.push(sum / channels as f32);
        }

        while self.pending.len() >= self.device_block {
            let block: Vec<f32> = self.pending.drain(..self.device_block).collect();
            let resampled = resample::pin_length(
                resample::to_target_rate(&block, self.device_rate, self.target_rate),
                self.block_samples,
            );
            let samples: Vec<i16> = resampled
                .iter()
                .map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                .collect();

            let frame = AudioFrame {
                samples,
                sample_rate: self.target_rate,
                channels: 1,
                timestamp_ms: self.started.elapsed().as_millis() as u64,
            };

            if self.tx.try_send(frame).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Owns the cpal stream for the lifetime of a capture. Reports build errors
/// back through `ready_tx`, then parks until the stop flag is set.
fn stream_thread_main(
    device_name: Option<String>,
    config: AudioBackendConfig,
    tx: mpsc::Sender<AudioFrame>,
    dropped: Arc<AtomicUsize>,
    stop_flag: Arc<AtomicBool>,
    ready_tx: oneshot::Sender<Result<()>>,
) {
    let stream = match build_input_stream(device_name, &config, tx, Arc::clone(&dropped)) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(anyhow!("Failed to start input stream: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    while !stop_flag.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(25));
    }

    if let Err(e) = stream.pause() {
        warn!("Failed to pause input stream: {}", e);
    }
    drop(stream);
}

fn build_input_stream(
    device_name: Option<String>,
    config: &AudioBackendConfig,
    tx: mpsc::Sender<AudioFrame>,
    dropped: Arc<AtomicUsize>,
) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = match &device_name {
        Some(name) => {
            let mut devices = host.input_devices().context("No input devices available")?;
            devices
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or_else(|| anyhow!("Input device '{}' not found", name))?
        }
        None => host
            .default_input_device()
            .ok_or_else(|| anyhow!("No default input device available"))?,
    };

    let default_config = device
        .default_input_config()
        .context("Failed to query input device config")?;
    let format = default_config.sample_format();
    let device_config: StreamConfig = default_config.into();
    let device_rate = device_config.sample_rate.0;
    let channels = usize::from(device_config.channels.max(1));

    info!(
        "Capture device: {} ({:?}, {}Hz, {} channels)",
        device.name().unwrap_or_else(|_| "unknown".to_string()),
        format,
        device_rate,
        channels
    );

    let slicer = Arc::new(Mutex::new(FrameSlicer::new(
        device_rate,
        config,
        tx,
        Arc::clone(&dropped),
    )));

    let err_fn = |err| warn!("Audio stream error: {}", err);

    // Convert every supported sample type to f32 up front so the slicer can
    // stay format-agnostic. The callback only try_locks: if the lock is
    // contended the data is dropped and counted instead of stalling the
    // audio thread.
    let stream = match format {
        SampleFormat::F32 => {
            let slicer = Arc::clone(&slicer);
            let dropped = Arc::clone(&dropped);
            device.build_input_stream(
                &device_config,
                move |data: &[f32], _| {
                    if let Ok(mut slicer) = slicer.try_lock() {
                        slicer.push(data, channels, |s| s);
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::I16 => {
            let slicer = Arc::clone(&slicer);
            let dropped = Arc::clone(&dropped);
            device.build_input_stream(
                &device_config,
                move |data: &[i16], _| {
                    if let Ok(mut slicer) = slicer.try_lock() {
                        slicer.push(data, channels, |s| s as f32 / 32_768.0);
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::U16 => {
            let slicer = Arc::clone(&slicer);
            let dropped = Arc::clone(&dropped);
            device.build_input_stream(
                &device_config,
                move |data: &[u16], _| {
                    if let Ok(mut slicer) = slicer.try_lock() {
                        slicer.push(data, channels, |s| (s as f32 - 32_768.0) / 32_768.0);
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
    };

    Ok(stream)
}
