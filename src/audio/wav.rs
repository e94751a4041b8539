//! Temporary WAV files for the transcription handoff.
//!
//! Each utterance is written to a scratch 16-bit PCM mono WAV before the
//! transcription engine is invoked on it. The file is deleted when the
//! returned handle drops, whether or not transcription succeeded.

use anyhow::{Context, Result};
use std::io::BufWriter;
use tempfile::NamedTempFile;
use tracing::info;

/// Write mono i16 samples to a temporary WAV file.
///
/// The file lives only as long as the returned handle.
pub fn write_temp_wav(samples: &[i16], sample_rate: u32) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("cuely-utterance-")
        .suffix(".wav")
        .tempfile()
        .context("Failed to create temporary WAV file")?;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let handle = file
        .reopen()
        .context("Failed to reopen temporary WAV file")?;
    let mut writer = hound::WavWriter::new(BufWriter::new(handle), spec)
        .context("Failed to create WAV writer")?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .context("Failed to write sample to WAV")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    info!(
        "Wrote {} samples ({:.1}s) to {}",
        samples.len(),
        samples.len() as f64 / sample_rate.max(1) as f64,
        file.path().display()
    );

    Ok(file)
}
