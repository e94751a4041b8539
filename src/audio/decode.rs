//! Decode uploaded or fixture audio files to mono PCM.
//!
//! Plain 16-bit WAV goes through hound directly; everything else (M4A, MP3,
//! OGG, FLAC, float/24-bit WAV) goes through symphonia's probe-and-decode
//! pipeline. The transcription engine wants 16kHz mono, so callers usually
//! want `load_mono`.

use anyhow::{anyhow, Context, Result};
use hound::WavReader;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{info, warn};

use super::resample;

/// Interleaved PCM pulled out of an audio container
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels.max(1) as f64)
    }
}

/// Decode a file and reduce it to mono at `target_rate`.
pub fn load_mono(path: impl AsRef<Path>, target_rate: u32) -> Result<Vec<i16>> {
    let decoded = open(path.as_ref())?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    Ok(resample_mono(&mono, decoded.sample_rate, target_rate))
}

/// Decode a file, keeping its native rate and channel layout.
pub fn open(path: &Path) -> Result<DecodedAudio> {
    info!("Decoding audio file: {}", path.display());

    // Fast path: the WAVs we write ourselves are 16-bit integer PCM and hound
    // reads them without the probe machinery.
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if is_wav {
        if let Ok(reader) = WavReader::open(path) {
            let spec = reader.spec();
            if spec.sample_format == hound::SampleFormat::Int && spec.bits_per_sample == 16 {
                return read_wav_i16(reader);
            }
        }
        // Float or 24-bit WAV: let symphonia handle it below.
    }

    open_with_symphonia(path)
}

fn read_wav_i16(reader: WavReader<std::io::BufReader<File>>) -> Result<DecodedAudio> {
    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read WAV samples")?;

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

fn open_with_symphonia(path: &Path) -> Result<DecodedAudio> {
    let src = File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unrecognized audio container")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("No decodable audio track found"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| anyhow!("Audio track has no sample rate"))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut samples: Vec<i16> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e).context("Failed to read audio packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, *decoded.spec());
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Recoverable decode error: skip the packet, keep going.
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(e).context("Failed to decode audio packet"),
        }
    }

    if samples.is_empty() {
        return Err(anyhow!("Audio file contained no samples"));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Collapse interleaved samples to mono. Stereo sums the channels (clamped)
/// to preserve perceived volume; wider layouts average.
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    match channels {
        0 | 1 => samples.to_vec(),
        2 => samples
            .chunks_exact(2)
            .map(|pair| {
                let sum = pair[0] as i32 + pair[1] as i32;
                sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16
            })
            .collect(),
        n => samples
            .chunks(n as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect(),
    }
}

/// Resample mono i16 PCM between rates.
pub fn resample_mono(samples: &[i16], source_rate: u32, target_rate: u32) -> Vec<i16> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let floats: Vec<f32> = samples.iter().map(|&s| s as f32 / 32_768.0).collect();
    resample::to_target_rate(&floats, source_rate, target_rate)
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * 32_767.0) as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_stereo_sums_channels() {
        let stereo = vec![100, 200, -50, -50];
        assert_eq!(downmix_to_mono(&stereo, 2), vec![300, -100]);
    }

    #[test]
    fn downmix_mono_is_passthrough() {
        let mono = vec![1, 2, 3];
        assert_eq!(downmix_to_mono(&mono, 1), mono);
    }

    #[test]
    fn downmix_stereo_clamps() {
        let loud = vec![i16::MAX, i16::MAX];
        assert_eq!(downmix_to_mono(&loud, 2), vec![i16::MAX]);
    }

    #[test]
    fn resample_identity() {
        let samples = vec![10, 20, 30];
        assert_eq!(resample_mono(&samples, 16000, 16000), samples);
    }
}
