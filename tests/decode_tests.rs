// Integration tests for audio decoding
//
// Fixtures are generated with hound so the tests carry no binary files.

use anyhow::Result;
use cuely::audio::decode;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_wav_fixture(channels: u16, sample_rate: u32, frames: usize) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new().suffix(".wav").tempfile()?;

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(file.path(), spec)?;
    for i in 0..frames {
        for _ in 0..channels {
            writer.write_sample((i % 1000) as i16)?;
        }
    }
    writer.finalize()?;

    Ok(file)
}

#[test]
fn test_open_reads_native_format() -> Result<()> {
    let fixture = write_wav_fixture(2, 44100, 4410)?;

    let decoded = decode::open(fixture.path())?;

    assert_eq!(decoded.sample_rate, 44100);
    assert_eq!(decoded.channels, 2);
    assert_eq!(decoded.samples.len(), 4410 * 2, "Samples stay interleaved");
    assert!((decoded.duration_seconds() - 0.1).abs() < 1e-6);

    Ok(())
}

#[test]
fn test_load_mono_downmixes_and_resamples() -> Result<()> {
    // 0.5s of stereo at 32kHz -> 0.5s of mono at 16kHz
    let fixture = write_wav_fixture(2, 32000, 16000)?;

    let mono = decode::load_mono(fixture.path(), 16000)?;

    assert_eq!(mono.len(), 8000, "Expected half the frames after 2:1 resample");

    Ok(())
}

#[test]
fn test_load_mono_passthrough_for_target_format() -> Result<()> {
    let fixture = write_wav_fixture(1, 16000, 1600)?;

    let mono = decode::load_mono(fixture.path(), 16000)?;

    assert_eq!(mono.len(), 1600, "16kHz mono input should pass through");

    Ok(())
}

#[test]
fn test_open_nonexistent_file_fails() {
    let result = decode::open(std::path::Path::new("/nonexistent/path/audio.wav"));
    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_open_garbage_fails() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile()?;
    file.write_all(b"this is not audio data at all")?;
    file.flush()?;

    let result = decode::open(file.path());
    assert!(result.is_err(), "Garbage input should not decode");

    Ok(())
}
