// Tests for the temporary WAV handoff
//
// The transcription contract requires the scratch file to exist while the
// handle is held and to be gone once it drops, success or not.

use anyhow::Result;
use cuely::audio::wav;
use std::path::PathBuf;

#[test]
fn test_temp_wav_roundtrip() -> Result<()> {
    let samples: Vec<i16> = (0..2048).map(|i| (i % 512) as i16).collect();

    let file = wav::write_temp_wav(&samples, 16000)?;
    assert!(file.path().exists(), "Scratch file should exist while held");

    let reader = hound::WavReader::open(file.path())?;
    let spec = reader.spec();
    assert_eq!(spec.channels, 1, "Utterance WAVs are mono");
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);

    let read_back: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(read_back, samples, "Samples should survive the roundtrip");

    Ok(())
}

#[test]
fn test_temp_wav_removed_on_drop() -> Result<()> {
    let samples = vec![0i16; 160];

    let path: PathBuf = {
        let file = wav::write_temp_wav(&samples, 16000)?;
        file.path().to_path_buf()
    };

    assert!(!path.exists(), "Scratch file should be removed on drop");

    Ok(())
}

#[test]
fn test_temp_wav_accepts_empty_input() -> Result<()> {
    // Callers skip transcription for empty utterances, but the writer itself
    // should not choke on zero samples.
    let file = wav::write_temp_wav(&[], 16000)?;

    let reader = hound::WavReader::open(file.path())?;
    assert_eq!(reader.len(), 0);

    Ok(())
}
