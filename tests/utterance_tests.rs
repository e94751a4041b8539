// Tests for utterance buffer assembly
//
// The buffer must concatenate capture frames in arrival order and report
// emptiness so callers can skip transcription for silent sessions.

use cuely::audio::{AudioFrame, UtteranceBuffer};

fn frame(index: usize, block_size: usize) -> AudioFrame {
    // Mark every sample with the frame index so ordering is observable
    AudioFrame {
        samples: vec![index as i16; block_size],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: (index * block_size) as u64 * 1000 / 16000,
    }
}

#[test]
fn test_empty_buffer() {
    let buffer = UtteranceBuffer::new();

    assert!(buffer.is_empty(), "New buffer should be empty");
    assert_eq!(buffer.frame_count(), 0);
    assert_eq!(buffer.sample_count(), 0);
    assert_eq!(buffer.duration_seconds(), 0.0);
    assert!(buffer.into_samples().is_empty());
}

#[test]
fn test_concatenation_length() {
    let block_size = 256;
    let frames = 8;

    let mut buffer = UtteranceBuffer::new();
    for i in 0..frames {
        buffer.push(frame(i, block_size));
    }

    assert_eq!(buffer.sample_count(), frames * block_size);

    let samples = buffer.into_samples();
    assert_eq!(
        samples.len(),
        frames * block_size,
        "N frames of B samples should concatenate to N*B"
    );
}

#[test]
fn test_concatenation_preserves_order() {
    let block_size = 128;
    let mut buffer = UtteranceBuffer::new();
    for i in 0..5 {
        buffer.push(frame(i, block_size));
    }

    let samples = buffer.into_samples();
    for (i, chunk) in samples.chunks(block_size).enumerate() {
        assert!(
            chunk.iter().all(|&s| s == i as i16),
            "Block {} should contain only its own frame's samples",
            i
        );
    }
}

#[test]
fn test_duration_tracks_sample_rate() {
    let mut buffer = UtteranceBuffer::new();
    buffer.push(AudioFrame {
        samples: vec![0; 16000],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 0,
    });

    assert!((buffer.duration_seconds() - 1.0).abs() < 1e-9);
}
