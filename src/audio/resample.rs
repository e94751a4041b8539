//! Sample rate conversion for capture frames and decoded uploads.
//!
//! Linear interpolation is enough here: utterances are short speech snippets
//! headed for a 16kHz speech model, so phase accuracy matters less than
//! keeping the capture callback cheap.

use std::cmp::Ordering;

/// Resample `input` from `source_rate` to `target_rate`.
pub fn to_target_rate(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == 0 || input.is_empty() || source_rate == target_rate {
        return input.to_vec();
    }
    let ratio = target_rate as f32 / source_rate as f32;
    resample_linear(input, ratio)
}

/// Lightweight linear resampler.
pub fn resample_linear(input: &[f32], ratio: f32) -> Vec<f32> {
    let input_len = input.len();
    let output_len = (input_len as f32 * ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_idx = i as f32 / ratio;
        let idx = src_idx.floor() as usize;
        let frac = src_idx - idx as f32;

        if idx + 1 < input_len {
            let sample = input[idx] * (1.0 - frac) + input[idx + 1] * frac;
            output.push(sample);
        } else {
            let pad = input.last().copied().unwrap_or(0.0);
            output.push(pad);
        }
    }

    output
}

/// Pin a resampled frame to an exact length so downstream consumers can rely
/// on fixed-size blocks. Rounding during resampling can leave the frame a
/// sample short or long.
pub fn pin_length(mut data: Vec<f32>, desired: usize) -> Vec<f32> {
    match data.len().cmp(&desired) {
        Ordering::Greater => {
            data.truncate(desired);
        }
        Ordering::Less => {
            let pad = *data.last().unwrap_or(&0.0);
            data.resize(desired, pad);
        }
        Ordering::Equal => {}
    }
    data
}
