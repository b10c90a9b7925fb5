//! Mono 16-bit WAV encoding for transmission.
//!
//! Chunks are shipped to the model as canonical uncompressed WAV: a 44-byte
//! RIFF header followed by little-endian PCM16.

use crate::error::{LongscribeError, Result};
use std::io::Cursor;

/// Quantize one float sample in [-1, 1] to a signed 16-bit value.
///
/// The scale is asymmetric: negatives map through 32768, non-negatives
/// through 32767, so both ends of [-1, 1] land exactly on the i16 range.
/// Out-of-range input clamps; in-range values truncate toward zero.
pub fn quantize_sample(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled as i16
}

/// Encode normalized samples as a mono PCM16 WAV byte vector.
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| LongscribeError::Other(format!(
            "Failed to start WAV encoding: {}",
            e
        )))?;

    for &sample in samples {
        writer
            .write_sample(quantize_sample(sample))
            .map_err(|e| LongscribeError::Other(format!("Failed to encode WAV sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| LongscribeError::Other(format!("Failed to finalize WAV encoding: {}", e)))?;

    Ok(cursor.into_inner())
}
