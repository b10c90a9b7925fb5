//! Audio normalization: decode to PCM, down-mix to mono, resample.
//!
//! Accepts WAV containers with any sample rate and channel count, in integer
//! (8/16/24/32-bit) or 32-bit float formats, and produces a mono f32 buffer
//! in [-1, 1] at the target rate.

use crate::error::{LongscribeError, Result};
use std::io::Read;
use std::path::Path;

/// Normalized mono PCM audio: f32 samples in [-1, 1] at a fixed rate.
///
/// Owned by one transcription job for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap already-normalized samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decode a WAV stream and normalize it to mono at `target_rate`.
    pub fn from_wav_reader<R: Read>(reader: R, target_rate: u32) -> Result<Self> {
        let mut wav_reader = hound::WavReader::new(reader).map_err(|e| LongscribeError::Decode {
            message: format!("Failed to parse WAV file: {}", e),
        })?;

        let spec = wav_reader.spec();
        if spec.channels == 0 {
            return Err(LongscribeError::Decode {
                message: "WAV file declares zero channels".to_string(),
            });
        }
        if target_rate == 0 {
            return Err(LongscribeError::Decode {
                message: "target sample rate must be positive".to_string(),
            });
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => wav_reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| LongscribeError::Decode {
                    message: format!("Failed to read WAV samples: {}", e),
                })?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                wav_reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| LongscribeError::Decode {
                        message: format!("Failed to read WAV samples: {}", e),
                    })?
            }
        };

        let mono = downmix(&interleaved, spec.channels as usize);
        let samples = if spec.sample_rate != target_rate {
            resample(&mono, spec.sample_rate, target_rate)
        } else {
            mono
        };

        Ok(Self {
            samples,
            sample_rate: target_rate,
        })
    }

    /// Decode a WAV file from disk and normalize it to mono at `target_rate`.
    pub fn from_wav_file(path: &Path, target_rate: u32) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_wav_reader(std::io::BufReader::new(file), target_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Average each frame of interleaved samples down to one channel.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx.min(samples.len().saturating_sub(1))]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
