//! Chunk window planning.
//!
//! Splits a recording of `T` seconds into `ceil(T / C)` windows of at most
//! `C` seconds. Every window after the first starts `O` seconds early so the
//! model can re-identify speakers across the boundary; the duplicated span
//! is transcription-free by instruction and deduplicated downstream.

use crate::error::{LongscribeError, Result};

/// One bounded time window of the recording.
///
/// `audio_start`/`audio_end` are absolute session seconds. `overlap_secs` is
/// the leading span duplicated from the previous window (0 for the first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkWindow {
    pub index: usize,
    pub audio_start: f64,
    pub audio_end: f64,
    pub overlap_secs: f64,
}

impl ChunkWindow {
    pub fn duration_secs(&self) -> f64 {
        self.audio_end - self.audio_start
    }
}

/// Plan the ordered list of chunk windows for a recording.
///
/// Windows are emitted in increasing index order and jointly cover
/// `[0, total_secs)`; the last window is clamped to `total_secs`.
pub fn plan_windows(total_secs: f64, chunk_secs: f64, overlap_secs: f64) -> Result<Vec<ChunkWindow>> {
    if !chunk_secs.is_finite() || chunk_secs <= 0.0 {
        return Err(LongscribeError::InvalidChunking {
            message: format!("chunk duration must be positive, got {}", chunk_secs),
        });
    }
    if !overlap_secs.is_finite() || overlap_secs <= 0.0 {
        return Err(LongscribeError::InvalidChunking {
            message: format!("overlap duration must be positive, got {}", overlap_secs),
        });
    }
    if overlap_secs >= chunk_secs {
        return Err(LongscribeError::InvalidChunking {
            message: format!(
                "overlap ({}s) must be shorter than the chunk duration ({}s)",
                overlap_secs, chunk_secs
            ),
        });
    }
    if total_secs <= 0.0 {
        return Err(LongscribeError::EmptyAudio);
    }

    let count = (total_secs / chunk_secs).ceil() as usize;
    let windows = (0..count)
        .map(|index| {
            let nominal_start = index as f64 * chunk_secs;
            let audio_start = if index == 0 {
                0.0
            } else {
                (nominal_start - overlap_secs).max(0.0)
            };
            ChunkWindow {
                index,
                audio_start,
                audio_end: ((index + 1) as f64 * chunk_secs).min(total_secs),
                overlap_secs: nominal_start - audio_start,
            }
        })
        .collect();

    Ok(windows)
}
