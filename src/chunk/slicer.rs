//! Contiguous sample extraction for a chunk window.

use crate::audio::AudioBuffer;
use crate::chunk::ChunkWindow;

/// Borrow the samples covering `[audio_start, audio_end)` of a window.
///
/// Start index and length are floored to whole samples and clamped to the
/// buffer, so a window that overshoots the decoded audio (rounding at the
/// tail) yields a slightly shorter slice instead of panicking.
pub fn slice_window<'a>(buffer: &'a AudioBuffer, window: &ChunkWindow) -> &'a [f32] {
    let rate = buffer.sample_rate() as f64;
    let start = ((window.audio_start * rate).floor() as usize).min(buffer.len());
    let length = (window.duration_secs() * rate).floor() as usize;
    let end = start.saturating_add(length).min(buffer.len());
    &buffer.samples()[start..end]
}
