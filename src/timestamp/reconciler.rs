//! Timestamp reconciliation across chunk boundaries.
//!
//! Rewrites each chunk's relative markers into absolute session time and
//! drops markers the model re-emitted from the overlapped span. State flows
//! forward one chunk at a time through an explicit value, never ambient
//! mutation, so the sequential dependency stays visible and testable.

use crate::defaults;
use crate::timestamp::parser::{MarkerEvent, scan_markers};

/// Carry-over state between consecutive chunks.
///
/// `previous_tail` is the tail of the previous chunk's RAW model output:
/// the calibration reference must be the model's literal words, never the
/// corrected text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconciliationState {
    pub last_accepted_secs: f64,
    pub previous_tail: String,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed chunk into the state.
    pub fn advance(self, raw_chunk_text: &str, last_accepted_secs: f64) -> Self {
        Self {
            last_accepted_secs,
            previous_tail: tail_chars(raw_chunk_text, defaults::CONTEXT_TAIL_CHARS).to_string(),
        }
    }

    /// Bounded excerpt of the carried tail, quoted in the next chunk's
    /// prompt as speaker-calibration ground truth.
    pub fn calibration_excerpt(&self) -> Option<&str> {
        if self.previous_tail.is_empty() {
            None
        } else {
            Some(tail_chars(
                &self.previous_tail,
                defaults::CALIBRATION_EXCERPT_CHARS,
            ))
        }
    }
}

/// Last `max_chars` characters of a string, on a char boundary.
fn tail_chars(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((byte_idx, _)) => &text[byte_idx..],
        None => "",
    }
}

/// Result of reconciling one chunk of raw model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledChunk {
    /// Corrected text, ready to append to the transcript.
    pub text: String,
    /// Absolute second of the last accepted marker (carried forward).
    pub last_accepted_secs: f64,
    pub accepted: usize,
    pub dropped: usize,
}

/// Marker-by-marker timestamp rewriter and deduplicator.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    min_spacing_secs: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            min_spacing_secs: defaults::MIN_MARKER_SPACING_SECS,
        }
    }

    /// Override the dedup spacing (a tuning knob, not a derived bound).
    pub fn with_min_spacing(min_spacing_secs: f64) -> Self {
        Self { min_spacing_secs }
    }

    /// Rewrite one chunk's markers into absolute time.
    ///
    /// Markers are processed in order of appearance: offset by the chunk's
    /// `audio_start`, dropped when they land closer than the minimum spacing
    /// to the last accepted marker (re-emissions from the overlapped span),
    /// otherwise rewritten in place and adopted as the new reference point.
    /// Malformed markers are logged and left untouched.
    pub fn reconcile(
        &self,
        raw_text: &str,
        audio_start_secs: f64,
        state: &ReconciliationState,
    ) -> ReconciledChunk {
        let mut out = String::with_capacity(raw_text.len() + 16);
        let mut cursor = 0;
        let mut last_accepted = state.last_accepted_secs;
        let mut accepted = 0;
        let mut dropped = 0;

        for event in scan_markers(raw_text) {
            let marker = match event {
                MarkerEvent::Valid(marker) => marker,
                MarkerEvent::Malformed { raw, .. } => {
                    log::warn!("leaving malformed timestamp marker {} in place", raw);
                    continue;
                }
            };

            out.push_str(&raw_text[cursor..marker.span.start]);
            cursor = marker.span.end;

            let abs_secs = marker.rel_seconds as f64 + audio_start_secs;
            if last_accepted > 0.0 && abs_secs - last_accepted < self.min_spacing_secs {
                // Duplicate artifact of the overlap window: remove the
                // marker, keep the surrounding text.
                dropped += 1;
                continue;
            }

            // Accepted markers start a line; separators are only inserted
            // when missing so re-running over corrected text is a no-op.
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&format_marker(abs_secs));
            if raw_text[cursor..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace())
            {
                out.push(' ');
            }
            last_accepted = abs_secs;
            accepted += 1;
        }

        out.push_str(&raw_text[cursor..]);

        ReconciledChunk {
            text: out,
            last_accepted_secs: last_accepted,
            accepted,
            dropped,
        }
    }
}

/// Render an absolute second count as `[MM:SS]`.
///
/// Minutes grow past two digits for recordings over 100 minutes.
pub fn format_marker(abs_seconds: f64) -> String {
    let total = abs_seconds.max(0.0).floor() as u64;
    format!("[{:02}:{:02}]", total / 60, total % 60)
}
