//! Default configuration constants for longscribe.
//!
//! The chunking and reconciliation values are tuned heuristics, not derived
//! bounds. They are collected here so every knob has one name and one home.

/// Target audio sample rate in Hz.
///
/// 16kHz mono is the standard rate for speech models and keeps per-chunk
/// payloads small enough for a single model request.
pub const SAMPLE_RATE: u32 = 16_000;

/// Default chunk duration in seconds (9 minutes).
///
/// Bounded by the model's practical per-request audio budget. Longer chunks
/// mean fewer requests but risk truncated responses.
pub const CHUNK_SECS: f64 = 540.0;

/// Default overlap duration in seconds.
///
/// Each chunk after the first replays this much of the previous chunk's tail
/// so the model can re-identify speakers before fresh transcription starts.
pub const OVERLAP_SECS: f64 = 20.0;

/// Minimum spacing in seconds between accepted timestamp markers.
///
/// Markers closer than this to the last accepted one are re-emissions from
/// the overlapped span and are dropped. The model is asked to stamp every
/// 1-2 minutes, so genuine neighbors sit well above the 20s overlap; 110s
/// splits the two populations with margin on both sides.
pub const MIN_MARKER_SPACING_SECS: f64 = 110.0;

/// Maximum length in characters of the calibration excerpt quoted in a
/// chunk prompt.
pub const CALIBRATION_EXCERPT_CHARS: usize = 300;

/// Maximum length in characters of the raw-output tail carried between
/// chunks as speaker-calibration ground truth.
pub const CONTEXT_TAIL_CHARS: usize = 800;

/// Default model identifier for transcription and analysis requests.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Sampling temperature for transcription requests.
///
/// Low so the model sticks to what was said instead of paraphrasing.
pub const TRANSCRIBE_TEMPERATURE: f32 = 0.2;

/// Sampling temperature for summary and translation requests.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;
