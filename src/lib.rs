//! longscribe - Long-form audio transcription through a large-context model
//!
//! Splits a recording into overlapping chunks, transcribes each chunk with
//! an external model, and stitches the results into one monotonic,
//! speaker- and time-annotated transcript.

// Enforce error handling discipline outside tests
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod analysis;
pub mod audio;
pub mod chunk;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod timestamp;

// Core types (audio → chunks → model → reconciled transcript)
pub use audio::AudioBuffer;
pub use chunk::{ChunkWindow, plan_windows, slice_window};
pub use model::{ChunkRequest, GeminiClient, MockModelClient, ModelClient};
pub use timestamp::{ReconciliationState, Reconciler};

// Pipeline
pub use pipeline::{
    CancelToken, JobConfig, JobOutcome, JobStatus, NoopProgress, ProgressSink, TranscriptionJob,
};

// Error handling
pub use error::{LongscribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.2+abc1234"` when git hash is available, `"0.1.2"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
