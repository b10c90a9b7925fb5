//! Sequential transcription job pipeline.

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{CancelToken, JobConfig, JobOutcome, JobStatus, TranscriptionJob};
pub use progress::{CollectingProgress, NoopProgress, ProgressSink};
