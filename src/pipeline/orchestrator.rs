//! Transcription job orchestration.
//!
//! One job drives the whole pipeline strictly sequentially:
//! `Normalizing → Planning → {Encoding → Requesting → Reconciling}* →
//! Completed | Failed`. Chunk i+1's request is not built until chunk i has
//! been reconciled, because the prompt depends on the carried-over tail of
//! chunk i's raw output.
//!
//! Partial results are first class: once the first request has been sent,
//! failures surface as a `Failed` outcome that still carries every fully
//! reconciled chunk, never as a bare error.

use crate::audio::{AudioBuffer, encode_wav_mono16};
use crate::chunk::{ChunkWindow, plan_windows, slice_window};
use crate::defaults;
use crate::error::{LongscribeError, Result};
use crate::model::prompt;
use crate::model::{ChunkRequest, ModelClient};
use crate::pipeline::progress::ProgressSink;
use crate::timestamp::{ReconciliationState, Reconciler};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tunable parameters for one transcription job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobConfig {
    pub chunk_secs: f64,
    pub overlap_secs: f64,
    pub sample_rate: u32,
    pub min_marker_spacing_secs: f64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            chunk_secs: defaults::CHUNK_SECS,
            overlap_secs: defaults::OVERLAP_SECS,
            sample_rate: defaults::SAMPLE_RATE,
            min_marker_spacing_secs: defaults::MIN_MARKER_SPACING_SECS,
        }
    }
}

/// Terminal status of a job.
#[derive(Debug)]
pub enum JobStatus {
    Completed,
    /// A chunk request failed; earlier chunks remain in the transcript.
    Failed(LongscribeError),
    /// The job was aborted between chunks.
    Cancelled,
}

impl JobStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

/// Final result of a job, partial or complete.
#[derive(Debug)]
pub struct JobOutcome {
    /// Reconciled transcript of every processed chunk.
    pub transcript: String,
    /// Chunks fully reconciled before the job ended.
    pub chunks_processed: usize,
    pub total_chunks: usize,
    pub status: JobStatus,
}

/// Cooperative cancellation flag, checked between chunks.
///
/// Cancelling mid-request abandons the in-flight chunk; the transcript only
/// ever contains fully reconciled chunks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One transcription job: normalizes the input, plans chunk windows, and
/// folds the chunk list through the external model and the reconciler.
pub struct TranscriptionJob<M: ModelClient> {
    model: M,
    config: JobConfig,
    reconciler: Reconciler,
    cancel: CancelToken,
}

impl<M: ModelClient> TranscriptionJob<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, JobConfig::default())
    }

    pub fn with_config(model: M, config: JobConfig) -> Self {
        Self {
            model,
            config,
            reconciler: Reconciler::with_min_spacing(config.min_marker_spacing_secs),
            cancel: CancelToken::new(),
        }
    }

    /// Handle for aborting the job between chunks.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The model client driving this job.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the job over a WAV stream.
    ///
    /// Errors before the first request (decode, planning) surface as `Err`.
    /// After requests begin, every path returns `Ok` with the partial or
    /// complete transcript in the outcome.
    pub async fn run<R: Read>(&self, input: R, progress: &dyn ProgressSink) -> Result<JobOutcome> {
        log::debug!("job state: Normalizing");
        progress.report("Normalizing audio", 0);
        let buffer = AudioBuffer::from_wav_reader(input, self.config.sample_rate)?;

        log::debug!("job state: Planning");
        progress.report("Planning chunks", 0);
        let windows = plan_windows(
            buffer.duration_secs(),
            self.config.chunk_secs,
            self.config.overlap_secs,
        )?;

        self.run_windows(&buffer, &windows, progress).await
    }

    /// Run the already-planned chunk list. Split out so the fold is
    /// testable with a prepared buffer.
    async fn run_windows(
        &self,
        buffer: &AudioBuffer,
        windows: &[ChunkWindow],
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome> {
        let total = windows.len();
        let mut transcript = String::new();
        let mut state = ReconciliationState::new();

        for window in windows {
            if self.cancel.is_cancelled() {
                log::info!(
                    "job cancelled after {}/{} chunks",
                    window.index,
                    total
                );
                return Ok(JobOutcome {
                    transcript,
                    chunks_processed: window.index,
                    total_chunks: total,
                    status: JobStatus::Cancelled,
                });
            }

            let percent = percent_before(window.index, total);
            progress.report(
                &format!("Transcribing part {}/{}", window.index + 1, total),
                percent,
            );

            let raw_text = match self.process_chunk(buffer, window, total, &state).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("chunk {} failed: {}", window.index, e);
                    return Ok(JobOutcome {
                        transcript,
                        chunks_processed: window.index,
                        total_chunks: total,
                        status: JobStatus::Failed(e),
                    });
                }
            };

            log::debug!("job state: Reconciling (chunk {})", window.index);
            let reconciled = self
                .reconciler
                .reconcile(&raw_text, window.audio_start, &state);
            log::debug!(
                "chunk {}: {} markers accepted, {} dropped",
                window.index,
                reconciled.accepted,
                reconciled.dropped
            );
            transcript.push_str(&reconciled.text);

            // The carry-over tail must come from the RAW model output; the
            // corrected text exists only for the transcript.
            state = state.advance(&raw_text, reconciled.last_accepted_secs);
        }

        log::debug!("job state: Completed");
        progress.report("Transcription complete", 100);
        Ok(JobOutcome {
            transcript,
            chunks_processed: total,
            total_chunks: total,
            status: JobStatus::Completed,
        })
    }

    /// Encode one window and request its transcription.
    async fn process_chunk(
        &self,
        buffer: &AudioBuffer,
        window: &ChunkWindow,
        total: usize,
        state: &ReconciliationState,
    ) -> Result<String> {
        log::debug!("job state: Encoding (chunk {})", window.index);
        let samples = slice_window(buffer, window);
        let audio_wav = encode_wav_mono16(samples, buffer.sample_rate())?;

        let request = ChunkRequest {
            audio_wav,
            prompt: prompt::chunk_prompt(
                window.index,
                total,
                window.overlap_secs,
                state.calibration_excerpt(),
            ),
            system_instruction: prompt::SYSTEM_INSTRUCTION.to_string(),
        };

        log::debug!(
            "job state: Requesting (chunk {}, {:.1}s of audio)",
            window.index,
            window.duration_secs()
        );
        self.model.transcribe(&request).await
    }
}

/// Progress percentage reported before chunk `index` is requested.
/// Reaches 100 only on completion.
fn percent_before(index: usize, total: usize) -> u8 {
    ((index as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModelClient;
    use crate::pipeline::progress::{CollectingProgress, NoopProgress};

    fn silent_buffer(secs: f64, rate: u32) -> AudioBuffer {
        AudioBuffer::new(vec![0.0; (secs * rate as f64) as usize], rate)
    }

    /// Short windows keep test audio small: 10s chunks, 2s overlap.
    fn test_config() -> JobConfig {
        JobConfig {
            chunk_secs: 10.0,
            overlap_secs: 2.0,
            sample_rate: 1000,
            min_marker_spacing_secs: 110.0,
        }
    }

    async fn run_over_buffer(
        job: &TranscriptionJob<MockModelClient>,
        buffer: &AudioBuffer,
        progress: &dyn ProgressSink,
    ) -> JobOutcome {
        let windows = plan_windows(
            buffer.duration_secs(),
            job.config.chunk_secs,
            job.config.overlap_secs,
        )
        .unwrap();
        job.run_windows(buffer, &windows, progress).await.unwrap()
    }

    #[tokio::test]
    async fn single_chunk_job_completes() {
        let mock = MockModelClient::new().with_response("[00:00] hello world");
        let job = TranscriptionJob::with_config(mock, test_config());
        let buffer = silent_buffer(5.0, 1000);

        let outcome = run_over_buffer(&job, &buffer, &NoopProgress).await;

        assert!(outcome.status.is_completed());
        assert_eq!(outcome.chunks_processed, 1);
        assert_eq!(outcome.total_chunks, 1);
        assert_eq!(outcome.transcript, "[00:00] hello world");
    }

    #[tokio::test]
    async fn requests_are_strictly_sequential_with_carry_over() {
        let mock = MockModelClient::new()
            .with_response("[00:00] Speaker A: first chunk tail text")
            .with_response("[00:05] Speaker A: second chunk");
        let job = TranscriptionJob::with_config(mock, test_config());
        let buffer = silent_buffer(15.0, 1000);

        let outcome = run_over_buffer(&job, &buffer, &NoopProgress).await;
        assert!(outcome.status.is_completed());

        let requests = job.model.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.contains("Part 1/2"));
        assert!(!requests[0].prompt.contains("Overlap reference"));
        assert!(requests[1].prompt.contains("Part 2/2"));
        assert!(requests[1].prompt.contains("first 2 seconds"));
        // Chunk 1's prompt quotes chunk 0's raw output
        assert!(
            requests[1]
                .prompt
                .contains("Speaker A: first chunk tail text")
        );
    }

    #[tokio::test]
    async fn failed_chunk_keeps_partial_transcript() {
        let mock = MockModelClient::new()
            .with_response("[00:00] chunk zero text")
            .with_failure("server returned 500");
        let job = TranscriptionJob::with_config(mock, test_config());
        let buffer = silent_buffer(15.0, 1000);

        let outcome = run_over_buffer(&job, &buffer, &NoopProgress).await;

        match &outcome.status {
            JobStatus::Failed(LongscribeError::TranscriptionRequest { message }) => {
                assert!(message.contains("500"));
            }
            other => panic!("expected Failed status, got {:?}", other),
        }
        assert_eq!(outcome.chunks_processed, 1);
        assert_eq!(outcome.total_chunks, 2);
        assert_eq!(outcome.transcript, "[00:00] chunk zero text");
    }

    #[tokio::test]
    async fn overlap_reemitted_marker_is_dropped_across_chunks() {
        // Chunk 0 stamps 00:08 (abs 8s). Chunk 1 starts at 8s and re-stamps
        // 00:01 (abs 9s): a re-emission, dropped. 110s spacing would hide
        // everything at this scale, so the test tunes it down to 5s.
        let mut config = test_config();
        config.min_marker_spacing_secs = 5.0;
        let mock = MockModelClient::new()
            .with_response("[00:08] end of part one.")
            .with_response("[00:01] duplicate marker [00:09] fresh text");
        let job = TranscriptionJob::with_config(mock, config);
        let buffer = silent_buffer(15.0, 1000);

        let outcome = run_over_buffer(&job, &buffer, &NoopProgress).await;

        assert!(outcome.status.is_completed());
        // abs 9 - 8 = 1 < 5 dropped; abs 17 - 8 = 9 >= 5 accepted as [00:17]
        assert_eq!(
            outcome.transcript,
            "[00:08] end of part one. duplicate marker \n[00:17] fresh text"
        );
    }

    #[tokio::test]
    async fn progress_is_emitted_before_each_request_and_on_completion() {
        let mock = MockModelClient::new()
            .with_response("a")
            .with_response("b")
            .with_response("c");
        let job = TranscriptionJob::with_config(mock, test_config());
        let buffer = silent_buffer(25.0, 1000);
        let progress = CollectingProgress::new();

        let outcome = run_over_buffer(&job, &buffer, &progress).await;
        assert!(outcome.status.is_completed());

        let updates = progress.updates();
        assert_eq!(
            updates,
            vec![
                ("Transcribing part 1/3".to_string(), 0),
                ("Transcribing part 2/3".to_string(), 33),
                ("Transcribing part 3/3".to_string(), 67),
                ("Transcription complete".to_string(), 100),
            ]
        );
    }

    #[tokio::test]
    async fn cancel_before_start_processes_nothing() {
        let mock = MockModelClient::new().with_response("[00:00] only chunk zero");
        let job = TranscriptionJob::with_config(mock, test_config());
        let buffer = silent_buffer(15.0, 1000);

        job.cancel_token().cancel();
        let outcome = run_over_buffer(&job, &buffer, &NoopProgress).await;

        assert!(matches!(outcome.status, JobStatus::Cancelled));
        assert_eq!(outcome.chunks_processed, 0);
        assert!(outcome.transcript.is_empty());
        assert!(job.model.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn cancellation_between_chunks_keeps_reconciled_output() {
        use crate::error::Result as LsResult;

        // Client that flips the cancel flag right after answering, so the
        // job observes the cancellation at the next chunk boundary.
        struct CancellingClient {
            inner: MockModelClient,
            token: std::sync::OnceLock<CancelToken>,
        }

        #[async_trait::async_trait]
        impl ModelClient for CancellingClient {
            async fn transcribe(&self, request: &ChunkRequest) -> LsResult<String> {
                let text = self.inner.transcribe(request).await?;
                if let Some(token) = self.token.get() {
                    token.cancel();
                }
                Ok(text)
            }

            async fn generate(
                &self,
                system_instruction: Option<&str>,
                prompt: &str,
            ) -> LsResult<String> {
                self.inner.generate(system_instruction, prompt).await
            }

            fn model_name(&self) -> &str {
                "cancelling-mock"
            }
        }

        let client = CancellingClient {
            inner: MockModelClient::new().with_response("[00:00] only chunk zero"),
            token: std::sync::OnceLock::new(),
        };
        let job = TranscriptionJob::with_config(client, test_config());
        job.model.token.set(job.cancel_token()).ok();
        let buffer = silent_buffer(15.0, 1000);

        let windows = plan_windows(15.0, 10.0, 2.0).unwrap();
        let outcome = job
            .run_windows(&buffer, &windows, &NoopProgress)
            .await
            .unwrap();

        assert!(matches!(outcome.status, JobStatus::Cancelled));
        assert_eq!(outcome.chunks_processed, 1);
        assert_eq!(outcome.total_chunks, 2);
        assert_eq!(outcome.transcript, "[00:00] only chunk zero");
        assert_eq!(job.model.inner.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn run_surfaces_decode_error_before_any_request() {
        let mock = MockModelClient::new();
        let job = TranscriptionJob::new(mock);

        let result = job
            .run(std::io::Cursor::new(b"not audio".to_vec()), &NoopProgress)
            .await;

        assert!(matches!(result, Err(LongscribeError::Decode { .. })));
        assert!(job.model.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn run_surfaces_empty_audio_before_any_request() {
        // A valid WAV with zero samples plans zero chunks
        let mut cursor = std::io::Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        writer.finalize().unwrap();
        let wav_bytes = cursor.into_inner();

        let mock = MockModelClient::new();
        let job = TranscriptionJob::new(mock);
        let result = job
            .run(std::io::Cursor::new(wav_bytes), &NoopProgress)
            .await;

        assert!(matches!(result, Err(LongscribeError::EmptyAudio)));
    }

    #[test]
    fn percent_before_matches_rounded_share() {
        assert_eq!(percent_before(0, 2), 0);
        assert_eq!(percent_before(1, 2), 50);
        assert_eq!(percent_before(2, 3), 67);
        assert_eq!(percent_before(9, 10), 90);
    }
}
