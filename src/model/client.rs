//! Client trait for the external transcription/generation model.
//!
//! The pipeline treats the model as an opaque request/response collaborator.
//! The trait allows swapping implementations (HTTP service vs mock).

use crate::error::{LongscribeError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// One per-chunk transcription request: encoded audio plus instructions.
#[derive(Debug, Clone)]
pub struct ChunkRequest {
    /// Mono PCM16 WAV payload for this chunk.
    pub audio_wav: Vec<u8>,
    /// Per-chunk prompt (part header, overlap calibration, excerpt).
    pub prompt: String,
    /// Fixed transcription conventions.
    pub system_instruction: String,
}

/// Access to the external large-context model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Transcribe one chunk of audio. Returns the model's raw text output,
    /// timestamps still relative to the chunk.
    async fn transcribe(&self, request: &ChunkRequest) -> Result<String>;

    /// Whole-text round trip for summaries and translations.
    async fn generate(&self, system_instruction: Option<&str>, prompt: &str) -> Result<String>;

    /// Model identifier used for requests.
    fn model_name(&self) -> &str;
}

enum MockOutcome {
    Reply(String),
    Fail(String),
}

/// Mock model for testing: replays a scripted sequence of outcomes and
/// records every request it receives.
#[derive(Default)]
pub struct MockModelClient {
    script: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<ChunkRequest>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_response(self, text: &str) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(MockOutcome::Reply(text.to_string()));
        self
    }

    /// Queue a request failure.
    pub fn with_failure(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(MockOutcome::Fail(message.to_string()));
        self
    }

    /// All chunk requests received so far, in order.
    pub fn recorded_requests(&self) -> Vec<ChunkRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_outcome(&self) -> Result<String> {
        match self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(MockOutcome::Reply(text)) => Ok(text),
            Some(MockOutcome::Fail(message)) => {
                Err(LongscribeError::TranscriptionRequest { message })
            }
            None => Ok("mock transcription".to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn transcribe(&self, request: &ChunkRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.next_outcome()
    }

    async fn generate(&self, _system_instruction: Option<&str>, _prompt: &str) -> Result<String> {
        self.next_outcome()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
