//! Gemini `generateContent` REST client.
//!
//! Audio travels inline as base64 WAV next to the prompt text; responses
//! come back as candidate content parts. Anything other than a 2xx with at
//! least one text part maps to `TranscriptionRequest`.

use crate::defaults;
use crate::error::{LongscribeError, Result};
use crate::model::client::{ChunkRequest, ModelClient};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How much of an error response body to quote in error messages.
const ERROR_BODY_PREVIEW_BYTES: usize = 300;

/// HTTP client for the Gemini generateContent API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    transcribe_temperature: f32,
    analysis_temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transcribe_temperature: defaults::TRANSCRIBE_TEMPERATURE,
            analysis_temperature: defaults::ANALYSIS_TEMPERATURE,
        }
    }

    /// Point the client at a different endpoint (self-hosted proxy, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperatures(mut self, transcribe: f32, analysis: f32) -> Self {
        self.transcribe_temperature = transcribe;
        self.analysis_temperature = analysis;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn invoke(&self, body: &GenerateContentRequest) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LongscribeError::TranscriptionRequest {
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let mut preview = detail.as_str();
            if preview.len() > ERROR_BODY_PREVIEW_BYTES {
                let mut cut = ERROR_BODY_PREVIEW_BYTES;
                while !preview.is_char_boundary(cut) {
                    cut -= 1;
                }
                preview = &preview[..cut];
            }
            return Err(LongscribeError::TranscriptionRequest {
                message: format!("server returned {}: {}", status, preview),
            });
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| LongscribeError::TranscriptionRequest {
                    message: format!("invalid response body: {}", e),
                })?;

        parsed
            .first_text()
            .ok_or_else(|| LongscribeError::TranscriptionRequest {
                message: "response contained no text candidates".to_string(),
            })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn transcribe(&self, request: &ChunkRequest) -> Result<String> {
        let audio = base64::engine::general_purpose::STANDARD.encode(&request.audio_wav);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline_data("audio/wav", audio), Part::text(&request.prompt)],
            }],
            system_instruction: Some(Content {
                parts: vec![Part::text(&request.system_instruction)],
            }),
            generation_config: GenerationConfig {
                temperature: self.transcribe_temperature,
            },
        };
        self.invoke(&body).await
    }

    async fn generate(&self, system_instruction: Option<&str>, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            system_instruction: system_instruction.map(|text| Content {
                parts: vec![Part::text(text)],
            }),
            generation_config: GenerationConfig {
                temperature: self.analysis_temperature,
            },
        };
        self.invoke(&body).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
