//! Error types for longscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LongscribeError {
    // Audio input errors
    #[error("Failed to decode audio: {message}")]
    Decode { message: String },

    #[error("Audio input has zero duration")]
    EmptyAudio,

    // Chunk planning errors
    #[error("Invalid chunking parameters: {message}")]
    InvalidChunking { message: String },

    // External model errors
    #[error("Transcription request failed: {message}")]
    TranscriptionRequest { message: String },

    // Timestamp errors (non-fatal: logged and left in place by the reconciler)
    #[error("Malformed timestamp marker: {raw}")]
    MalformedTimestamp { raw: String },

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LongscribeError>;
