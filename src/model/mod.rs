//! External model access: request types, client trait, HTTP implementation.

pub mod client;
pub mod gemini;
pub mod prompt;

pub use client::{ChunkRequest, MockModelClient, ModelClient};
pub use gemini::GeminiClient;
