//! Audio decoding, normalization, and WAV encoding.

pub mod encoder;
pub mod normalizer;

pub use encoder::{encode_wav_mono16, quantize_sample};
pub use normalizer::AudioBuffer;
