//! Thin client for hosted text-generation inference endpoints.
//!
//! One request, one response. Retries and fallbacks belong to the caller.

pub mod huggingface;
pub mod util;

pub use huggingface::{GenerationParameters, HuggingFace, TextGenerationRequest};
