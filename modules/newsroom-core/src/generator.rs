//! Text generation behind a trait, with a deterministic fallback.
//!
//! Generation never fails from the caller's point of view: any error on the
//! single outbound request is absorbed into a canned per-mode script.

use std::time::Instant;

use ai_client::util::strip_echoed_prompt;
use ai_client::{GenerationParameters, HuggingFace};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use newsroom_common::{GenerationMode, PrimitiveWeights};

use crate::evaluator::BANNED_PRODUCTS;
use crate::hashing::short_hash;
use crate::prompt::build_prompt;

pub const FALLBACK_MODEL: &str = "fallback";
const DEFAULT_MAX_NEW_TOKENS: u32 = 200;

/// Diagnostics for one generation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub model_requested: String,
    pub model_used: String,
    pub mode: GenerationMode,
    pub request_ms: u64,
    pub prompt_hash: String,
    pub prompt_chars: usize,
    pub tokens_out_est: usize,
    pub used_fallback: bool,
    pub failure_chain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub profile: GenerationProfile,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    async fn generate(
        &self,
        topic: &str,
        weights: &PrimitiveWeights,
        mode: GenerationMode,
    ) -> Generation;
}

// ---------------------------------------------------------------------------
// HuggingFaceGenerator
// ---------------------------------------------------------------------------

pub struct HuggingFaceGenerator {
    hf: HuggingFace,
    max_new_tokens: u32,
}

impl HuggingFaceGenerator {
    pub fn new(hf: HuggingFace) -> Self {
        Self {
            hf,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    fn parameters(&self, mode: GenerationMode) -> GenerationParameters {
        GenerationParameters {
            max_new_tokens: self.max_new_tokens,
            temperature: mode.temperature(),
            do_sample: true,
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    fn model(&self) -> &str {
        self.hf.model()
    }

    async fn generate(
        &self,
        topic: &str,
        weights: &PrimitiveWeights,
        mode: GenerationMode,
    ) -> Generation {
        let prompt = build_prompt(topic, weights, mode);
        let started = Instant::now();

        let outcome = self
            .hf
            .text_generation(prompt.as_str(), self.parameters(mode))
            .await
            .and_then(|raw| {
                let text = strip_echoed_prompt(&raw, &prompt);
                if text.trim().is_empty() {
                    anyhow::bail!("Empty completion from {}", self.hf.model());
                }
                Ok(text)
            });
        let request_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(text) => {
                info!(mode = %mode, chars = text.len(), request_ms, "Generation complete");
                Generation {
                    profile: GenerationProfile {
                        model_requested: self.hf.model().to_string(),
                        model_used: self.hf.model().to_string(),
                        mode,
                        request_ms,
                        prompt_hash: short_hash(&prompt, 12),
                        prompt_chars: prompt.len(),
                        tokens_out_est: estimate_tokens(&text),
                        used_fallback: false,
                        failure_chain: vec![],
                    },
                    text,
                }
            }
            Err(e) => {
                warn!(error = %e, mode = %mode, request_ms, "Generation failed, using fallback");
                fallback_generation(
                    self.hf.model(),
                    topic,
                    &prompt,
                    mode,
                    request_ms,
                    vec![e.to_string()],
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// OfflineGenerator
// ---------------------------------------------------------------------------

/// Serves the fallback script without touching the network.
/// Used when no inference credentials are configured.
pub struct OfflineGenerator {
    model: String,
}

impl OfflineGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        topic: &str,
        weights: &PrimitiveWeights,
        mode: GenerationMode,
    ) -> Generation {
        let prompt = build_prompt(topic, weights, mode);
        fallback_generation(
            &self.model,
            topic,
            &prompt,
            mode,
            0,
            vec!["inference API key not configured".to_string()],
        )
    }
}

// ---------------------------------------------------------------------------
// Fallback scripts
// ---------------------------------------------------------------------------

/// Deterministic script used when generation fails.
///
/// The raw script is deliberately loaded with hallucination and hyperbole
/// triggers; the optimized one is clean and carries a dated attribution.
pub fn fallback_text(topic: &str, mode: GenerationMode) -> String {
    match mode {
        GenerationMode::Raw => format!(
            "Host: \"Hey folks, big news today around {topic}. \
             Sources say this is going to be a revolutionary, incredible, \
             game-changing breakthrough. GPT-7 is rumored to be involved. \
             Absolutely unbelievable developments. Stay tuned!\""
        ),
        GenerationMode::Optimized => {
            let topic = redact_banned_products(topic);
            format!(
                "Host: \"Welcome back. Today we cover {topic}. \
                 According to industry analysts on January 30, the situation \
                 is evolving. No confirmed details yet, but early indications \
                 suggest measured changes ahead. We'll keep you posted.\""
            )
        }
    }
}

fn fallback_generation(
    model: &str,
    topic: &str,
    prompt: &str,
    mode: GenerationMode,
    request_ms: u64,
    failure_chain: Vec<String>,
) -> Generation {
    let text = fallback_text(topic, mode);
    Generation {
        profile: GenerationProfile {
            model_requested: model.to_string(),
            model_used: FALLBACK_MODEL.to_string(),
            mode,
            request_ms,
            prompt_hash: short_hash(prompt, 12),
            prompt_chars: prompt.len(),
            tokens_out_est: text.split_whitespace().count(),
            used_fallback: true,
            failure_chain,
        },
        text,
    }
}

/// Replace unreleased product names in a topic so the clean script stays clean.
fn redact_banned_products(topic: &str) -> String {
    let mut out = topic.to_string();
    for phrase in BANNED_PRODUCTS {
        // ASCII lowering keeps byte offsets aligned with `out`.
        while let Some(pos) = out.to_ascii_lowercase().find(phrase) {
            out.replace_range(pos..pos + phrase.len(), "an unconfirmed model");
        }
    }
    out
}

fn estimate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count() as f64;
    ((words * 1.3).round() as usize).max(1)
}
