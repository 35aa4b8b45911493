// Test doubles for the episode pipeline.
//
// ScriptedGenerator (TextGenerator): per-mode canned text, records every call.
// Unscripted modes fall through to the deterministic fallback script, exactly
// like a failed network call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use newsroom_common::{GenerationMode, PrimitiveWeights};

use crate::generator::{fallback_text, Generation, GenerationProfile, TextGenerator, FALLBACK_MODEL};
use crate::hashing::short_hash;
use crate::prompt::build_prompt;

pub const SCRIPTED_MODEL: &str = "scripted";

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub topic: String,
    pub mode: GenerationMode,
    pub weights: PrimitiveWeights,
    pub prompt: String,
}

#[derive(Default)]
pub struct ScriptedGenerator {
    scripts: HashMap<GenerationMode, String>,
    calls: Mutex<Vec<GenerateCall>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_raw(mut self, text: impl Into<String>) -> Self {
        self.scripts.insert(GenerationMode::Raw, text.into());
        self
    }

    pub fn on_optimized(mut self, text: impl Into<String>) -> Self {
        self.scripts.insert(GenerationMode::Optimized, text.into());
        self
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, mode: GenerationMode) -> usize {
        self.calls().iter().filter(|c| c.mode == mode).count()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn model(&self) -> &str {
        SCRIPTED_MODEL
    }

    async fn generate(
        &self,
        topic: &str,
        weights: &PrimitiveWeights,
        mode: GenerationMode,
    ) -> Generation {
        let prompt = build_prompt(topic, weights, mode);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(GenerateCall {
                topic: topic.to_string(),
                mode,
                weights: *weights,
                prompt: prompt.clone(),
            });
        }

        let (text, used_fallback) = match self.scripts.get(&mode) {
            Some(text) => (text.clone(), false),
            None => (fallback_text(topic, mode), true),
        };

        Generation {
            profile: GenerationProfile {
                model_requested: SCRIPTED_MODEL.to_string(),
                model_used: if used_fallback {
                    FALLBACK_MODEL.to_string()
                } else {
                    SCRIPTED_MODEL.to_string()
                },
                mode,
                request_ms: 0,
                prompt_hash: short_hash(&prompt, 12),
                prompt_chars: prompt.len(),
                tokens_out_est: text.split_whitespace().count(),
                used_fallback,
                failure_chain: if used_fallback {
                    vec!["no script for mode".to_string()]
                } else {
                    vec![]
                },
            },
            text,
        }
    }
}
