//! Episode orchestration: draft → evaluate → gate → [learn → regenerate → evaluate].
//!
//! At most one regeneration. The second evaluation is final whatever it says.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use newsroom_common::{EvaluationResult, GenerationMode, IssueType, Mutation, PrimitiveWeights};

use crate::evaluator::{evaluate, round4, EvaluatorConfig};
use crate::generator::{GenerationProfile, TextGenerator};
use crate::hashing::{short_hash, weights_hash};
use crate::learner::learn;
use crate::trace::{Decision, Stage, StepDetail, StepTimer, TraceBuilder, TraceStep};

/// Inputs for one episode.
#[derive(Debug, Clone)]
pub struct EpisodeRequest {
    pub episode_num: u32,
    pub episode_id: String,
    pub boot_id: String,
    pub topic: String,
    pub primitives: PrimitiveWeights,
}

impl EpisodeRequest {
    pub fn new(episode_num: u32, topic: impl Into<String>, primitives: PrimitiveWeights) -> Self {
        Self {
            episode_num,
            episode_id: new_episode_id(episode_num),
            boot_id: new_boot_id(),
            topic: topic.into(),
            primitives,
        }
    }

    pub fn with_boot_id(mut self, boot_id: impl Into<String>) -> Self {
        self.boot_id = boot_id.into();
        self
    }
}

pub fn new_episode_id(episode_num: u32) -> String {
    format!("ep_{}_{}", episode_num, &Uuid::new_v4().simple().to_string()[..8])
}

pub fn new_boot_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeIdentity {
    pub episode_num: u32,
    pub episode_id: String,
    pub boot_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub model: String,
    pub quality_score: f64,
    pub gate_passed: bool,
    pub draft_issues: Vec<IssueType>,
    pub final_issues: Vec<IssueType>,
    pub issues_count: usize,
    pub update_count: usize,
    pub retry_count: u32,
    pub latency_ms_total: u64,
}

/// Everything that happened in one episode, assembled for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub identity: EpisodeIdentity,
    pub topic: String,
    pub gate_threshold: f64,
    pub primitives_before: PrimitiveWeights,
    pub primitives_after: PrimitiveWeights,
    pub primitives_before_hash: String,
    pub primitives_after_hash: String,
    pub draft_text: String,
    pub draft_eval: EvaluationResult,
    pub draft_profile: GenerationProfile,
    pub final_text: String,
    pub final_eval: EvaluationResult,
    pub regen_profile: Option<GenerationProfile>,
    pub mutations: Vec<Mutation>,
    pub steps: Vec<TraceStep>,
    pub summary: EpisodeSummary,
    pub created_at: DateTime<Utc>,
}

impl Episode {
    pub fn regenerated(&self) -> bool {
        self.regen_profile.is_some()
    }
}

#[derive(Clone)]
pub struct EpisodeRunner {
    generator: Arc<dyn TextGenerator>,
    evaluator: EvaluatorConfig,
}

impl EpisodeRunner {
    pub fn new(generator: Arc<dyn TextGenerator>, evaluator: EvaluatorConfig) -> Self {
        Self {
            generator,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &EvaluatorConfig {
        &self.evaluator
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub async fn run(&self, request: EpisodeRequest) -> Episode {
        let EpisodeRequest {
            episode_num,
            episode_id,
            boot_id,
            topic,
            primitives,
        } = request;
        let before = primitives.clamped();
        let topic_hash = short_hash(&topic, 12);
        let mut trace = TraceBuilder::new();

        info!(episode_num, episode_id = %episode_id, topic = %topic, "Episode starting");

        // Draft
        let timer = StepTimer::start();
        let draft = self
            .generator
            .generate(&topic, &before, GenerationMode::Raw)
            .await;
        trace.finish_step(
            Stage::Draft,
            timer,
            StepDetail::new(
                json!({"topic_hash": topic_hash, "topic_chars": topic.len(), "mode": "raw"}),
                json!({
                    "draft_chars": draft.text.len(),
                    "draft_hash": short_hash(&draft.text, 12),
                    "used_fallback": draft.profile.used_fallback,
                }),
            ),
        );

        // Evaluate
        let timer = StepTimer::start();
        let draft_eval = evaluate(&draft.text, &before, &self.evaluator);
        trace.finish_step(
            Stage::Evaluate,
            timer,
            StepDetail::new(
                json!({
                    "text_hash": short_hash(&draft.text, 12),
                    "text_chars": draft.text.len(),
                    "gate_threshold": self.evaluator.gate_threshold,
                }),
                json!({
                    "score": draft_eval.score,
                    "passed": draft_eval.passed,
                    "issues_count": draft_eval.issues_count,
                    "issues_by_type": draft_eval.issues_by_type,
                    "quality_band": draft_eval.quality_band,
                }),
            )
            .reason_codes(draft_eval.issue_types()),
        );

        info!(
            episode_id = %episode_id,
            score = draft_eval.score,
            passed = draft_eval.passed,
            issues = draft_eval.issues_count,
            "Draft evaluated"
        );

        // Gate
        let (after, mutations, final_text, final_eval, regen_profile) = if draft_eval.passed {
            (before, vec![], draft.text.clone(), draft_eval.clone(), None)
        } else {
            // Learn
            let timer = StepTimer::start();
            let (after, mutations) = learn(&before, &draft_eval.issues);
            trace.finish_step(
                Stage::Learn,
                timer,
                StepDetail::new(
                    json!({"issues_count": draft_eval.issues_count, "primitives_before": before}),
                    json!({
                        "mutations_count": mutations.len(),
                        "mutations": mutations,
                        "primitives_after": after,
                    }),
                )
                .decision(Decision::Regenerate)
                .reason_codes(mutations.iter().map(|m| m.primitive_name)),
            );
            for m in &mutations {
                info!(
                    primitive = %m.primitive_name,
                    old = m.old_weight,
                    new = m.new_weight,
                    reason = %m.reason,
                    "Primitive mutated"
                );
            }

            // Regenerate, once
            let timer = StepTimer::start();
            let regen = self
                .generator
                .generate(&topic, &after, GenerationMode::Optimized)
                .await;
            trace.finish_step(
                Stage::Regenerate,
                timer,
                StepDetail::new(
                    json!({"topic_hash": topic_hash, "topic_chars": topic.len(), "mode": "optimized"}),
                    json!({
                        "final_chars": regen.text.len(),
                        "final_hash": short_hash(&regen.text, 12),
                        "used_fallback": regen.profile.used_fallback,
                    }),
                ),
            );

            let final_eval = evaluate(&regen.text, &after, &self.evaluator);
            (after, mutations, regen.text, final_eval, Some(regen.profile))
        };

        // Final check
        let timer = StepTimer::start();
        let remaining = final_eval.issue_types();
        let resolved: Vec<IssueType> = draft_eval
            .issue_types()
            .into_iter()
            .filter(|t| !final_eval.has_issue(*t))
            .collect();
        trace.finish_step(
            Stage::Verify,
            timer,
            StepDetail::new(
                json!({
                    "text_hash": short_hash(&final_text, 12),
                    "text_chars": final_text.len(),
                    "gate_threshold": self.evaluator.gate_threshold,
                }),
                json!({
                    "score_before": draft_eval.score,
                    "score_after": final_eval.score,
                    "delta": round4(final_eval.score - draft_eval.score),
                    "passed": final_eval.passed,
                    "issues_before_count": draft_eval.issues_count,
                    "issues_after_count": final_eval.issues_count,
                    "issues_resolved_by_type": resolved,
                    "issues_remaining_by_type": remaining,
                }),
            )
            .decision(Decision::Finish)
            .reason_codes(remaining.iter()),
        );

        let latency_ms_total = trace.total_latency_ms();
        let model = regen_profile
            .as_ref()
            .unwrap_or(&draft.profile)
            .model_used
            .clone();

        info!(
            episode_id = %episode_id,
            draft_score = draft_eval.score,
            final_score = final_eval.score,
            passed = final_eval.passed,
            mutations = mutations.len(),
            latency_ms_total,
            "Episode complete"
        );

        Episode {
            summary: EpisodeSummary {
                model,
                quality_score: final_eval.score,
                gate_passed: final_eval.passed,
                draft_issues: draft_eval.issues.iter().map(|i| i.issue_type).collect(),
                final_issues: final_eval.issues.iter().map(|i| i.issue_type).collect(),
                issues_count: final_eval.issues_count,
                update_count: mutations.len(),
                retry_count: u32::from(regen_profile.is_some()),
                latency_ms_total,
            },
            identity: EpisodeIdentity {
                episode_num,
                episode_id,
                boot_id,
            },
            topic,
            gate_threshold: self.evaluator.gate_threshold,
            primitives_before_hash: weights_hash(&before),
            primitives_after_hash: weights_hash(&after),
            primitives_before: before,
            primitives_after: after,
            draft_text: draft.text,
            draft_eval,
            draft_profile: draft.profile,
            final_text,
            final_eval,
            regen_profile,
            mutations,
            steps: trace.into_steps(),
            created_at: Utc::now(),
        }
    }
}
