//! Step trace for an episode.
//!
//! The orchestrator records one step after each stage finishes. Nothing here
//! wraps or intercepts the pure evaluation functions.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Draft,
    Evaluate,
    Learn,
    Regenerate,
    Verify,
}

impl Stage {
    pub fn step_name(&self) -> &'static str {
        match self {
            Stage::Draft => "generation_raw",
            Stage::Evaluate => "evaluation",
            Stage::Learn => "learning",
            Stage::Regenerate => "regeneration_optimized",
            Stage::Verify => "final_check",
        }
    }

    pub fn span_kind(&self) -> SpanKind {
        match self {
            Stage::Draft | Stage::Regenerate => SpanKind::ModelCall,
            Stage::Evaluate | Stage::Verify => SpanKind::Judge,
            Stage::Learn => SpanKind::PolicyUpdate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    ModelCall,
    Judge,
    PolicyUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Continue,
    Regenerate,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_id: String,
    pub name: String,
    pub stage: Stage,
    pub span_kind: SpanKind,
    pub start_ts: i64,
    pub end_ts: i64,
    pub latency_ms: u64,
    pub decision: Decision,
    pub reason_codes: Vec<String>,
    pub inputs: serde_json::Value,
    pub outputs: serde_json::Value,
}

/// Wall-clock start plus a monotonic clock for latency.
pub struct StepTimer {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl StepTimer {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a finished stage reports.
pub struct StepDetail {
    pub decision: Decision,
    pub reason_codes: Vec<String>,
    pub inputs: serde_json::Value,
    pub outputs: serde_json::Value,
}

impl StepDetail {
    pub fn new(inputs: serde_json::Value, outputs: serde_json::Value) -> Self {
        Self {
            decision: Decision::Continue,
            reason_codes: vec![],
            inputs,
            outputs,
        }
    }

    pub fn decision(mut self, decision: Decision) -> Self {
        self.decision = decision;
        self
    }

    pub fn reason_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.reason_codes = codes.into_iter().map(|c| c.to_string()).collect();
        self
    }
}

#[derive(Debug, Default)]
pub struct TraceBuilder {
    steps: Vec<TraceStep>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish_step(&mut self, stage: Stage, timer: StepTimer, detail: StepDetail) {
        let latency_ms = timer.elapsed().as_millis() as u64;
        let start_ts = timer.started_at.timestamp_millis();
        self.steps.push(TraceStep {
            step_id: format!("step_{}", self.steps.len() + 1),
            name: stage.step_name().to_string(),
            stage,
            span_kind: stage.span_kind(),
            start_ts,
            end_ts: start_ts + latency_ms as i64,
            latency_ms,
            decision: detail.decision,
            reason_codes: detail.reason_codes,
            inputs: detail.inputs,
            outputs: detail.outputs,
        });
    }

    pub fn total_latency_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.latency_ms).sum()
    }

    pub fn into_steps(self) -> Vec<TraceStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn steps_are_numbered_in_order() {
        let mut trace = TraceBuilder::new();
        trace.finish_step(
            Stage::Draft,
            StepTimer::start(),
            StepDetail::new(json!({"mode": "raw"}), json!({})),
        );
        trace.finish_step(
            Stage::Verify,
            StepTimer::start(),
            StepDetail::new(json!({}), json!({}))
                .decision(Decision::Finish)
                .reason_codes(["hyperbole"]),
        );
        let steps = trace.into_steps();
        assert_eq!(steps[0].step_id, "step_1");
        assert_eq!(steps[0].name, "generation_raw");
        assert_eq!(steps[0].span_kind, SpanKind::ModelCall);
        assert_eq!(steps[0].decision, Decision::Continue);
        assert_eq!(steps[1].step_id, "step_2");
        assert_eq!(steps[1].decision, Decision::Finish);
        assert_eq!(steps[1].reason_codes, vec!["hyperbole".to_string()]);
        assert!(steps[1].end_ts >= steps[1].start_ts);
    }

    #[test]
    fn step_serializes_snake_case() {
        let mut trace = TraceBuilder::new();
        trace.finish_step(
            Stage::Learn,
            StepTimer::start(),
            StepDetail::new(json!({}), json!({})).decision(Decision::Regenerate),
        );
        let value = serde_json::to_value(&trace.into_steps()[0]).unwrap();
        assert_eq!(value["span_kind"], "policy_update");
        assert_eq!(value["decision"], "regenerate");
        assert_eq!(value["name"], "learning");
    }
}
