//! Rule-based quality evaluator.
//!
//! Case-insensitive substring checks over the generated text. Starts from 100
//! and subtracts a weighted penalty per fired check; the primitive weights
//! scale how hard each category is punished.

use std::collections::BTreeMap;

use newsroom_common::{
    EvaluationResult, Issue, IssueType, Primitive, PrimitiveWeights, QualityBand, Severity,
};

pub const BANNED_PRODUCTS: &[&str] = &[
    "gpt-5", "gpt-6", "gpt-7", "gpt-8", "gpt-9", "gpt-10", "llama 4", "llama 5", "llama 6",
    "claude 5", "claude 6",
];

pub const HYPERBOLE_WORDS: &[&str] = &[
    "revolutionary",
    "earth-shattering",
    "unprecedented",
    "game-changing",
    "breakthrough",
    "incredible",
    "amazing",
    "absolutely",
    "unbelievable",
];

pub const ATTRIBUTION_PHRASES: &[&str] = &["according to", "reported by", "sources say"];

pub const MONTH_NAMES: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

pub const VAGUE_TEMPORAL_PHRASES: &[&str] = &["recently", "lately", "soon", "the other day"];

/// Template placeholders left in by a model that ignored the prompt.
pub const PLACEHOLDER_MARKERS: [&str; 2] = ["bullet 1", "bullet 2"];

pub const HALLUCINATION_PENALTY: f64 = 30.0;
pub const HYPERBOLE_PENALTY: f64 = 20.0;
pub const MISSING_SOURCE_PENALTY: f64 = 15.0;
pub const TEMPORAL_VAGUE_PENALTY: f64 = 10.0;
pub const LOW_SPECIFICITY_PENALTY: f64 = 8.0;

/// Distinct superlatives needed before hyperbole fires.
pub const HYPERBOLE_MIN_MATCHES: usize = 3;
/// Unsourced text longer than this many words is flagged.
pub const MISSING_SOURCE_MIN_WORDS: usize = 20;
/// Text shorter than this many words is flagged as unspecific.
pub const LOW_SPECIFICITY_MAX_WORDS: usize = 25;
/// Raw scores at or above this land in the warn band when the gate fails.
pub const WARN_BAND_FLOOR: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorConfig {
    /// Normalized score needed to pass the gate.
    pub gate_threshold: f64,
    /// Enables the `low_specificity` check.
    pub check_specificity: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            gate_threshold: newsroom_common::config::DEFAULT_GATE_THRESHOLD,
            check_specificity: true,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_config(config: &newsroom_common::Config) -> Self {
        Self {
            gate_threshold: config.gate_threshold,
            check_specificity: config.check_specificity,
        }
    }

    pub fn with_gate_threshold(mut self, threshold: f64) -> Self {
        self.gate_threshold = threshold;
        self
    }

    pub fn without_specificity_check(mut self) -> Self {
        self.check_specificity = false;
        self
    }
}

/// Score `text` against the rule set. Pure and deterministic.
pub fn evaluate(text: &str, weights: &PrimitiveWeights, config: &EvaluatorConfig) -> EvaluationResult {
    let lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();
    let mut score = 100.0;
    let mut issues = Vec::new();
    let mut by_type: BTreeMap<IssueType, u32> = BTreeMap::new();

    let fact = weights.get(Primitive::FactVerification);

    for phrase in BANNED_PRODUCTS.iter().filter(|p| lower.contains(*p)) {
        issues.push(Issue::new(
            IssueType::Hallucination,
            format!("Detected unreleased product: {phrase}"),
            Severity::High,
        ));
        *by_type.entry(IssueType::Hallucination).or_insert(0) += 1;
        score -= HALLUCINATION_PENALTY * fact;
    }

    let hyperbole_count = HYPERBOLE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    if hyperbole_count >= HYPERBOLE_MIN_MATCHES {
        issues.push(Issue::new(
            IssueType::Hyperbole,
            format!("Excessive superlatives ({hyperbole_count} instances)"),
            Severity::Medium,
        ));
        by_type.insert(IssueType::Hyperbole, 1);
        score -= HYPERBOLE_PENALTY * weights.get(Primitive::AntiHyperbole);
    }

    let has_source = ATTRIBUTION_PHRASES
        .iter()
        .chain(MONTH_NAMES)
        .any(|s| lower.contains(s));
    if !has_source && word_count > MISSING_SOURCE_MIN_WORDS {
        issues.push(Issue::new(
            IssueType::MissingSource,
            "Claims lack specific attribution or dates",
            Severity::Medium,
        ));
        by_type.insert(IssueType::MissingSource, 1);
        score -= MISSING_SOURCE_PENALTY * weights.get(Primitive::SourceAttribution);
    }

    if VAGUE_TEMPORAL_PHRASES.iter().any(|v| lower.contains(v)) {
        issues.push(Issue::new(
            IssueType::TemporalVague,
            "Vague temporal references detected",
            Severity::Low,
        ));
        by_type.insert(IssueType::TemporalVague, 1);
        score -= TEMPORAL_VAGUE_PENALTY * weights.get(Primitive::TemporalAccuracy);
    }

    if config.check_specificity {
        let placeholders = PLACEHOLDER_MARKERS.iter().all(|m| lower.contains(m));
        if word_count < LOW_SPECIFICITY_MAX_WORDS || placeholders {
            issues.push(Issue::new(
                IssueType::LowSpecificity,
                "Content lacks specific detail",
                Severity::Low,
            ));
            by_type.insert(IssueType::LowSpecificity, 1);
            score -= LOW_SPECIFICITY_PENALTY * fact;
        }
    }

    let score: f64 = score.clamp(0.0, 100.0);
    let passed = score / 100.0 >= config.gate_threshold;
    let quality_band = if passed {
        QualityBand::Pass
    } else if score >= WARN_BAND_FLOOR {
        QualityBand::Warn
    } else {
        QualityBand::Fail
    };

    EvaluationResult {
        score: round4(score / 100.0),
        passed,
        issues_count: issues.len(),
        issues,
        issues_by_type: by_type,
        quality_band,
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
