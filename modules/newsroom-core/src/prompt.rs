//! Prompt templates for podcast segment generation.

use newsroom_common::{GenerationMode, Primitive, PrimitiveWeights};

/// A primitive at or above this weight injects its constraint in optimized mode.
pub const CONSTRAINT_THRESHOLD: f64 = 0.8;

/// Constraint sentence per primitive, in render order.
const CONSTRAINTS: [(Primitive, &str); 4] = [
    (
        Primitive::FactVerification,
        "CRITICAL: Only mention products/models that actually exist. \
         If uncertain, use \"rumored\" or \"unconfirmed reports suggest\".",
    ),
    (
        Primitive::AntiHyperbole,
        "IMPORTANT: Avoid superlatives like \"revolutionary\", \
         \"unprecedented\", \"earth-shattering\". Use measured language.",
    ),
    (
        Primitive::SourceAttribution,
        "REQUIRED: Include specific sources (e.g. \"According to Bloomberg \
         on Jan 15\") or dates when making claims.",
    ),
    (
        Primitive::TemporalAccuracy,
        "REQUIRED: Use specific dates instead of vague terms like \
         \"recently\" or \"soon\".",
    ),
];

/// Render the generation prompt for `topic`.
pub fn build_prompt(topic: &str, weights: &PrimitiveWeights, mode: GenerationMode) -> String {
    match mode {
        GenerationMode::Raw => format!(
            "Generate a 60-second podcast news segment about: {topic}\n\n\
             Write it in an energetic, conversational style suitable for audio. \
             Keep it under 150 words."
        ),
        GenerationMode::Optimized => {
            let block = constraint_block(weights);
            format!(
                "Generate a 60-second podcast news segment about: {topic}\n\n\
                 CONSTRAINTS:\n{block}\n\n\
                 Write in a professional, fact-based style. Keep it under 150 words."
            )
        }
    }
}

/// Constraints that qualify under `weights`, in fixed order.
pub fn active_constraints(weights: &PrimitiveWeights) -> Vec<(Primitive, &'static str)> {
    CONSTRAINTS
        .iter()
        .filter(|(primitive, _)| weights.get(*primitive) >= CONSTRAINT_THRESHOLD)
        .copied()
        .collect()
}

fn constraint_block(weights: &PrimitiveWeights) -> String {
    let active = active_constraints(weights);
    if active.is_empty() {
        return "  • (none)".to_string();
    }
    active
        .iter()
        .map(|(_, text)| format!("  • {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}
