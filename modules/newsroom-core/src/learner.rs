//! Primitive-weight learner.
//!
//! Maps each detected issue to exactly one primitive and nudges it upward,
//! saturating at 1.0. Pure: same inputs, same outputs.

use newsroom_common::{Issue, IssueType, Mutation, Primitive, PrimitiveWeights};

use crate::evaluator::round4;

/// Which primitive an issue type trains, and by how much.
pub fn adjustment_for(issue_type: IssueType) -> Option<(Primitive, f64)> {
    match issue_type {
        IssueType::Hallucination | IssueType::Unverified => Some((Primitive::FactVerification, 0.15)),
        IssueType::Hyperbole => Some((Primitive::AntiHyperbole, 0.10)),
        IssueType::MissingSource => Some((Primitive::SourceAttribution, 0.12)),
        IssueType::TemporalVague => Some((Primitive::TemporalAccuracy, 0.10)),
        IssueType::LowSpecificity | IssueType::Unknown => None,
    }
}

/// Apply one update per mapped issue, in encounter order.
///
/// Returns the updated weights and one [`Mutation`] per applied update. A
/// weight already at 1.0 still yields a mutation, with a zero delta. The
/// returned weights are always clamped, even when nothing was applied.
pub fn learn(weights: &PrimitiveWeights, issues: &[Issue]) -> (PrimitiveWeights, Vec<Mutation>) {
    let mut updated = weights.clamped();
    let mut mutations = Vec::new();

    for issue in issues {
        let Some((primitive, delta)) = adjustment_for(issue.issue_type) else {
            continue;
        };
        let old = updated.get(primitive);
        let new = (old + delta).min(1.0);
        updated.set(primitive, new);
        mutations.push(Mutation {
            primitive_name: primitive,
            old_weight: round4(old),
            new_weight: round4(new),
            delta: round4(new - old),
            reason: issue.message.clone(),
        });
    }

    (updated, mutations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_common::Severity;

    fn issue(issue_type: IssueType, message: &str) -> Issue {
        Issue {
            issue_type,
            message: message.to_string(),
            severity: None,
        }
    }

    #[test]
    fn empty_issue_list_is_identity() {
        let weights = PrimitiveWeights::default();
        let (after, mutations) = learn(&weights, &[]);
        assert_eq!(after, weights);
        assert!(mutations.is_empty());
    }

    #[test]
    fn out_of_range_weights_come_back_clamped_without_issues() {
        let weights = PrimitiveWeights {
            brevity: 5.0,
            anti_hyperbole: -2.0,
            ..Default::default()
        };
        let (after, mutations) = learn(&weights, &[]);
        assert!(mutations.is_empty());
        assert_eq!(after.brevity, 1.0);
        assert_eq!(after.anti_hyperbole, 0.0);

        let (unmapped, _) = learn(&weights, &[issue(IssueType::LowSpecificity, "short")]);
        assert_eq!(unmapped, after);
    }

    #[test]
    fn hyperbole_nudges_anti_hyperbole() {
        let (after, mutations) = learn(
            &PrimitiveWeights::default(),
            &[issue(IssueType::Hyperbole, "m")],
        );
        assert!((after.anti_hyperbole - 0.85).abs() < 1e-9);
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].primitive_name, Primitive::AntiHyperbole);
        assert_eq!(mutations[0].delta, 0.10);
        assert_eq!(mutations[0].old_weight, 0.75);
        assert_eq!(mutations[0].new_weight, 0.85);
        assert_eq!(mutations[0].reason, "m");
    }

    #[test]
    fn saturates_at_one_with_zero_delta() {
        let weights = PrimitiveWeights {
            fact_verification: 1.0,
            ..Default::default()
        };
        let (after, mutations) = learn(&weights, &[issue(IssueType::Hallucination, "gpt-7")]);
        assert_eq!(after.fact_verification, 1.0);
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].delta, 0.0);
    }

    #[test]
    fn repeated_issues_compound_in_order() {
        let issues = [
            issue(IssueType::Hallucination, "gpt-7"),
            issue(IssueType::Unverified, "claim"),
            issue(IssueType::Hallucination, "claude 6"),
        ];
        let (after, mutations) = learn(&PrimitiveWeights::default(), &issues);
        // 0.65 → 0.80 → 0.95 → 1.0
        assert_eq!(after.fact_verification, 1.0);
        let deltas: Vec<f64> = mutations.iter().map(|m| m.delta).collect();
        assert_eq!(deltas, vec![0.15, 0.15, 0.05]);
        assert_eq!(mutations[1].old_weight, 0.8);
    }

    #[test]
    fn unmapped_types_are_ignored() {
        let issues = [
            Issue::new(IssueType::LowSpecificity, "short", Severity::Low),
            issue(IssueType::Unknown, "tone"),
        ];
        let (after, mutations) = learn(&PrimitiveWeights::default(), &issues);
        assert_eq!(after, PrimitiveWeights::default());
        assert!(mutations.is_empty());
    }

    #[test]
    fn untouched_primitives_are_unchanged() {
        let weights = PrimitiveWeights::default();
        let (after, _) = learn(
            &weights,
            &[
                issue(IssueType::MissingSource, "src"),
                issue(IssueType::TemporalVague, "soon"),
            ],
        );
        assert!((after.source_attribution - 0.84).abs() < 1e-9);
        assert!((after.temporal_accuracy - 0.80).abs() < 1e-9);
        assert_eq!(after.fact_verification, weights.fact_verification);
        assert_eq!(after.anti_hyperbole, weights.anti_hyperbole);
        assert_eq!(after.entertainment_value, weights.entertainment_value);
        assert_eq!(after.brevity, weights.brevity);
    }

    #[test]
    fn out_of_range_input_is_clamped_before_learning() {
        let weights = PrimitiveWeights {
            anti_hyperbole: 1.4,
            ..Default::default()
        };
        let (after, mutations) = learn(&weights, &[issue(IssueType::Hyperbole, "m")]);
        assert_eq!(after.anti_hyperbole, 1.0);
        assert_eq!(mutations[0].old_weight, 1.0);
    }
}
