use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::primitives::Primitive;

/// Category of a detected quality problem.
///
/// Declaration order is the order the evaluator runs its checks, which keeps
/// `issues_by_type` output stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Hallucination,
    /// Emitted by upstream reviewers, never by the rule evaluator.
    Unverified,
    Hyperbole,
    MissingSource,
    TemporalVague,
    LowSpecificity,
    #[serde(other)]
    Unknown,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Hallucination => "hallucination",
            IssueType::Unverified => "unverified",
            IssueType::Hyperbole => "hyperbole",
            IssueType::MissingSource => "missing_source",
            IssueType::TemporalVague => "temporal_vague",
            IssueType::LowSpecificity => "low_specificity",
            IssueType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Issue {
    pub fn new(issue_type: IssueType, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            issue_type,
            message: message.into(),
            severity: Some(severity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Pass,
    Warn,
    Fail,
}

/// Outcome of scoring one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Normalized to `[0, 1]`, rounded to 4 decimals.
    pub score: f64,
    pub passed: bool,
    pub issues: Vec<Issue>,
    pub issues_count: usize,
    pub issues_by_type: BTreeMap<IssueType, u32>,
    pub quality_band: QualityBand,
}

impl EvaluationResult {
    pub fn has_issue(&self, issue_type: IssueType) -> bool {
        self.issues_by_type.contains_key(&issue_type)
    }

    pub fn issue_types(&self) -> Vec<IssueType> {
        self.issues_by_type.keys().copied().collect()
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        writeln!(f, "{status} (score: {:.0}/100)", self.score * 100.0)?;
        for issue in &self.issues {
            writeln!(f, "  [{}] {}", issue.issue_type, issue.message)?;
        }
        Ok(())
    }
}

/// One recorded change to one primitive weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub primitive_name: Primitive,
    pub old_weight: f64,
    pub new_weight: f64,
    pub delta: f64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_uses_type_key_on_the_wire() {
        let issue = Issue::new(IssueType::MissingSource, "m", Severity::Medium);
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["type"], "missing_source");
        assert_eq!(value["severity"], "medium");
    }

    #[test]
    fn unknown_issue_types_deserialize() {
        let issue: Issue = serde_json::from_str(r#"{"type": "tone_deaf", "message": "x"}"#).unwrap();
        assert_eq!(issue.issue_type, IssueType::Unknown);
        assert!(issue.severity.is_none());
    }

    #[test]
    fn message_is_optional() {
        let issue: Issue = serde_json::from_str(r#"{"type": "hyperbole"}"#).unwrap();
        assert_eq!(issue.issue_type, IssueType::Hyperbole);
        assert_eq!(issue.message, "");
    }

    #[test]
    fn issues_by_type_serializes_with_string_keys() {
        let mut by_type = BTreeMap::new();
        by_type.insert(IssueType::Hallucination, 2);
        let result = EvaluationResult {
            score: 0.61,
            passed: false,
            issues: vec![],
            issues_count: 0,
            issues_by_type: by_type,
            quality_band: QualityBand::Warn,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["issues_by_type"]["hallucination"], 2);
        assert_eq!(value["quality_band"], "warn");
    }
}
