//! Policy evaluation results
//!
//! Validators implement [`ComplianceChecker`] and return a
//! [`PolicyEvaluation`]. The workflow decides which [`Severity`] fails the
//! run.

use crate::error::{WorkflowError, WorkflowResult};
use comply_artifact::{Artifact, ArtifactIdentity};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Severity of an evaluation result, ordered `Info < Warn < Fail`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational
    Info,
    /// Worth a look
    Warn,
    /// Violation
    #[default]
    Fail,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        })
    }
}

/// One finding of a validator about one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    /// `Validator::rule` identifier
    pub rule: String,
    /// Human readable description
    pub description: String,
    /// Severity
    pub severity: Severity,
    /// Artifact the finding is about
    #[serde(serialize_with = "serialize_identity")]
    pub artifact: ArtifactIdentity,
}

fn serialize_identity<S>(identity: &ArtifactIdentity, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(identity)
}

impl EvaluationResult {
    /// Create result for `artifact`
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        artifact: &Artifact,
    ) -> Self {
        Self {
            rule: rule.into(),
            description: description.into(),
            severity,
            artifact: artifact.identity(),
        }
    }
}

impl Display for EvaluationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.severity, self.rule, self.artifact, self.description
        )
    }
}

/// Collected results of one or more validators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyEvaluation {
    results: Vec<EvaluationResult>,
}

impl PolicyEvaluation {
    /// Create empty evaluation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result
    pub fn add(&mut self, result: EvaluationResult) {
        self.results.push(result);
    }

    /// Append every result of `other`
    pub fn extend(&mut self, other: Self) {
        self.results.extend(other.results);
    }

    /// All results in the order they were added
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    /// Results at or above `severity`
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &EvaluationResult> {
        self.results.iter().filter(move |r| r.severity >= severity)
    }

    /// True if no result was added
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Fail if any result is at or above `fail_on`
    ///
    /// # Errors
    /// Returns [`WorkflowError::PolicyViolations`] with the number of such results
    pub fn check(&self, fail_on: Severity) -> WorkflowResult<()> {
        let count = self.at_least(fail_on).count();
        if count > 0 {
            for result in self.at_least(fail_on) {
                tracing::warn!("policy violation: {}", result);
            }
            return Err(WorkflowError::PolicyViolations { count });
        }
        Ok(())
    }

    /// Render the evaluation as pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<EvaluationResult> for PolicyEvaluation {
    fn from_iter<I: IntoIterator<Item = EvaluationResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

/// A validator over the final artifact list
pub trait ComplianceChecker: Send + Sync {
    /// Short description of the rule set
    fn name(&self) -> &'static str;

    /// Evaluate every artifact
    fn evaluate(&self, artifacts: &[Artifact]) -> PolicyEvaluation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_artifact::FilenameEntry;

    fn result(severity: Severity) -> EvaluationResult {
        let artifact = Artifact::new().with_fact(FilenameEntry::new("a.jar"));
        EvaluationResult::new("Test::rule", "finding", severity, &artifact)
    }

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Fail);
        assert_eq!(Severity::default(), Severity::Fail);
    }

    #[test]
    fn check_counts_results_at_or_above() {
        let evaluation: PolicyEvaluation = [
            result(Severity::Info),
            result(Severity::Warn),
            result(Severity::Fail),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            evaluation.check(Severity::Warn),
            Err(WorkflowError::PolicyViolations { count: 2 })
        ));
        assert!(matches!(
            evaluation.check(Severity::Fail),
            Err(WorkflowError::PolicyViolations { count: 1 })
        ));
        assert!(PolicyEvaluation::new().check(Severity::Info).is_ok());
    }

    #[test]
    fn result_display_and_json() {
        let r = result(Severity::Warn);
        assert_eq!(r.to_string(), "WARN Test::rule [a.jar]: finding");

        let evaluation: PolicyEvaluation = std::iter::once(r).collect();
        let json = evaluation.to_json().unwrap();
        assert!(json.contains("\"WARN\""));
        assert!(json.contains("[a.jar]"));
    }
}
