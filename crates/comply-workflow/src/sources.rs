//! Source availability validation

use crate::evaluation::{ComplianceChecker, EvaluationResult, PolicyEvaluation, Severity};
use comply_artifact::{Artifact, FactKind};
use comply_config::Configuration;
use std::sync::Arc;

const NO_SOURCE_JAR: &str = "SourceValidator::noSourceJar";
const NO_JAR: &str = "SourceValidator::noJar";

/// Checks that Maven artifacts come with sources
///
/// Proprietary artifacts and artifacts without Maven coordinates are not
/// checked.
#[derive(Debug, Clone)]
pub struct SourceValidator {
    config: Arc<Configuration>,
}

impl SourceValidator {
    /// Create validator for `config`
    #[inline]
    #[must_use]
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    fn severity(fail: bool) -> Severity {
        if fail {
            Severity::Fail
        } else {
            Severity::Warn
        }
    }

    fn allowed_missing(&self, artifact: &Artifact) -> bool {
        self.config
            .valid_for_missing_sources()
            .iter()
            .any(|s| s.matches(artifact))
    }

    fn allowed_incomplete(&self, artifact: &Artifact) -> bool {
        self.allowed_missing(artifact)
            || self
                .config
                .valid_for_incomplete_sources()
                .iter()
                .any(|s| s.matches(artifact))
    }

    fn validate(&self, artifact: &Artifact) -> Option<EvaluationResult> {
        if !artifact.has(&FactKind::SourceFile) {
            return Some(if self.allowed_missing(artifact) {
                EvaluationResult::new(
                    NO_SOURCE_JAR,
                    "Artifact has no jar sources but is handled as valid.",
                    Severity::Info,
                    artifact,
                )
            } else {
                EvaluationResult::new(
                    NO_SOURCE_JAR,
                    "No sources-jar available.",
                    Self::severity(self.config.fail_on_missing_sources()),
                    artifact,
                )
            });
        }

        if !artifact.has(&FactKind::File) {
            return Some(if self.allowed_incomplete(artifact) {
                EvaluationResult::new(
                    NO_JAR,
                    "Artifact has no jar to verify sources but is handled as valid.",
                    Severity::Info,
                    artifact,
                )
            } else {
                EvaluationResult::new(
                    NO_JAR,
                    "The artifact has no jar. The sources thus can not be verified",
                    Self::severity(self.config.fail_on_incomplete_sources()),
                    artifact,
                )
            });
        }
        None
    }
}

impl ComplianceChecker for SourceValidator {
    fn name(&self) -> &'static str {
        "SourceValidator"
    }

    fn evaluate(&self, artifacts: &[Artifact]) -> PolicyEvaluation {
        artifacts
            .iter()
            .filter(|a| !a.is_proprietary())
            .filter(|a| a.has(&FactKind::MavenCoordinates))
            .filter_map(|a| self.validate(a))
            .collect()
    }
}
