//! Processor trait and the sequential workflow
//!
//! Processors run one after the other over the same artifact list. Each one
//! takes ownership of the list and hands back the list for the next stage.

use crate::checker::ConfigurationChecker;
use crate::error::WorkflowResult;
use crate::evaluation::{ComplianceChecker, PolicyEvaluation, Severity};
use crate::handlers::{AddConfiguredArtifacts, ApplyOverrides, RemoveConfiguredArtifacts};
use crate::security::{SecurityIssueSettings, SecurityIssueValidator};
use crate::sources::SourceValidator;
use comply_artifact::Artifact;
use comply_config::{Configuration, ConfigurationResolver, ConflictSink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One stage of the workflow
pub trait Processor: Send + Sync {
    /// Stage name for logging
    fn name(&self) -> &'static str;

    /// Transform the artifact list, recording messages to `reporter`
    fn process(&self, artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact>;
}

/// Settings of the standard workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WorkflowSettings {
    /// Security issue validator settings
    pub security: SecurityIssueSettings,
    /// Lowest severity that fails the run
    pub fail_on: Severity,
}

impl WorkflowSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With security issue settings
    #[inline]
    #[must_use]
    pub fn with_security(mut self, security: SecurityIssueSettings) -> Self {
        self.security = security;
        self
    }

    /// With failing severity
    #[inline]
    #[must_use]
    pub fn with_fail_on(mut self, fail_on: Severity) -> Self {
        self.fail_on = fail_on;
        self
    }
}

/// Artifacts and validator findings after a run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutcome {
    /// Final artifact list
    pub artifacts: Vec<Artifact>,
    /// Findings of every validator
    pub evaluation: PolicyEvaluation,
}

/// Sequential pipeline of processors followed by validators
#[derive(Default)]
pub struct Workflow {
    processors: Vec<Box<dyn Processor>>,
    checkers: Vec<Box<dyn ComplianceChecker>>,
    fail_on: Severity,
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let processors: Vec<&str> = self.processors.iter().map(|p| p.name()).collect();
        let checkers: Vec<&str> = self.checkers.iter().map(|c| c.name()).collect();
        f.debug_struct("Workflow")
            .field("processors", &processors)
            .field("checkers", &checkers)
            .field("fail_on", &self.fail_on)
            .finish()
    }
}

impl Workflow {
    /// Create empty workflow
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `configs` strictly and build the standard pipeline
    ///
    /// Stages: configuration checker, remove, add, override; then the
    /// security issue and source validators.
    ///
    /// # Errors
    /// Returns [`crate::WorkflowError::Configuration`] if the configurations conflict
    pub fn from_configurations(
        configs: &[Configuration],
        settings: WorkflowSettings,
        sink: &mut dyn ConflictSink,
    ) -> WorkflowResult<Self> {
        let config = Arc::new(ConfigurationResolver::new().merge_and_check(configs, sink)?);
        Ok(Self::standard(config, settings))
    }

    /// Standard pipeline for an already merged configuration
    #[must_use]
    pub fn standard(config: Arc<Configuration>, settings: WorkflowSettings) -> Self {
        Self::new()
            .with_processor(ConfigurationChecker::new(Arc::clone(&config)))
            .with_processor(RemoveConfiguredArtifacts::new(Arc::clone(&config)))
            .with_processor(AddConfiguredArtifacts::new(Arc::clone(&config)))
            .with_processor(ApplyOverrides::new(Arc::clone(&config)))
            .with_checker(SecurityIssueValidator::new(Arc::clone(&config), settings.security))
            .with_checker(SourceValidator::new(config))
            .with_fail_on(settings.fail_on)
    }

    /// Append a processor
    #[must_use]
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Append a validator
    #[must_use]
    pub fn with_checker(mut self, checker: impl ComplianceChecker + 'static) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Set failing severity
    #[inline]
    #[must_use]
    pub fn with_fail_on(mut self, fail_on: Severity) -> Self {
        self.fail_on = fail_on;
        self
    }

    /// Number of processors
    #[inline]
    #[must_use]
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Run processors, then validators
    pub fn run(&self, artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> WorkflowOutcome {
        let mut artifacts = artifacts;
        for processor in &self.processors {
            let before = artifacts.len();
            artifacts = processor.process(artifacts, reporter);
            tracing::info!(
                "processor {}: {} artifacts in, {} out",
                processor.name(),
                before,
                artifacts.len()
            );
        }

        let mut evaluation = PolicyEvaluation::new();
        for checker in &self.checkers {
            let findings = checker.evaluate(&artifacts);
            tracing::info!("validator {}: {} results", checker.name(), findings.results().len());
            evaluation.extend(findings);
        }

        WorkflowOutcome {
            artifacts,
            evaluation,
        }
    }

    /// Run, then fail if any finding reaches the failing severity
    ///
    /// # Errors
    /// Returns [`crate::WorkflowError::PolicyViolations`] on violations
    pub fn run_and_check(
        &self,
        artifacts: Vec<Artifact>,
        reporter: &mut dyn ConflictSink,
    ) -> WorkflowResult<WorkflowOutcome> {
        let outcome = self.run(artifacts, reporter);
        outcome.evaluation.check(self.fail_on)?;
        Ok(outcome)
    }
}
