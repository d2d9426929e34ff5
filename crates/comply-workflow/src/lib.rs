//! Comply Workflow
//!
//! Applies a merged configuration to an artifact list and validates the
//! result.
//!
//! # Core Concepts
//!
//! - [`Processor`]: One stage transforming the artifact list
//! - [`Workflow`]: Processors run sequentially, then [`ComplianceChecker`]s
//! - [`SecurityIssueValidator`] / [`SourceValidator`]: Built-in validators
//! - [`PolicyEvaluation`]: Findings with a [`Severity`], checked against a failing level
//!
//! # Example
//!
//! ```rust,ignore
//! use comply_config::{Configuration, ProcessingReport};
//! use comply_workflow::{Workflow, WorkflowSettings};
//!
//! let configs = vec![Configuration::load("compliance.yaml")?];
//! let mut report = ProcessingReport::new();
//!
//! let workflow = Workflow::from_configurations(&configs, WorkflowSettings::new(), &mut report)?;
//! let outcome = workflow.run_and_check(artifacts, &mut report)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod checker;
mod error;
mod evaluation;
mod handlers;
mod licenses;
mod processor;
mod security;
mod sources;

// Re-exports
pub use checker::ConfigurationChecker;
pub use error::{WorkflowError, WorkflowResult};
pub use evaluation::{ComplianceChecker, EvaluationResult, PolicyEvaluation, Severity};
pub use handlers::{AddConfiguredArtifacts, ApplyOverrides, RemoveConfiguredArtifacts};
pub use licenses::EnrichLicenses;
pub use processor::{Processor, Workflow, WorkflowOutcome, WorkflowSettings};
pub use security::{SecurityIssueSettings, SecurityIssueValidator};
pub use sources::SourceValidator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use comply_artifact::{Artifact, ArtifactSelector, FilenameEntry};
    use comply_config::{Configuration, ConfigurationError, ProcessingReport};

    #[test]
    fn conflicting_configurations_abort_workflow() {
        let c1 = Configuration::builder().fail_on_missing_sources(true).build();
        let c2 = Configuration::builder().fail_on_missing_sources(false).build();
        let mut report = ProcessingReport::new();

        let err = Workflow::from_configurations(&[c1, c2], WorkflowSettings::new(), &mut report).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Configuration(ConfigurationError::ConflictsPresent { count: 1 })
        ));
    }

    #[test]
    fn standard_workflow_removes_and_adds() {
        let config = Configuration::builder()
            .remove_artifact(ArtifactSelector::filename("test-*.jar"))
            .add_artifact(Artifact::new().with_fact(FilenameEntry::new("vendored.js")))
            .build();
        let mut report = ProcessingReport::new();
        let workflow = Workflow::from_configurations(&[config], WorkflowSettings::new(), &mut report).unwrap();

        let outcome = workflow
            .run_and_check(
                vec![
                    Artifact::new().with_fact(FilenameEntry::new("test-utils.jar")),
                    Artifact::new().with_fact(FilenameEntry::new("app.jar")),
                ],
                &mut report,
            )
            .unwrap();

        let names: Vec<_> = outcome
            .artifacts
            .iter()
            .filter_map(Artifact::best_filename_guess)
            .collect();
        assert_eq!(names, vec!["app.jar", "vendored.js"]);
    }
}
