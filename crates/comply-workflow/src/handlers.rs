//! Processors applying a configuration to the artifact list

use crate::processor::Processor;
use comply_artifact::{Artifact, ArtifactSelector, Fact};
use comply_config::{Configuration, ConflictSink, MessageCategory, MessageSubject};
use std::sync::Arc;

fn matches_any<'a>(
    mut selectors: impl Iterator<Item = &'a ArtifactSelector>,
    artifact: &Artifact,
) -> bool {
    selectors.any(|s| s.matches(artifact))
}

/// Drops removed and proprietary artifacts
#[derive(Debug, Clone)]
pub struct RemoveConfiguredArtifacts {
    config: Arc<Configuration>,
}

impl RemoveConfiguredArtifacts {
    /// Create processor for `config`
    #[inline]
    #[must_use]
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    /// Proprietary flag after applying the last matching override
    fn effective_proprietary(&self, artifact: &Artifact) -> bool {
        self.config
            .overrides()
            .iter()
            .filter(|(selector, _)| selector.matches(artifact))
            .map(|(_, over)| over.is_proprietary())
            .last()
            .unwrap_or_else(|| artifact.is_proprietary())
    }
}

impl Processor for RemoveConfiguredArtifacts {
    fn name(&self) -> &'static str {
        "RemoveConfiguredArtifacts"
    }

    fn process(&self, artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact> {
        artifacts
            .into_iter()
            .filter(|artifact| {
                if matches_any(self.config.remove_artifact().iter(), artifact) {
                    reporter.add(
                        MessageSubject::artifact(artifact),
                        MessageCategory::RemoveArtifact,
                        "Artifact is removed from artifacts list for processing.".to_string(),
                    );
                    return false;
                }
                if artifact.is_proprietary() && self.effective_proprietary(artifact) {
                    reporter.add(
                        MessageSubject::artifact(artifact),
                        MessageCategory::ArtifactIsProprietary,
                        "Artifact is removed from the artifacts list for processing, since it was classified as proprietary."
                            .to_string(),
                    );
                    return false;
                }
                true
            })
            .collect()
    }
}

/// Appends configured artifacts that are not yet in the list
#[derive(Debug, Clone)]
pub struct AddConfiguredArtifacts {
    config: Arc<Configuration>,
}

impl AddConfiguredArtifacts {
    /// Create processor for `config`
    #[inline]
    #[must_use]
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }
}

impl Processor for AddConfiguredArtifacts {
    fn name(&self) -> &'static str {
        "AddConfiguredArtifacts"
    }

    fn process(&self, mut artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact> {
        for added in self.config.add_artifact() {
            let identity = added.identity();
            let subject = MessageSubject::Artifact(identity.clone());
            if artifacts.iter().any(|a| a.identity() == identity) {
                reporter.add(
                    subject,
                    MessageCategory::DuplicateArtifact,
                    "Artifact is already in the artifacts list and was not added again.".to_string(),
                );
                continue;
            }
            let mut artifact = added.clone();
            artifact.set_modified_by_configuration(true);
            reporter.add(
                subject,
                MessageCategory::AddArtifact,
                "Artifact was added to artifacts list.".to_string(),
            );
            artifacts.push(artifact);
        }
        artifacts
    }
}

/// Applies ignore-for-download flags, overrides and final licenses
#[derive(Debug, Clone)]
pub struct ApplyOverrides {
    config: Arc<Configuration>,
}

impl ApplyOverrides {
    /// Create processor for `config`
    #[inline]
    #[must_use]
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    fn apply(&self, artifact: &mut Artifact, reporter: &mut dyn ConflictSink) {
        if matches_any(self.config.ignore_for_source_resolving().iter(), artifact) {
            artifact.set_ignore_for_download(true);
            reporter.add(
                MessageSubject::artifact(artifact),
                MessageCategory::IgnoreForArtifactResolving,
                "The Artifact will not be downloaded.".to_string(),
            );
        }

        for (selector, over) in self.config.overrides() {
            if selector.matches(artifact) {
                artifact.override_with(over);
                artifact.set_modified_by_configuration(true);
                reporter.add(
                    MessageSubject::artifact(artifact),
                    MessageCategory::OverrideArtifactAttributes,
                    "The artifact attributes were overwritten manually.".to_string(),
                );
            }
        }

        for (selector, license) in self.config.final_licenses() {
            if selector.matches(artifact) {
                tracing::debug!("final license {} set for {}", license, artifact);
                artifact.add_fact(Fact::ConfiguredLicense(license.clone()));
                artifact.set_modified_by_configuration(true);
            }
        }
    }
}

impl Processor for ApplyOverrides {
    fn name(&self) -> &'static str {
        "ApplyOverrides"
    }

    fn process(&self, mut artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact> {
        for artifact in &mut artifacts {
            self.apply(artifact, reporter);
        }
        artifacts
    }
}
