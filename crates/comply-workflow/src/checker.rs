//! Detection of configuration entries that match nothing

use crate::processor::Processor;
use comply_artifact::{Artifact, ArtifactSelector};
use comply_config::{Configuration, ConflictSink, MessageCategory, MessageSubject};
use std::sync::Arc;

/// Reports selectors that match no artifact; the list passes through unchanged
#[derive(Debug, Clone)]
pub struct ConfigurationChecker {
    config: Arc<Configuration>,
}

impl ConfigurationChecker {
    /// Create checker for `config`
    #[inline]
    #[must_use]
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    fn check<'a>(
        artifacts: &[Artifact],
        selectors: impl IntoIterator<Item = &'a ArtifactSelector>,
        section: &str,
        reporter: &mut dyn ConflictSink,
    ) {
        for selector in selectors {
            if !artifacts.iter().any(|a| selector.matches(a)) {
                reporter.add(
                    MessageSubject::Selector(selector.clone()),
                    MessageCategory::UnnecessaryConfig,
                    format!(
                        "{selector}: This artifact is not needed in the \"{section}\" section of the configuration file as it does not exist in the artifacts list"
                    ),
                );
            }
        }
    }
}

impl Processor for ConfigurationChecker {
    fn name(&self) -> &'static str {
        "ConfigurationChecker"
    }

    fn process(&self, artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact> {
        tracing::info!("checking for unnecessary configuration entries");
        let config = &self.config;
        Self::check(&artifacts, config.remove_artifact(), "remove Artifact", reporter);
        Self::check(&artifacts, config.overrides().keys(), "override section", reporter);
        Self::check(
            &artifacts,
            config.valid_for_incomplete_sources(),
            "source validation (incomplete sources)",
            reporter,
        );
        Self::check(
            &artifacts,
            config.valid_for_missing_sources(),
            "source validation (missing sources)",
            reporter,
        );
        Self::check(&artifacts, config.final_licenses().keys(), "set final license", reporter);
        Self::check(
            &artifacts,
            config.ignore_for_source_resolving(),
            "source Resolving",
            reporter,
        );
        Self::check(&artifacts, config.security_issues().keys(), "add security issues", reporter);
        artifacts
    }
}
