//! Configuration: one policy document in memory
//!
//! A [`Configuration`] is immutable once built. Every selector excluded from
//! source resolving is also whitelisted for missing and incomplete sources;
//! [`ConfigurationBuilder`] establishes this when building.

use chrono::NaiveDate;
use comply_artifact::{Artifact, ArtifactSelector, SecurityIssue};
use comply_license::LicenseExpression;
use indexmap::{IndexMap, IndexSet};

/// Suppressions of one issue reference: selector to "suppressed until" date
pub type Suppressions = IndexMap<ArtifactSelector, NaiveDate>;

/// Merged or parsed compliance configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    pub(crate) ignore_for_source_resolving: IndexSet<ArtifactSelector>,
    pub(crate) overrides: IndexMap<ArtifactSelector, Artifact>,
    pub(crate) add_artifact: Vec<Artifact>,
    pub(crate) remove_artifact: IndexSet<ArtifactSelector>,
    pub(crate) valid_for_missing_sources: IndexSet<ArtifactSelector>,
    pub(crate) valid_for_incomplete_sources: IndexSet<ArtifactSelector>,
    pub(crate) final_licenses: IndexMap<ArtifactSelector, LicenseExpression>,
    pub(crate) security_issues: IndexMap<ArtifactSelector, Vec<SecurityIssue>>,
    pub(crate) suppressed_security_issues: IndexMap<String, Suppressions>,
    pub(crate) fail_on_incomplete_sources: bool,
    pub(crate) fail_on_missing_sources: bool,
}

impl Configuration {
    /// Start building a configuration
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Selectors excluded from source resolving
    #[inline]
    #[must_use]
    pub fn ignore_for_source_resolving(&self) -> &IndexSet<ArtifactSelector> {
        &self.ignore_for_source_resolving
    }

    /// Override artifacts by selector
    #[inline]
    #[must_use]
    pub fn overrides(&self) -> &IndexMap<ArtifactSelector, Artifact> {
        &self.overrides
    }

    /// Artifacts to add
    #[inline]
    #[must_use]
    pub fn add_artifact(&self) -> &[Artifact] {
        &self.add_artifact
    }

    /// Selectors of artifacts to remove
    #[inline]
    #[must_use]
    pub fn remove_artifact(&self) -> &IndexSet<ArtifactSelector> {
        &self.remove_artifact
    }

    /// Selectors exempt from missing-source failures
    #[inline]
    #[must_use]
    pub fn valid_for_missing_sources(&self) -> &IndexSet<ArtifactSelector> {
        &self.valid_for_missing_sources
    }

    /// Selectors exempt from incomplete-source failures
    #[inline]
    #[must_use]
    pub fn valid_for_incomplete_sources(&self) -> &IndexSet<ArtifactSelector> {
        &self.valid_for_incomplete_sources
    }

    /// Final license expressions by selector
    #[inline]
    #[must_use]
    pub fn final_licenses(&self) -> &IndexMap<ArtifactSelector, LicenseExpression> {
        &self.final_licenses
    }

    /// Configured security issues by selector
    #[inline]
    #[must_use]
    pub fn security_issues(&self) -> &IndexMap<ArtifactSelector, Vec<SecurityIssue>> {
        &self.security_issues
    }

    /// Suppressed issues: reference to selector to "suppressed until" date
    #[inline]
    #[must_use]
    pub fn suppressed_security_issues(&self) -> &IndexMap<String, Suppressions> {
        &self.suppressed_security_issues
    }

    /// Whether incomplete sources fail the build
    #[inline]
    #[must_use]
    pub fn fail_on_incomplete_sources(&self) -> bool {
        self.fail_on_incomplete_sources
    }

    /// Whether missing sources fail the build
    #[inline]
    #[must_use]
    pub fn fail_on_missing_sources(&self) -> bool {
        self.fail_on_missing_sources
    }

    /// True if nothing is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Keep the earlier of two suppression dates
pub(crate) fn insert_suppression(
    suppressions: &mut IndexMap<String, Suppressions>,
    reference: String,
    selector: ArtifactSelector,
    until: NaiveDate,
) {
    let per_reference = suppressions.entry(reference).or_default();
    per_reference
        .entry(selector)
        .and_modify(|date| {
            if until < *date {
                *date = until;
            }
        })
        .or_insert(until);
}

/// Builder for [`Configuration`]
///
/// Duplicate keys within one builder follow the document rules: overrides,
/// final licenses and security issues keep the last value, suppressions keep
/// the earlier date.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    /// Create empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude artifacts from source resolving
    ///
    /// The selector is also whitelisted for missing and incomplete sources.
    #[must_use]
    pub fn ignore_for_source_resolving(mut self, selector: ArtifactSelector) -> Self {
        self.config.ignore_for_source_resolving.insert(selector);
        self
    }

    /// Override matching artifacts with `artifact`
    #[must_use]
    pub fn override_artifact(mut self, selector: ArtifactSelector, artifact: Artifact) -> Self {
        self.config.overrides.insert(selector, artifact);
        self
    }

    /// Add an artifact; structurally equal artifacts are added once
    #[must_use]
    pub fn add_artifact(mut self, artifact: Artifact) -> Self {
        if !self.config.add_artifact.contains(&artifact) {
            self.config.add_artifact.push(artifact);
        }
        self
    }

    /// Remove matching artifacts
    #[must_use]
    pub fn remove_artifact(mut self, selector: ArtifactSelector) -> Self {
        self.config.remove_artifact.insert(selector);
        self
    }

    /// Whitelist matching artifacts for missing sources
    #[must_use]
    pub fn valid_for_missing_sources(mut self, selector: ArtifactSelector) -> Self {
        self.config.valid_for_missing_sources.insert(selector);
        self
    }

    /// Whitelist matching artifacts for incomplete sources
    #[must_use]
    pub fn valid_for_incomplete_sources(mut self, selector: ArtifactSelector) -> Self {
        self.config.valid_for_incomplete_sources.insert(selector);
        self
    }

    /// Fix the final license of matching artifacts
    #[must_use]
    pub fn final_license(mut self, selector: ArtifactSelector, license: LicenseExpression) -> Self {
        self.config.final_licenses.insert(selector, license);
        self
    }

    /// Attach security issues to matching artifacts
    #[must_use]
    pub fn security_issues(mut self, selector: ArtifactSelector, issues: Vec<SecurityIssue>) -> Self {
        self.config.security_issues.insert(selector, issues);
        self
    }

    /// Suppress issue `reference` for matching artifacts until `until`
    #[must_use]
    pub fn suppress_security_issue(
        mut self,
        reference: impl Into<String>,
        selector: ArtifactSelector,
        until: NaiveDate,
    ) -> Self {
        insert_suppression(
            &mut self.config.suppressed_security_issues,
            reference.into(),
            selector,
            until,
        );
        self
    }

    /// Fail on incomplete sources
    #[inline]
    #[must_use]
    pub fn fail_on_incomplete_sources(mut self, fail: bool) -> Self {
        self.config.fail_on_incomplete_sources = fail;
        self
    }

    /// Fail on missing sources
    #[inline]
    #[must_use]
    pub fn fail_on_missing_sources(mut self, fail: bool) -> Self {
        self.config.fail_on_missing_sources = fail;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> Configuration {
        let mut config = self.config;
        for selector in &config.ignore_for_source_resolving {
            config.valid_for_missing_sources.insert(selector.clone());
            config.valid_for_incomplete_sources.insert(selector.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_artifact::{Fact, FilenameEntry, IssueStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_configuration_is_empty() {
        let config = Configuration::default();
        assert!(config.is_empty());
        assert!(!config.fail_on_missing_sources());
    }

    #[test]
    fn ignored_selectors_are_valid_for_sources() {
        let selector = ArtifactSelector::filename("a.jar");
        let config = Configuration::builder()
            .ignore_for_source_resolving(selector.clone())
            .build();

        assert!(config.ignore_for_source_resolving().contains(&selector));
        assert!(config.valid_for_missing_sources().contains(&selector));
        assert!(config.valid_for_incomplete_sources().contains(&selector));
    }

    #[test]
    fn suppressions_keep_earlier_date() {
        let selector = ArtifactSelector::filename("a.jar");
        let config = Configuration::builder()
            .suppress_security_issue("CVE-1", selector.clone(), date(2030, 1, 1))
            .suppress_security_issue("CVE-1", selector.clone(), date(2025, 6, 1))
            .suppress_security_issue("CVE-1", selector.clone(), date(2031, 1, 1))
            .build();

        assert_eq!(
            config.suppressed_security_issues()["CVE-1"][&selector],
            date(2025, 6, 1)
        );
    }

    #[test]
    fn security_issues_last_wins_within_builder() {
        let selector = ArtifactSelector::filename("a.jar");
        let config = Configuration::builder()
            .security_issues(
                selector.clone(),
                vec![SecurityIssue::new("CVE-1", IssueStatus::Open, 5.0)],
            )
            .security_issues(
                selector.clone(),
                vec![SecurityIssue::new("CVE-2", IssueStatus::Open, 7.0)],
            )
            .build();
        assert_eq!(config.security_issues()[&selector][0].reference, "CVE-2");
    }

    #[test]
    fn add_artifact_is_deduplicated() {
        let artifact = comply_artifact::Artifact::new().with_fact(FilenameEntry::new("a.jar"));
        let other = comply_artifact::Artifact::new().with_fact(Fact::Copyright("c".into()));
        let config = Configuration::builder()
            .add_artifact(artifact.clone())
            .add_artifact(other)
            .add_artifact(artifact)
            .build();
        assert_eq!(config.add_artifact().len(), 2);
    }
}
