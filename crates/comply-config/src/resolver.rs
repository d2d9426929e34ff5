//! Configuration resolver
//!
//! Merges several configurations into one. Every field has a fixed policy:
//!
//! | Field | Policy |
//! |---|---|
//! | selector sets | set union |
//! | `add_artifact` | union, structurally equal artifacts once |
//! | `overrides` | union; first unequal duplicate is reported and the merged overrides are dropped |
//! | `final_licenses` | union; unequal duplicates are reported, first value kept |
//! | `security_issues` | union; last value wins, unequal duplicates are reported |
//! | `suppressed_security_issues` | union; earlier date wins |
//! | `fail_on_*` | value of the first configuration; first disagreement is reported |
//!
//! Conflicts never fail the merge. They are written to the [`ConflictSink`]
//! and turned into an error only by [`check_report`].

use crate::configuration::{insert_suppression, Configuration, Suppressions};
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::report::{ConflictSink, MessageCategory, MessageSubject};
use comply_artifact::{Artifact, ArtifactSelector};
use indexmap::{IndexMap, IndexSet};

/// What to do when two configurations map a selector to different values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnConflict {
    /// Report, drop everything merged so far and stop merging the field
    DiscardAndStop,
    /// Report, keep the earlier value and continue
    KeepFirstAndContinue,
    /// Report, take the later value and continue
    ReplaceAndContinue,
}

/// Stateless merger of configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationResolver;

impl ConfigurationResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Merge configurations, recording conflicts to `sink`
    ///
    /// An empty input yields [`Configuration::default`].
    pub fn merge(&self, configs: &[Configuration], sink: &mut dyn ConflictSink) -> Configuration {
        let Some(first) = configs.first() else {
            tracing::debug!("no configurations to merge");
            return Configuration::default();
        };
        tracing::debug!("merging {} configurations", configs.len());

        let merged = Configuration {
            ignore_for_source_resolving: union_sets(
                "ignore for source resolving",
                configs.iter().map(|c| &c.ignore_for_source_resolving),
            ),
            remove_artifact: union_sets(
                "remove artifact",
                configs.iter().map(|c| &c.remove_artifact),
            ),
            valid_for_missing_sources: union_sets(
                "valid for missing sources",
                configs.iter().map(|c| &c.valid_for_missing_sources),
            ),
            valid_for_incomplete_sources: union_sets(
                "valid for incomplete sources",
                configs.iter().map(|c| &c.valid_for_incomplete_sources),
            ),
            add_artifact: merge_added_artifacts(configs),
            overrides: merge_keyed(
                configs.iter().map(|c| &c.overrides),
                OnConflict::DiscardAndStop,
                sink,
                |selector| {
                    format!(
                        "Conflicting configurations in the override section at artifact: the override values are not equal. (artifact selector was={selector})"
                    )
                },
            ),
            final_licenses: merge_keyed(
                configs.iter().map(|c| &c.final_licenses),
                OnConflict::KeepFirstAndContinue,
                sink,
                |selector| {
                    format!(
                        "Conflicting configurations in the \"set final license\" section, the declared licenses are not the same. (artifact selector was={selector})"
                    )
                },
            ),
            security_issues: merge_keyed(
                configs.iter().map(|c| &c.security_issues),
                OnConflict::ReplaceAndContinue,
                sink,
                |selector| {
                    format!(
                        "Conflicting configurations in the security issues section, the issues are not the same, the last configuration wins. (artifact selector was={selector})"
                    )
                },
            ),
            suppressed_security_issues: merge_suppressions(configs),
            fail_on_incomplete_sources: merge_flag(
                "failOnIncompleteSources",
                first.fail_on_incomplete_sources,
                configs.iter().map(|c| c.fail_on_incomplete_sources),
                sink,
            ),
            fail_on_missing_sources: merge_flag(
                "failOnMissingSources",
                first.fail_on_missing_sources,
                configs.iter().map(|c| c.fail_on_missing_sources),
                sink,
            ),
        };

        tracing::info!(
            "merged {} configurations: {} overrides, {} final licenses, {} conflicts recorded",
            configs.len(),
            merged.overrides.len(),
            merged.final_licenses.len(),
            sink.message_count()
        );
        merged
    }

    /// Merge, then fail if the sink holds any message
    ///
    /// # Errors
    /// Returns [`ConfigurationError::ConflictsPresent`] if the sink is not empty
    /// after merging
    pub fn merge_and_check(
        &self,
        configs: &[Configuration],
        sink: &mut dyn ConflictSink,
    ) -> ConfigurationResult<Configuration> {
        let merged = self.merge(configs, sink);
        check_report(sink)?;
        Ok(merged)
    }
}

/// Fail if the sink holds at least one message
///
/// # Errors
/// Returns [`ConfigurationError::ConflictsPresent`] with the message count
pub fn check_report(sink: &dyn ConflictSink) -> ConfigurationResult<()> {
    if sink.has_messages() {
        let count = sink.message_count();
        tracing::warn!("{} conflicting configurations present", count);
        return Err(ConfigurationError::ConflictsPresent { count });
    }
    Ok(())
}

fn union_sets<'a>(
    field: &str,
    sets: impl Iterator<Item = &'a IndexSet<ArtifactSelector>>,
) -> IndexSet<ArtifactSelector> {
    let merged: IndexSet<ArtifactSelector> = sets.flatten().cloned().collect();
    tracing::debug!("merged {}: {} selectors", field, merged.len());
    merged
}

fn merge_added_artifacts(configs: &[Configuration]) -> Vec<Artifact> {
    let mut merged = Vec::new();
    for artifact in configs.iter().flat_map(|c| &c.add_artifact) {
        if !merged.contains(artifact) {
            merged.push(artifact.clone());
        }
    }
    tracing::debug!("merged add artifact: {} artifacts", merged.len());
    merged
}

fn merge_keyed<'a, V>(
    maps: impl Iterator<Item = &'a IndexMap<ArtifactSelector, V>>,
    policy: OnConflict,
    sink: &mut dyn ConflictSink,
    message: impl Fn(&ArtifactSelector) -> String,
) -> IndexMap<ArtifactSelector, V>
where
    V: Clone + PartialEq + 'a,
{
    let mut merged: IndexMap<ArtifactSelector, V> = IndexMap::new();

    'maps: for map in maps {
        for (selector, value) in map {
            match merged.get_mut(selector) {
                None => {
                    merged.insert(selector.clone(), value.clone());
                }
                Some(existing) if *existing == *value => {}
                Some(existing) => {
                    let text = message(selector);
                    tracing::warn!("{}", text);
                    sink.add(
                        MessageSubject::Selector(selector.clone()),
                        MessageCategory::ConflictingConfigurations,
                        text,
                    );
                    match policy {
                        OnConflict::DiscardAndStop => {
                            merged.clear();
                            break 'maps;
                        }
                        OnConflict::KeepFirstAndContinue => {}
                        OnConflict::ReplaceAndContinue => *existing = value.clone(),
                    }
                }
            }
        }
    }

    tracing::debug!("merged keyed section ({:?}): {} entries", policy, merged.len());
    merged
}

fn merge_suppressions(configs: &[Configuration]) -> IndexMap<String, Suppressions> {
    let mut merged = IndexMap::new();
    for config in configs {
        for (reference, suppressions) in &config.suppressed_security_issues {
            for (selector, until) in suppressions {
                insert_suppression(&mut merged, reference.clone(), selector.clone(), *until);
            }
        }
    }
    tracing::debug!("merged suppressed security issues: {} references", merged.len());
    merged
}

fn merge_flag(
    name: &str,
    first: bool,
    values: impl Iterator<Item = bool>,
    sink: &mut dyn ConflictSink,
) -> bool {
    if values.skip(1).any(|v| v != first) {
        let text = format!("Conflicting configurations for the attribute \"{name}\".");
        tracing::warn!("{}", text);
        sink.add(
            MessageSubject::Global,
            MessageCategory::ConflictingConfigurations,
            text,
        );
    }
    first
}
