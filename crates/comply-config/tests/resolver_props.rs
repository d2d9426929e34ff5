//! Properties of the configuration merge

use comply_artifact::{ArtifactSelector, FilenameEntry};
use comply_config::{Configuration, ConfigurationResolver, MessageCategory, ProcessingReport};
use comply_license::LicenseExpression;
use comply_test_utils::{
    filename_selector, init_tracing, maven_artifact, maven_coordinate, maven_selector,
};
use indexmap::IndexSet;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn selectors() -> impl Strategy<Value = Vec<ArtifactSelector>> {
    prop::collection::vec("[a-e]{1,2}\\.jar", 0..6)
        .prop_map(|names| names.iter().map(|n| filename_selector(n)).collect())
}

fn ignoring(selectors: &[ArtifactSelector]) -> Configuration {
    selectors
        .iter()
        .cloned()
        .fold(Configuration::builder(), |builder, s| builder.ignore_for_source_resolving(s))
        .build()
}

proptest! {
    #[test]
    fn union_size_matches_set_union(inputs in prop::collection::vec(selectors(), 0..5)) {
        let configs: Vec<Configuration> = inputs.iter().map(|s| ignoring(s)).collect();
        let expected: IndexSet<ArtifactSelector> = inputs.iter().flatten().cloned().collect();

        let mut report = ProcessingReport::new();
        let merged = ConfigurationResolver::new().merge(&configs, &mut report);

        prop_assert_eq!(merged.ignore_for_source_resolving().len(), expected.len());
        prop_assert!(report.is_empty());
    }

    #[test]
    fn ignore_propagation_survives_merge(inputs in prop::collection::vec(selectors(), 1..4)) {
        let configs: Vec<Configuration> = inputs.iter().map(|s| ignoring(s)).collect();
        let mut report = ProcessingReport::new();
        let merged = ConfigurationResolver::new().merge(&configs, &mut report);

        for selector in merged.ignore_for_source_resolving() {
            prop_assert!(merged.valid_for_missing_sources().contains(selector));
            prop_assert!(merged.valid_for_incomplete_sources().contains(selector));
        }
    }

    #[test]
    fn merge_is_idempotent(names in selectors()) {
        let config = names
            .iter()
            .cloned()
            .enumerate()
            .fold(Configuration::builder(), |builder, (i, s)| {
                let version = format!("1.{i}");
                builder
                    .ignore_for_source_resolving(s.clone())
                    .override_artifact(s.clone(), maven_artifact("org.example", "lib", &version))
                    .add_artifact(maven_artifact("org.example", "added", &version))
                    .final_license(s, LicenseExpression::leaf(format!("L-{i}")))
            })
            .build();

        let resolver = ConfigurationResolver::new();
        let mut once = ProcessingReport::new();
        let mut twice = ProcessingReport::new();
        let a = resolver.merge(std::slice::from_ref(&config), &mut once);
        let b = resolver.merge(&[config.clone(), config], &mut twice);

        prop_assert_eq!(a, b);
        prop_assert!(once.is_empty());
        prop_assert!(twice.is_empty());
    }
}

#[test]
fn override_short_circuit_is_asymmetric_with_final_licenses() {
    init_tracing();
    let s1 = maven_selector("org.example", "lib", "1.0");
    let s2 = filename_selector("other-*.jar");
    let lib = maven_artifact("org.example", "lib", "1.0");
    let patched = maven_artifact("org.example", "lib", "1.0-patched");

    let c1 = Configuration::builder()
        .override_artifact(s1.clone(), lib.clone())
        .final_license(s1.clone(), LicenseExpression::leaf("MIT"))
        .build();
    let c2 = Configuration::builder()
        .override_artifact(s1.clone(), patched)
        .final_license(s1.clone(), LicenseExpression::leaf("EPL-2.0"))
        .build();
    let c3 = Configuration::builder()
        .override_artifact(s2.clone(), lib)
        .final_license(s2.clone(), LicenseExpression::leaf("Apache-2.0"))
        .build();

    let mut report = ProcessingReport::new();
    let merged = ConfigurationResolver::new().merge(&[c1, c2, c3], &mut report);

    assert!(merged.overrides().is_empty());

    assert_eq!(merged.final_licenses().len(), 2);
    assert_eq!(merged.final_licenses()[&s2].evaluate(), "Apache-2.0");

    assert_eq!(report.count(MessageCategory::ConflictingConfigurations), 2);
}

#[test]
fn selector_keys_built_from_equal_facts_collide() {
    let a = ArtifactSelector::filename("a.jar").with(maven_coordinate("g", "a", "1"));
    let b = ArtifactSelector::coordinate(maven_coordinate("g", "a", "1"))
        .with(FilenameEntry::new("a.jar"));

    let c1 = Configuration::builder().remove_artifact(a).build();
    let c2 = Configuration::builder().remove_artifact(b).build();
    let mut report = ProcessingReport::new();
    let merged = ConfigurationResolver::new().merge(&[c1, c2], &mut report);

    assert_eq!(merged.remove_artifact().len(), 1);
}
