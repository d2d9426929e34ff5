//! Property tests for selector keys and fact storage

use comply_artifact::{
    Artifact, ArtifactIdentifier, ArtifactSelector, Coordinate, Fact, FactKind, FilenameEntry,
    MavenCoordinates,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn filename() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}\\.(jar|zip|tgz)"
}

fn identifier() -> impl Strategy<Value = ArtifactIdentifier> {
    prop_oneof![
        filename().prop_map(|f| ArtifactIdentifier::Filename(FilenameEntry::new(f))),
        ("[a-z]{1,5}", "[a-z]{1,5}", "[0-9]\\.[0-9]").prop_map(|(g, a, v)| {
            ArtifactIdentifier::Coordinate(Coordinate::from(MavenCoordinates::new(g, a, v)))
        }),
    ]
}

proptest! {
    #[test]
    fn selector_equality_ignores_order(mut ids in prop::collection::vec(identifier(), 1..6)) {
        let a = ArtifactSelector::new(ids.clone());
        ids.reverse();
        let b = ArtifactSelector::new(ids);

        let mut keys = HashSet::new();
        keys.insert(a.clone());
        prop_assert!(!keys.insert(b.clone()));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn selector_for_artifact_always_matches(ids in prop::collection::vec(identifier(), 1..6)) {
        let mut artifact = Artifact::new();
        for id in ids {
            match id {
                ArtifactIdentifier::Filename(entry) => artifact.add_fact(entry),
                ArtifactIdentifier::Coordinate(c) => artifact.add_fact(c),
            };
        }
        prop_assert!(ArtifactSelector::for_artifact(&artifact).matches(&artifact));
    }

    #[test]
    fn last_single_valued_fact_wins(values in prop::collection::vec("[a-z ]{1,10}", 1..6)) {
        let mut artifact = Artifact::new();
        for v in &values {
            artifact.add_fact(Fact::Copyright(v.clone()));
        }
        let last = values.last().cloned().unwrap_or_default();
        let expected = if last.trim().is_empty() { None } else { Some(Fact::Copyright(last)) };
        prop_assert_eq!(artifact.ask_for(&FactKind::Copyright).cloned(), expected);
    }
}
