//! Properties of the configuration processors

use comply_artifact::{Artifact, ArtifactSelector};
use comply_config::{Configuration, MessageCategory, ProcessingReport};
use comply_test_utils::file_artifact;
use comply_workflow::{AddConfiguredArtifacts, Processor, RemoveConfiguredArtifacts};
use proptest::prelude::*;
use std::sync::Arc;

fn filenames() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("(lib|test|app)-[a-c]\\.jar", 0..10)
}

proptest! {
    #[test]
    fn remove_drops_exactly_matching_artifacts(names in filenames()) {
        let config = Configuration::builder()
            .remove_artifact(ArtifactSelector::filename("test-*.jar"))
            .build();
        let artifacts: Vec<Artifact> = names.iter().map(|n| file_artifact(n)).collect();
        let expected = names.iter().filter(|n| !n.starts_with("test-")).count();

        let mut report = ProcessingReport::new();
        let out = RemoveConfiguredArtifacts::new(Arc::new(config)).process(artifacts, &mut report);

        prop_assert_eq!(out.len(), expected);
        prop_assert_eq!(report.count(MessageCategory::RemoveArtifact), names.len() - expected);
    }

    #[test]
    fn adding_twice_is_idempotent(names in filenames()) {
        let config = names
            .iter()
            .fold(Configuration::builder(), |b, n| b.add_artifact(file_artifact(n)))
            .build();
        let processor = AddConfiguredArtifacts::new(Arc::new(config));

        let mut report = ProcessingReport::new();
        let once = processor.process(Vec::new(), &mut report);
        let twice = processor.process(once.clone(), &mut report);

        prop_assert_eq!(once, twice);
    }
}
