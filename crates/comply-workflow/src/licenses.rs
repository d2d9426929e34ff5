//! License enrichment from a knowledge base

use crate::processor::Processor;
use comply_artifact::{Artifact, Fact, FactKind};
use comply_config::{ConflictSink, MessageCategory, MessageSubject};
use comply_license::{enrich, LicenseExpression, LicenseKnowledgeBase};
use std::collections::BTreeSet;
use std::sync::Arc;

const LICENSE_KINDS: [FactKind; 4] = [
    FactKind::DeclaredLicense,
    FactKind::ObservedLicense,
    FactKind::OverriddenLicense,
    FactKind::ConfiguredLicense,
];

fn license_fact(kind: &FactKind, expression: LicenseExpression) -> Option<Fact> {
    match kind {
        FactKind::DeclaredLicense => Some(Fact::DeclaredLicense(expression)),
        FactKind::ObservedLicense => Some(Fact::ObservedLicense(expression)),
        FactKind::OverriddenLicense => Some(Fact::OverriddenLicense(expression)),
        FactKind::ConfiguredLicense => Some(Fact::ConfiguredLicense(expression)),
        _ => None,
    }
}

/// Fills license names and texts from a knowledge base
pub struct EnrichLicenses {
    knowledge_base: Arc<dyn LicenseKnowledgeBase>,
}

impl std::fmt::Debug for EnrichLicenses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichLicenses").finish_non_exhaustive()
    }
}

impl EnrichLicenses {
    /// Create processor backed by `knowledge_base`
    #[inline]
    #[must_use]
    pub fn new(knowledge_base: Arc<dyn LicenseKnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    fn enrich_artifact(&self, artifact: &mut Artifact, reporter: &mut dyn ConflictSink) {
        let mut missing = BTreeSet::new();
        for kind in &LICENSE_KINDS {
            let Some(expression) = artifact.ask_for(kind).and_then(Fact::as_license).cloned() else {
                continue;
            };
            let enriched = enrich(expression, self.knowledge_base.as_ref());
            missing.extend(
                enriched
                    .licenses()
                    .into_iter()
                    .filter(|l| l.text().is_none())
                    .map(|l| l.id().to_string()),
            );
            if let Some(fact) = license_fact(kind, enriched) {
                artifact.add_fact(fact);
            }
        }

        for id in missing {
            reporter.add(
                MessageSubject::artifact(artifact),
                MessageCategory::MissingLicenseText,
                format!("No license text found for license id [{id}]."),
            );
        }
    }
}

impl Processor for EnrichLicenses {
    fn name(&self) -> &'static str {
        "EnrichLicenses"
    }

    fn process(&self, mut artifacts: Vec<Artifact>, reporter: &mut dyn ConflictSink) -> Vec<Artifact> {
        for artifact in &mut artifacts {
            self.enrich_artifact(artifact, reporter);
        }
        artifacts
    }
}
