//! Testing utilities for the comply workspace
//!
//! Shared artifact fixtures and tracing setup.

#![allow(missing_docs)]

use comply_artifact::{
    Artifact, ArtifactSelector, Coordinate, Fact, FactKind, FilenameEntry, IssueStatus,
    JavaScriptCoordinates, MavenCoordinates, SecurityIssue,
};
use comply_license::LicenseExpression;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const TEST_ANALYSIS_SOURCE: &str = "test-analyzer";

/// Install a fmt subscriber honouring `RUST_LOG`; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
    tracing::trace!("test tracing initialised");
}

pub fn maven_coordinate(group: &str, artifact: &str, version: &str) -> Coordinate {
    MavenCoordinates::new(group, artifact, version).into()
}

/// Maven artifact with coordinates and the matching `<artifact>-<version>.jar` filename
pub fn maven_artifact(group: &str, artifact: &str, version: &str) -> Artifact {
    Artifact::with_analysis_source(TEST_ANALYSIS_SOURCE)
        .with_fact(maven_coordinate(group, artifact, version))
        .with_fact(FilenameEntry::new(format!("{artifact}-{version}.jar")))
}

pub fn npm_artifact(name: &str, version: &str) -> Artifact {
    Artifact::with_analysis_source(TEST_ANALYSIS_SOURCE)
        .with_fact(Coordinate::from(JavaScriptCoordinates::new(name, name, version)))
        .with_fact(FilenameEntry::new(format!("{name}-{version}.tgz")))
}

pub fn file_artifact(filename: &str) -> Artifact {
    Artifact::with_analysis_source(TEST_ANALYSIS_SOURCE).with_fact(FilenameEntry::new(filename))
}

pub fn with_declared_license(artifact: Artifact, license: &str) -> Artifact {
    artifact.with_fact(Fact::DeclaredLicense(LicenseExpression::leaf(license)))
}

pub fn with_sources(artifact: Artifact) -> Artifact {
    let name = artifact.best_filename_guess().unwrap_or("artifact").to_string();
    artifact.with_fact(Fact::SourceFile(PathBuf::from(format!("sources/{name}-sources.zip"))))
}

pub fn with_issue(
    artifact: Artifact,
    reference: &str,
    status: IssueStatus,
    severity: f64,
) -> Artifact {
    let mut issues: Vec<SecurityIssue> = artifact
        .ask_for(&FactKind::Issues)
        .and_then(Fact::as_issues)
        .map(<[SecurityIssue]>::to_vec)
        .unwrap_or_default();
    issues.push(SecurityIssue::new(reference, status, severity));
    artifact.with_fact(Fact::Issues(issues))
}

pub fn filename_selector(pattern: &str) -> ArtifactSelector {
    ArtifactSelector::filename(pattern)
}

pub fn maven_selector(group: &str, artifact: &str, version: &str) -> ArtifactSelector {
    ArtifactSelector::coordinate(maven_coordinate(group, artifact, version))
}
