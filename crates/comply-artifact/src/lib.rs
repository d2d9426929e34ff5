//! Comply Artifact Model
//!
//! Artifacts as open maps of typed facts, selectors that match them, and the
//! license precedence used when reporting them.
//!
//! # Core Concepts
//!
//! - [`Fact`]: Immutable typed property (coordinates, filename, license, ...)
//! - [`Artifact`]: Map from [`FactKind`] to facts, plus flags
//! - [`ArtifactSelector`]: Wildcard predicate over identifying facts, usable as a map key
//! - [`most_dominant_fact`]: Preference-ordered lookup over a [`Capability`]
//! - [`final_licenses`]: Configured > overridden > declared/observed precedence
//!
//! # Example
//!
//! ```rust,ignore
//! use comply_artifact::{Artifact, ArtifactSelector, Fact, FilenameEntry, final_licenses};
//! use comply_license::LicenseExpression;
//!
//! let artifact = Artifact::new()
//!     .with_fact(FilenameEntry::new("commons-io-2.6.jar"))
//!     .with_fact(Fact::DeclaredLicense(LicenseExpression::leaf("Apache-2.0")));
//!
//! assert!(ArtifactSelector::filename("commons-io-*.jar").matches(&artifact));
//! assert_eq!(final_licenses(&artifact).evaluate(), "Apache-2.0");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod artifact;
mod coordinate;
mod digest;
mod dominance;
mod error;
mod fact;
mod final_license;
mod selector;
mod wildcard;

// Re-exports
pub use artifact::{Artifact, ArtifactIdentity, UNKNOWN_ANALYSIS_SOURCE};
pub use coordinate::{
    BundleCoordinates, Coordinate, CoordinateType, DotNetCoordinates, GenericCoordinates,
    JavaScriptCoordinates, MavenCoordinates,
};
pub use digest::{DigestAlgorithm, FileDigest};
pub use dominance::{
    most_dominant_coordinates, most_dominant_fact, most_dominant_fact_or_else, FALLBACK_VERSION,
};
pub use error::{ArtifactError, ArtifactResult};
pub use fact::{
    Capability, ChangeStatus, Fact, FactKind, FilenameEntry, IssueStatus, MatchState,
    SecurityIssue, VcsInfo,
};
pub use final_license::final_licenses;
pub use selector::{ArtifactIdentifier, ArtifactSelector};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use comply_license::{build_license_expression, LicenseExpression};

    #[test]
    fn override_then_final_license() {
        let mut artifact = Artifact::new()
            .with_fact(Coordinate::from(MavenCoordinates::new("g", "a", "1")))
            .with_fact(Fact::DeclaredLicense(LicenseExpression::leaf("GPL-2.0")));
        let source = Artifact::new().with_fact(Fact::OverriddenLicense(build_license_expression([
            "MIT",
            "BSD-3-Clause",
        ])));

        artifact.override_with(&source);

        assert_eq!(
            final_licenses(&artifact).evaluate(),
            "( MIT AND BSD-3-Clause )"
        );
    }

    #[test]
    fn selector_from_purl_matches_artifact() {
        let coordinate: Coordinate = "pkg:maven/g/a@1".parse().unwrap();
        let artifact = Artifact::new().with_fact(coordinate.clone());
        assert!(ArtifactSelector::coordinate(coordinate).matches(&artifact));
    }
}
