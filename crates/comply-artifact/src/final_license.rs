//! Effective license of an artifact
//!
//! Precedence, first match wins:
//! 1. configured license
//! 2. overridden license
//! 3. declared and observed combined (see [`final_licenses`])
//! 4. whichever of declared or observed exists
//! 5. empty

use crate::artifact::Artifact;
use crate::fact::FactKind;
use comply_license::{LicenseExpression, LicenseOperator};

fn license_of<'a>(artifact: &'a Artifact, kind: &FactKind) -> Option<&'a LicenseExpression> {
    artifact.ask_for(kind).and_then(|fact| fact.as_license())
}

/// License expression downstream consumers should report for `artifact`
///
/// When both declared and observed licenses exist, the observed one is used
/// verbatim if its rendering contains the declared rendering and contains no
/// `" OR "`; otherwise both are joined with AND.
#[must_use]
pub fn final_licenses(artifact: &Artifact) -> LicenseExpression {
    if let Some(configured) = license_of(artifact, &FactKind::ConfiguredLicense) {
        return configured.clone();
    }
    if let Some(overridden) = license_of(artifact, &FactKind::OverriddenLicense) {
        return overridden.clone();
    }

    let declared = license_of(artifact, &FactKind::DeclaredLicense);
    let observed = license_of(artifact, &FactKind::ObservedLicense);
    match (declared, observed) {
        (Some(declared), Some(observed)) => {
            let observed_rendering = observed.evaluate();
            if observed_rendering.contains(&declared.evaluate())
                && !observed_rendering.contains(" OR ")
            {
                observed.clone()
            } else {
                LicenseExpression::statement(
                    LicenseOperator::And,
                    declared.clone(),
                    observed.clone(),
                )
            }
        }
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => LicenseExpression::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;
    use comply_license::parse_spdx;
    use pretty_assertions::assert_eq;

    fn leaf(id: &str) -> LicenseExpression {
        LicenseExpression::leaf(id)
    }

    #[test]
    fn configured_wins_over_declared() {
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("Y")))
            .with_fact(Fact::ConfiguredLicense(leaf("X")));
        assert_eq!(final_licenses(&artifact), leaf("X"));
    }

    #[test]
    fn overridden_wins_over_declared_and_observed() {
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("A")))
            .with_fact(Fact::ObservedLicense(leaf("B")))
            .with_fact(Fact::OverriddenLicense(leaf("C")));
        assert_eq!(final_licenses(&artifact), leaf("C"));
    }

    #[test]
    fn equal_declared_and_observed_give_bare_leaf() {
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("MIT")))
            .with_fact(Fact::ObservedLicense(leaf("MIT")));
        assert_eq!(final_licenses(&artifact), leaf("MIT"));
    }

    #[test]
    fn or_in_observed_defeats_substring_shortcut() {
        let observed = parse_spdx("MIT OR Apache-2.0").unwrap();
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("MIT")))
            .with_fact(Fact::ObservedLicense(observed.clone()));
        assert_eq!(
            final_licenses(&artifact),
            LicenseExpression::statement(LicenseOperator::And, leaf("MIT"), observed)
        );
    }

    #[test]
    fn observed_superset_without_or_is_used_verbatim() {
        let observed = parse_spdx("MIT AND BSD-3-Clause").unwrap();
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("MIT")))
            .with_fact(Fact::ObservedLicense(observed.clone()));
        assert_eq!(final_licenses(&artifact), observed);
    }

    #[test]
    fn unrelated_declared_and_observed_are_joined() {
        let artifact = Artifact::new()
            .with_fact(Fact::DeclaredLicense(leaf("MIT")))
            .with_fact(Fact::ObservedLicense(leaf("GPL-2.0")));
        assert_eq!(final_licenses(&artifact).evaluate(), "( MIT AND GPL-2.0 )");
    }

    #[test]
    fn single_source_is_used() {
        let declared_only = Artifact::new().with_fact(Fact::DeclaredLicense(leaf("MIT")));
        assert_eq!(final_licenses(&declared_only), leaf("MIT"));
        let observed_only = Artifact::new().with_fact(Fact::ObservedLicense(leaf("EPL-2.0")));
        assert_eq!(final_licenses(&observed_only), leaf("EPL-2.0"));
    }

    #[test]
    fn no_license_is_empty() {
        assert_eq!(final_licenses(&Artifact::new()), LicenseExpression::Empty);
    }
}
