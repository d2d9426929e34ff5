//! Dominant fact lookup
//!
//! When several facts of one capability exist (e.g. Maven and npm
//! coordinates for the same artifact), the dominant one is chosen by an
//! explicit preference order of kinds.

use crate::artifact::Artifact;
use crate::coordinate::{Coordinate, CoordinateType, GenericCoordinates};
use crate::fact::{Capability, Fact, FactKind};
use std::borrow::Cow;

/// Version used for coordinates derived from a filename
pub const FALLBACK_VERSION: &str = "-";

/// First present fact among `preferred`, else any fact with `capability`
///
/// Returns `None` when the artifact has no fact with the capability.
#[must_use]
pub fn most_dominant_fact<'a>(
    preferred: &[FactKind],
    capability: Capability,
    artifact: &'a Artifact,
) -> Option<&'a Fact> {
    preferred
        .iter()
        .find_map(|kind| artifact.ask_for(kind))
        .or_else(|| artifact.ask_for_all(capability).into_iter().next())
}

/// Like [`most_dominant_fact`], invoking `fallback` when nothing matches
#[must_use]
pub fn most_dominant_fact_or_else<'a, F>(
    preferred: &[FactKind],
    capability: Capability,
    artifact: &'a Artifact,
    fallback: F,
) -> Option<Cow<'a, Fact>>
where
    F: FnOnce(&Artifact) -> Option<Fact>,
{
    match most_dominant_fact(preferred, capability, artifact) {
        Some(fact) => Some(Cow::Borrowed(fact)),
        None => fallback(artifact).map(Cow::Owned),
    }
}

/// Dominant coordinates, falling back to `GenericCoordinates(best filename, "-")`
///
/// Returns `None` only if the artifact has neither coordinates nor a filename.
#[must_use]
pub fn most_dominant_coordinates<'a>(
    preferred: &[CoordinateType],
    artifact: &'a Artifact,
) -> Option<Cow<'a, Coordinate>> {
    let kinds: Vec<FactKind> = preferred.iter().copied().map(FactKind::coordinates).collect();
    let fact = most_dominant_fact_or_else(&kinds, Capability::Coordinates, artifact, |a| {
        a.best_filename_guess().map(|name| {
            tracing::debug!("deriving generic coordinates from filename {}", name);
            Fact::Coordinates(GenericCoordinates::new(name, FALLBACK_VERSION).into())
        })
    })?;

    match fact {
        Cow::Borrowed(fact) => fact.as_coordinate().map(Cow::Borrowed),
        Cow::Owned(Fact::Coordinates(c)) => Some(Cow::Owned(c)),
        Cow::Owned(_) => None,
    }
}
