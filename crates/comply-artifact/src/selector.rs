//! Artifact selectors
//!
//! An [`ArtifactSelector`] is a set of identifying values with `*` wildcards.
//! It matches an artifact when every criterion matches at least one of the
//! artifact's identifiers. Selectors are used as map keys in configurations,
//! so equality and hashing are defined by the (sorted, deduplicated) criteria.

use crate::artifact::Artifact;
use crate::coordinate::Coordinate;
use crate::fact::FilenameEntry;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One identifying value of an artifact
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactIdentifier {
    /// Package coordinates
    Coordinate(Coordinate),
    /// Filename and digest
    Filename(FilenameEntry),
}

impl ArtifactIdentifier {
    /// Match `self` as a needle against `other`
    ///
    /// Identifiers of different kinds never match.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Coordinate(needle), Self::Coordinate(input)) => needle.matches(input),
            (Self::Filename(needle), Self::Filename(input)) => needle.matches(input),
            _ => false,
        }
    }
}

impl Display for ArtifactIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate(c) => write!(f, "{c}"),
            Self::Filename(entry) => write!(f, "{entry}"),
        }
    }
}

impl From<Coordinate> for ArtifactIdentifier {
    fn from(c: Coordinate) -> Self {
        Self::Coordinate(c)
    }
}

impl From<FilenameEntry> for ArtifactIdentifier {
    fn from(entry: FilenameEntry) -> Self {
        Self::Filename(entry)
    }
}

/// Predicate selecting artifacts by identifying values
///
/// A selector without criteria matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ArtifactIdentifier>", into = "Vec<ArtifactIdentifier>")]
pub struct ArtifactSelector {
    criteria: Vec<ArtifactIdentifier>,
}

impl ArtifactSelector {
    /// Create selector from criteria; order and duplicates are irrelevant
    #[must_use]
    pub fn new(criteria: impl IntoIterator<Item = ArtifactIdentifier>) -> Self {
        let mut criteria: Vec<ArtifactIdentifier> = criteria.into_iter().collect();
        criteria.sort();
        criteria.dedup();
        Self { criteria }
    }

    /// Selector matching a filename pattern
    #[must_use]
    pub fn filename(pattern: impl Into<String>) -> Self {
        Self::new([ArtifactIdentifier::Filename(FilenameEntry::new(pattern))])
    }

    /// Selector matching coordinates
    #[must_use]
    pub fn coordinate(coordinate: impl Into<Coordinate>) -> Self {
        Self::new([ArtifactIdentifier::Coordinate(coordinate.into())])
    }

    /// Selector matching every identifier of `artifact` exactly
    #[must_use]
    pub fn for_artifact(artifact: &Artifact) -> Self {
        Self::new(artifact.identifiers())
    }

    /// Add a criterion
    #[must_use]
    pub fn with(self, criterion: impl Into<ArtifactIdentifier>) -> Self {
        let mut criteria = self.criteria;
        criteria.push(criterion.into());
        Self::new(criteria)
    }

    /// Criteria, sorted
    #[inline]
    #[must_use]
    pub fn criteria(&self) -> &[ArtifactIdentifier] {
        &self.criteria
    }

    /// True if the selector has no criteria
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True if every criterion matches one of the artifact's identifiers
    #[must_use]
    pub fn matches(&self, artifact: &Artifact) -> bool {
        if self.criteria.is_empty() {
            return false;
        }
        let identifiers = artifact.identifiers();
        self.criteria
            .iter()
            .all(|criterion| identifiers.iter().any(|id| criterion.matches(id)))
    }
}

impl Display for ArtifactSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.criteria.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

impl From<Vec<ArtifactIdentifier>> for ArtifactSelector {
    fn from(criteria: Vec<ArtifactIdentifier>) -> Self {
        Self::new(criteria)
    }
}

impl From<ArtifactSelector> for Vec<ArtifactIdentifier> {
    fn from(selector: ArtifactSelector) -> Self {
        selector.criteria
    }
}
