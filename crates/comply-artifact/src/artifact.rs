//! Artifact: an open map from fact kind to facts, plus flags
//!
//! Single-valued kinds hold at most one fact and adding another replaces it.
//! Accumulating kinds ([`FactKind::Filename`]) keep every distinct fact.
//! Empty facts are stored but never returned from queries.

use crate::coordinate::Coordinate;
use crate::fact::{Capability, Fact, FactKind, FilenameEntry};
use crate::selector::ArtifactIdentifier;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Analysis source used when none is given
pub const UNKNOWN_ANALYSIS_SOURCE: &str = "UNKNOWN";

/// One tracked third-party component
///
/// Equality is structural: same facts per kind, same flags, same source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArtifactRepr", into = "ArtifactRepr")]
pub struct Artifact {
    facts: IndexMap<FactKind, Vec<Fact>>,
    proprietary: bool,
    ignore_for_download: bool,
    modified_by_configuration: bool,
    analysis_source: String,
}

impl Default for Artifact {
    fn default() -> Self {
        Self::new()
    }
}

impl Artifact {
    /// Create empty artifact with unknown analysis source
    #[must_use]
    pub fn new() -> Self {
        Self::with_analysis_source(UNKNOWN_ANALYSIS_SOURCE)
    }

    /// Create empty artifact tagged with the analyzer that produced it
    #[must_use]
    pub fn with_analysis_source(source: impl Into<String>) -> Self {
        Self {
            facts: IndexMap::new(),
            proprietary: false,
            ignore_for_download: false,
            modified_by_configuration: false,
            analysis_source: source.into(),
        }
    }

    /// Builder form of [`Artifact::add_fact`]
    #[must_use]
    pub fn with_fact(mut self, fact: impl Into<Fact>) -> Self {
        self.add_fact(fact);
        self
    }

    /// Builder form of [`Artifact::set_proprietary`]
    #[inline]
    #[must_use]
    pub fn with_proprietary(mut self, proprietary: bool) -> Self {
        self.proprietary = proprietary;
        self
    }

    /// Add a fact
    ///
    /// Replaces the current fact of a single-valued kind; appends to an
    /// accumulating kind unless an identical fact is already present.
    pub fn add_fact(&mut self, fact: impl Into<Fact>) -> &mut Self {
        let fact = fact.into();
        let kind = fact.kind();
        if kind.accumulates() {
            let slot = self.facts.entry(kind).or_default();
            if !slot.contains(&fact) {
                slot.push(fact);
            }
        } else {
            self.facts.insert(kind, vec![fact]);
        }
        self
    }

    /// Remove every fact of `kind`
    pub fn remove_facts(&mut self, kind: &FactKind) -> Vec<Fact> {
        self.facts.shift_remove(kind).unwrap_or_default()
    }

    /// Current non-empty fact of exactly `kind`
    ///
    /// For accumulating kinds this is the first fact added.
    #[must_use]
    pub fn ask_for(&self, kind: &FactKind) -> Option<&Fact> {
        self.ask_for_list(kind).into_iter().next()
    }

    /// All non-empty facts of exactly `kind`, in insertion order
    #[must_use]
    pub fn ask_for_list(&self, kind: &FactKind) -> Vec<&Fact> {
        self.facts
            .get(kind)
            .map(|facts| facts.iter().filter(|f| !f.is_empty()).collect())
            .unwrap_or_default()
    }

    /// All non-empty facts whose kind provides `capability`, in insertion order
    #[must_use]
    pub fn ask_for_all(&self, capability: Capability) -> Vec<&Fact> {
        self.facts
            .iter()
            .filter(|(kind, _)| kind.has_capability(capability))
            .flat_map(|(_, facts)| facts.iter())
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// True if a non-empty fact of `kind` is present
    #[inline]
    #[must_use]
    pub fn has(&self, kind: &FactKind) -> bool {
        self.ask_for(kind).is_some()
    }

    /// Every stored fact, including empty ones, in insertion order
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values().flatten()
    }

    /// Replace each kind present on `source` with the source's facts
    ///
    /// Whole kinds are replaced; there is no per-field merging. Kinds whose
    /// facts are all empty on `source` are left untouched. Flags set on
    /// `source` are copied.
    pub fn override_with(&mut self, source: &Self) {
        for (kind, facts) in &source.facts {
            let facts: Vec<Fact> = facts.iter().filter(|f| !f.is_empty()).cloned().collect();
            if !facts.is_empty() {
                self.facts.insert(kind.clone(), facts);
            }
        }
        if source.proprietary {
            self.proprietary = true;
        }
        if source.ignore_for_download {
            self.ignore_for_download = true;
        }
    }

    /// Whether the artifact is proprietary
    #[inline]
    #[must_use]
    pub fn is_proprietary(&self) -> bool {
        self.proprietary
    }

    /// Set proprietary flag
    #[inline]
    pub fn set_proprietary(&mut self, proprietary: bool) {
        self.proprietary = proprietary;
    }

    /// Whether source download should be skipped
    #[inline]
    #[must_use]
    pub fn is_ignore_for_download(&self) -> bool {
        self.ignore_for_download
    }

    /// Set ignore-for-download flag
    #[inline]
    pub fn set_ignore_for_download(&mut self, ignore: bool) {
        self.ignore_for_download = ignore;
    }

    /// Whether configuration changed this artifact
    #[inline]
    #[must_use]
    pub fn is_modified_by_configuration(&self) -> bool {
        self.modified_by_configuration
    }

    /// Set modified-by-configuration flag
    #[inline]
    pub fn set_modified_by_configuration(&mut self, modified: bool) {
        self.modified_by_configuration = modified;
    }

    /// Analyzer that produced this artifact
    #[inline]
    #[must_use]
    pub fn analysis_source(&self) -> &str {
        &self.analysis_source
    }

    /// All coordinates, in insertion order
    #[must_use]
    pub fn coordinates(&self) -> Vec<&Coordinate> {
        self.ask_for_all(Capability::Coordinates)
            .into_iter()
            .filter_map(Fact::as_coordinate)
            .collect()
    }

    /// All filename entries, in insertion order
    #[must_use]
    pub fn filenames(&self) -> Vec<&FilenameEntry> {
        self.ask_for_list(&FactKind::Filename)
            .into_iter()
            .filter_map(Fact::as_filename)
            .collect()
    }

    /// Longest known filename
    #[must_use]
    pub fn best_filename_guess(&self) -> Option<&str> {
        self.filenames()
            .into_iter()
            .filter_map(FilenameEntry::filename)
            .max_by_key(|name| name.len())
    }

    /// Identifying values: coordinates and filename entries
    #[must_use]
    pub fn identifiers(&self) -> Vec<ArtifactIdentifier> {
        self.ask_for_all(Capability::Identifier)
            .into_iter()
            .filter_map(|fact| match fact {
                Fact::Coordinates(c) => Some(ArtifactIdentifier::Coordinate(c.clone())),
                Fact::Filename(entry) => Some(ArtifactIdentifier::Filename(entry.clone())),
                _ => None,
            })
            .collect()
    }

    /// Hashable identity formed from the identifying values
    #[must_use]
    pub fn identity(&self) -> ArtifactIdentity {
        ArtifactIdentity(self.identifiers().into_iter().collect())
    }

    /// True if any identifier of one artifact matches one of the other, either way
    #[must_use]
    pub fn is_potential_duplicate_of(&self, other: &Self) -> bool {
        let theirs = other.identifiers();
        self.identifiers()
            .iter()
            .any(|mine| theirs.iter().any(|t| mine.matches(t) || t.matches(mine)))
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let identifiers = self.identifiers();
        if identifiers.is_empty() {
            return write!(f, "Artifact(<unidentified>, {})", self.analysis_source);
        }
        let rendered: Vec<String> = identifiers.iter().map(ToString::to_string).collect();
        write!(f, "Artifact({})", rendered.join(", "))
    }
}

/// Deduplication key of an artifact
///
/// Two artifacts with equal identities describe the same component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactIdentity(BTreeSet<ArtifactIdentifier>);

impl ArtifactIdentity {
    /// True for artifacts without identifying facts
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifying values, sorted
    pub fn identifiers(&self) -> impl Iterator<Item = &ArtifactIdentifier> {
        self.0.iter()
    }
}

impl Display for ArtifactIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ArtifactRepr {
    #[serde(default)]
    facts: Vec<Fact>,
    #[serde(default)]
    proprietary: bool,
    #[serde(default)]
    ignore_for_download: bool,
    #[serde(default)]
    modified_by_configuration: bool,
    #[serde(default = "default_analysis_source")]
    analysis_source: String,
}

fn default_analysis_source() -> String {
    UNKNOWN_ANALYSIS_SOURCE.to_string()
}

impl From<ArtifactRepr> for Artifact {
    fn from(repr: ArtifactRepr) -> Self {
        let mut artifact = Self::with_analysis_source(repr.analysis_source);
        for fact in repr.facts {
            artifact.add_fact(fact);
        }
        artifact.proprietary = repr.proprietary;
        artifact.ignore_for_download = repr.ignore_for_download;
        artifact.modified_by_configuration = repr.modified_by_configuration;
        artifact
    }
}

impl From<Artifact> for ArtifactRepr {
    fn from(artifact: Artifact) -> Self {
        Self {
            facts: artifact.facts.into_values().flatten().collect(),
            proprietary: artifact.proprietary,
            ignore_for_download: artifact.ignore_for_download,
            modified_by_configuration: artifact.modified_by_configuration,
            analysis_source: artifact.analysis_source,
        }
    }
}
