//! Facts attached to artifacts
//!
//! A [`Fact`] is an immutable value describing one property of an artifact.
//! Every fact has a [`FactKind`]; kinds are grouped by [`Capability`] so that,
//! for example, all four license kinds can be queried together.

use crate::coordinate::{Coordinate, CoordinateType};
use crate::digest::FileDigest;
use crate::wildcard::wildcard_matches;
use comply_license::LicenseExpression;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

fn sanitize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A filename with an optional digest of the file's content
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilenameEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digest: Option<FileDigest>,
}

impl FilenameEntry {
    /// Create entry from a filename; blank names are stored as absent
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: sanitize(Some(filename.into())),
            digest: None,
        }
    }

    /// Entry identified only by digest
    #[must_use]
    pub fn from_digest(digest: FileDigest) -> Self {
        Self {
            filename: None,
            digest: Some(digest),
        }
    }

    /// Attach a digest
    #[inline]
    #[must_use]
    pub fn with_digest(mut self, digest: FileDigest) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Filename, if known
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Digest, if known
    #[inline]
    #[must_use]
    pub fn digest(&self) -> Option<&FileDigest> {
        self.digest.as_ref()
    }

    /// True when neither filename nor digest is known
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filename.is_none() && self.digest.is_none()
    }

    /// Match `self` as a needle against `other`
    ///
    /// The filename may contain `*` wildcards; an absent needle field matches anything.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        let filename_matches = match &self.filename {
            None => true,
            Some(needle) => wildcard_matches(needle, other.filename().unwrap_or_default()),
        };
        let digest_matches = match &self.digest {
            None => true,
            Some(needle) => other.digest.as_ref() == Some(needle),
        };
        filename_matches && digest_matches
    }
}

impl Display for FilenameEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename().unwrap_or("<unnamed>"))?;
        if let Some(digest) = &self.digest {
            write!(f, " ({digest})")?;
        }
        Ok(())
    }
}

/// Status of a security issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    /// Reported, not yet assessed
    Open,
    /// Assessed and accepted as relevant
    Acknowledged,
    /// Does not affect this artifact
    NotApplicable,
    /// Confirmed to affect this artifact
    Confirmed,
}

impl IssueStatus {
    /// Upper-case name as used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Confirmed => "CONFIRMED",
        }
    }
}

impl Display for IssueStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = crate::error::ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "OPEN" => Ok(Self::Open),
            "ACKNOWLEDGED" => Ok(Self::Acknowledged),
            "NOT_APPLICABLE" => Ok(Self::NotApplicable),
            "CONFIRMED" => Ok(Self::Confirmed),
            other => Err(crate::error::ArtifactError::UnknownFormat(format!(
                "security issue status '{other}'"
            ))),
        }
    }
}

/// A known security issue of an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityIssue {
    /// Issue reference (e.g. a CVE id)
    pub reference: String,
    /// Assessment status
    pub status: IssueStatus,
    /// Severity score
    pub severity: f64,
    /// Link to the advisory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SecurityIssue {
    /// Create issue without advisory link
    #[must_use]
    pub fn new(reference: impl Into<String>, status: IssueStatus, severity: f64) -> Self {
        Self {
            reference: reference.into(),
            status,
            severity,
            url: None,
        }
    }

    /// Set advisory link
    #[inline]
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Version control location of an artifact's sources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VcsInfo {
    /// VCS type, e.g. `git`
    pub kind: String,
    /// Repository URL
    pub url: String,
    /// Revision or tag
    pub revision: String,
}

/// How well an analyzer identified an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    /// Identified exactly
    Exact,
    /// Identified by similarity
    Similar,
    /// Not identified
    Unknown,
}

/// Whether an artifact was modified from its upstream form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    /// Used as published
    AsIs,
    /// Modified before use
    Changed,
}

/// Capability shared by several fact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Package coordinates of any ecosystem
    Coordinates,
    /// Declared, observed, overridden or configured licenses
    LicenseInformation,
    /// Facts that identify an artifact: coordinates and filenames
    Identifier,
}

/// Kind of a fact
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactKind {
    /// Maven coordinates
    MavenCoordinates,
    /// npm coordinates
    JavaScriptCoordinates,
    /// OSGi bundle coordinates
    BundleCoordinates,
    /// NuGet coordinates
    DotNetCoordinates,
    /// Generic coordinates
    GenericCoordinates,
    /// Filename and digest (accumulating)
    Filename,
    /// License declared by the publisher
    DeclaredLicense,
    /// License observed by scanning
    ObservedLicense,
    /// License replaced by an override
    OverriddenLicense,
    /// License fixed by configuration
    ConfiguredLicense,
    /// Copyright statement
    Copyright,
    /// Security issues
    Issues,
    /// VCS location
    VcsInfo,
    /// Project homepage
    Homepage,
    /// Source download location
    SourceUrl,
    /// Local path of the artifact
    File,
    /// Local path of the artifact's sources
    SourceFile,
    /// Identification quality
    MatchState,
    /// Modification status
    ChangeStatus,
    /// Kind registered outside this crate
    Custom(String),
}

impl FactKind {
    /// Kind holding coordinates of `coordinate_type`
    #[must_use]
    pub const fn coordinates(coordinate_type: CoordinateType) -> Self {
        match coordinate_type {
            CoordinateType::Maven => Self::MavenCoordinates,
            CoordinateType::Npm => Self::JavaScriptCoordinates,
            CoordinateType::P2 => Self::BundleCoordinates,
            CoordinateType::Nuget => Self::DotNetCoordinates,
            CoordinateType::Generic => Self::GenericCoordinates,
        }
    }

    /// True for kinds where several facts coexist
    #[inline]
    #[must_use]
    pub fn accumulates(&self) -> bool {
        matches!(self, Self::Filename)
    }

    /// True if this kind provides `capability`
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Coordinates => matches!(
                self,
                Self::MavenCoordinates
                    | Self::JavaScriptCoordinates
                    | Self::BundleCoordinates
                    | Self::DotNetCoordinates
                    | Self::GenericCoordinates
            ),
            Capability::LicenseInformation => matches!(
                self,
                Self::DeclaredLicense
                    | Self::ObservedLicense
                    | Self::OverriddenLicense
                    | Self::ConfiguredLicense
            ),
            Capability::Identifier => {
                self.has_capability(Capability::Coordinates) || matches!(self, Self::Filename)
            }
        }
    }
}

/// A typed property of an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fact {
    /// Coordinates; the kind follows the coordinate type
    Coordinates(Coordinate),
    /// Filename entry
    Filename(FilenameEntry),
    /// License declared by the publisher
    DeclaredLicense(LicenseExpression),
    /// License observed by scanning
    ObservedLicense(LicenseExpression),
    /// License replaced by an override
    OverriddenLicense(LicenseExpression),
    /// License fixed by configuration
    ConfiguredLicense(LicenseExpression),
    /// Copyright statement
    Copyright(String),
    /// Security issues
    Issues(Vec<SecurityIssue>),
    /// VCS location
    VcsInfo(VcsInfo),
    /// Project homepage
    Homepage(String),
    /// Source download location
    SourceUrl(String),
    /// Local path of the artifact
    File(PathBuf),
    /// Local path of the artifact's sources
    SourceFile(PathBuf),
    /// Identification quality
    MatchState(MatchState),
    /// Modification status
    ChangeStatus(ChangeStatus),
    /// Fact of a kind registered outside this crate
    Custom {
        /// Kind name
        name: String,
        /// Payload
        value: serde_json::Value,
    },
}

impl Fact {
    /// Kind of this fact
    #[must_use]
    pub fn kind(&self) -> FactKind {
        match self {
            Self::Coordinates(c) => FactKind::coordinates(c.coordinate_type()),
            Self::Filename(_) => FactKind::Filename,
            Self::DeclaredLicense(_) => FactKind::DeclaredLicense,
            Self::ObservedLicense(_) => FactKind::ObservedLicense,
            Self::OverriddenLicense(_) => FactKind::OverriddenLicense,
            Self::ConfiguredLicense(_) => FactKind::ConfiguredLicense,
            Self::Copyright(_) => FactKind::Copyright,
            Self::Issues(_) => FactKind::Issues,
            Self::VcsInfo(_) => FactKind::VcsInfo,
            Self::Homepage(_) => FactKind::Homepage,
            Self::SourceUrl(_) => FactKind::SourceUrl,
            Self::File(_) => FactKind::File,
            Self::SourceFile(_) => FactKind::SourceFile,
            Self::MatchState(_) => FactKind::MatchState,
            Self::ChangeStatus(_) => FactKind::ChangeStatus,
            Self::Custom { name, .. } => FactKind::Custom(name.clone()),
        }
    }

    /// True when the fact carries no information
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Coordinates(c) => c.is_empty(),
            Self::Filename(entry) => entry.is_empty(),
            Self::DeclaredLicense(l)
            | Self::ObservedLicense(l)
            | Self::OverriddenLicense(l)
            | Self::ConfiguredLicense(l) => l.is_empty(),
            Self::Copyright(s) | Self::Homepage(s) | Self::SourceUrl(s) => s.trim().is_empty(),
            Self::Issues(issues) => issues.is_empty(),
            Self::VcsInfo(vcs) => vcs.url.trim().is_empty() && vcs.revision.trim().is_empty(),
            Self::File(path) | Self::SourceFile(path) => path.as_os_str().is_empty(),
            Self::MatchState(_) | Self::ChangeStatus(_) => false,
            Self::Custom { value, .. } => value.is_null(),
        }
    }

    /// License expression of license-information facts
    #[must_use]
    pub fn as_license(&self) -> Option<&LicenseExpression> {
        match self {
            Self::DeclaredLicense(l)
            | Self::ObservedLicense(l)
            | Self::OverriddenLicense(l)
            | Self::ConfiguredLicense(l) => Some(l),
            _ => None,
        }
    }

    /// Coordinate of coordinate facts
    #[must_use]
    pub fn as_coordinate(&self) -> Option<&Coordinate> {
        match self {
            Self::Coordinates(c) => Some(c),
            _ => None,
        }
    }

    /// Filename entry of filename facts
    #[must_use]
    pub fn as_filename(&self) -> Option<&FilenameEntry> {
        match self {
            Self::Filename(entry) => Some(entry),
            _ => None,
        }
    }

    /// Security issues of issue facts
    #[must_use]
    pub fn as_issues(&self) -> Option<&[SecurityIssue]> {
        match self {
            Self::Issues(issues) => Some(issues),
            _ => None,
        }
    }

    /// Short human readable description, used in processing messages
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let content = match self {
            Self::Coordinates(c) => c.purl(),
            Self::Filename(entry) => entry.to_string(),
            Self::DeclaredLicense(l)
            | Self::ObservedLicense(l)
            | Self::OverriddenLicense(l)
            | Self::ConfiguredLicense(l) => l.evaluate(),
            Self::Copyright(s) | Self::Homepage(s) | Self::SourceUrl(s) => s.clone(),
            Self::Issues(issues) => issues
                .iter()
                .map(|i| i.reference.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::VcsInfo(vcs) => format!("{}:{}@{}", vcs.kind, vcs.url, vcs.revision),
            Self::File(path) | Self::SourceFile(path) => path.display().to_string(),
            Self::MatchState(state) => format!("{state:?}"),
            Self::ChangeStatus(status) => format!("{status:?}"),
            Self::Custom { value, .. } => value.to_string(),
        };
        format!("Set {:?} to {}", self.kind(), content)
    }
}

impl From<Coordinate> for Fact {
    fn from(c: Coordinate) -> Self {
        Self::Coordinates(c)
    }
}

impl From<FilenameEntry> for Fact {
    fn from(entry: FilenameEntry) -> Self {
        Self::Filename(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::MavenCoordinates;

    #[test]
    fn filename_entry_sanitizes_blank_names() {
        assert!(FilenameEntry::new("   ").is_empty());
        assert_eq!(FilenameEntry::new(" a.jar ").filename(), Some("a.jar"));
    }

    #[test]
    fn filename_entry_wildcard_match() {
        let needle = FilenameEntry::new("commons-*.jar");
        let input = FilenameEntry::new("commons-io-2.6.jar").with_digest(FileDigest::sha256(b"x"));
        assert!(needle.matches(&input));
        assert!(!input.matches(&needle));
    }

    #[test]
    fn filename_entry_digest_must_equal() {
        let digest = FileDigest::sha256(b"x");
        let needle = FilenameEntry::from_digest(digest.clone());
        assert!(needle.matches(&FilenameEntry::new("a.jar").with_digest(digest)));
        assert!(!needle.matches(&FilenameEntry::new("a.jar")));
    }

    #[test]
    fn fact_kinds_follow_coordinate_type() {
        let fact = Fact::from(Coordinate::from(MavenCoordinates::new("g", "a", "1")));
        assert_eq!(fact.kind(), FactKind::MavenCoordinates);
        assert!(fact.kind().has_capability(Capability::Coordinates));
        assert!(fact.kind().has_capability(Capability::Identifier));
        assert!(!fact.kind().has_capability(Capability::LicenseInformation));
    }

    #[test]
    fn only_filename_accumulates() {
        assert!(FactKind::Filename.accumulates());
        assert!(!FactKind::DeclaredLicense.accumulates());
        assert!(!FactKind::Custom("x".into()).accumulates());
    }

    #[test]
    fn empty_facts() {
        assert!(Fact::Copyright("  ".into()).is_empty());
        assert!(Fact::DeclaredLicense(LicenseExpression::Empty).is_empty());
        assert!(Fact::Issues(vec![]).is_empty());
        assert!(!Fact::MatchState(MatchState::Unknown).is_empty());
        assert!(Fact::Custom {
            name: "x".into(),
            value: serde_json::Value::Null
        }
        .is_empty());
    }

    #[test]
    fn issue_status_parse() {
        assert_eq!("not-applicable".parse::<IssueStatus>().unwrap(), IssueStatus::NotApplicable);
        assert_eq!("OPEN".parse::<IssueStatus>().unwrap(), IssueStatus::Open);
        assert!("fixed".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn pretty_print_mentions_kind() {
        let fact = Fact::Copyright("(c) ACME".into());
        assert_eq!(fact.pretty_print(), "Set Copyright to (c) ACME");
    }
}
