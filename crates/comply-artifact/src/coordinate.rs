//! Package coordinates
//!
//! Each coordinate system has its own struct; [`Coordinate`] unifies them and
//! converts to and from package-URL strings (`pkg:<type>/<namespace>/<name>@<version>`).

use crate::error::{ArtifactError, ArtifactResult};
use crate::wildcard::wildcard_matches;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

fn clean(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Maven `groupId:artifactId:version`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MavenCoordinates {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version
    pub version: String,
}

impl MavenCoordinates {
    /// Create trimmed Maven coordinates
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: clean(group_id),
            artifact_id: clean(artifact_id),
            version: clean(version),
        }
    }
}

/// npm package coordinates
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JavaScriptCoordinates {
    /// Package artifact id (usually `name-version`)
    pub artifact_id: String,
    /// Package name
    pub name: String,
    /// Version
    pub version: String,
}

impl JavaScriptCoordinates {
    /// Create trimmed npm coordinates
    #[must_use]
    pub fn new(
        artifact_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            artifact_id: clean(artifact_id),
            name: clean(name),
            version: clean(version),
        }
    }
}

/// OSGi bundle coordinates
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleCoordinates {
    /// Bundle symbolic name
    pub symbolic_name: String,
    /// Bundle version
    pub bundle_version: String,
}

impl BundleCoordinates {
    /// Create trimmed bundle coordinates
    #[must_use]
    pub fn new(symbolic_name: impl Into<String>, bundle_version: impl Into<String>) -> Self {
        Self {
            symbolic_name: clean(symbolic_name),
            bundle_version: clean(bundle_version),
        }
    }
}

/// NuGet package coordinates
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DotNetCoordinates {
    /// Package id
    pub package_id: String,
    /// Version
    pub version: String,
}

impl DotNetCoordinates {
    /// Create trimmed NuGet coordinates
    #[must_use]
    pub fn new(package_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_id: clean(package_id),
            version: clean(version),
        }
    }
}

/// Coordinates without a known package ecosystem
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenericCoordinates {
    /// Name
    pub name: String,
    /// Version
    pub version: String,
}

impl GenericCoordinates {
    /// Create trimmed generic coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: clean(name),
            version: clean(version),
        }
    }
}

/// Package-URL type of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateType {
    /// `pkg:maven`
    Maven,
    /// `pkg:npm`
    Npm,
    /// `pkg:p2`
    P2,
    /// `pkg:nuget`
    Nuget,
    /// `pkg:generic`
    Generic,
}

impl CoordinateType {
    /// Package-URL type string
    #[inline]
    #[must_use]
    pub const fn purl_type(self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Npm => "npm",
            Self::P2 => "p2",
            Self::Nuget => "nuget",
            Self::Generic => "generic",
        }
    }

    /// Parse a package-URL type string
    ///
    /// # Errors
    /// Returns [`ArtifactError::UnknownFormat`] for unsupported types
    pub fn from_purl_type(purl_type: &str) -> ArtifactResult<Self> {
        match purl_type.to_ascii_lowercase().as_str() {
            "maven" => Ok(Self::Maven),
            "npm" => Ok(Self::Npm),
            "p2" => Ok(Self::P2),
            "nuget" => Ok(Self::Nuget),
            "generic" => Ok(Self::Generic),
            other => Err(ArtifactError::UnknownFormat(format!("package-url type '{other}'"))),
        }
    }
}

impl Display for CoordinateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.purl_type())
    }
}

/// Coordinates in any supported ecosystem
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Coordinate {
    /// Maven coordinates
    Maven(MavenCoordinates),
    /// npm coordinates
    JavaScript(JavaScriptCoordinates),
    /// OSGi bundle coordinates
    Bundle(BundleCoordinates),
    /// NuGet coordinates
    DotNet(DotNetCoordinates),
    /// Generic coordinates
    Generic(GenericCoordinates),
}

impl Coordinate {
    /// Package-URL type
    #[must_use]
    pub const fn coordinate_type(&self) -> CoordinateType {
        match self {
            Self::Maven(_) => CoordinateType::Maven,
            Self::JavaScript(_) => CoordinateType::Npm,
            Self::Bundle(_) => CoordinateType::P2,
            Self::DotNet(_) => CoordinateType::Nuget,
            Self::Generic(_) => CoordinateType::Generic,
        }
    }

    /// Field values in their canonical order
    fn fields(&self) -> Vec<&str> {
        match self {
            Self::Maven(c) => vec![
                c.group_id.as_str(),
                c.artifact_id.as_str(),
                c.version.as_str(),
            ],
            Self::JavaScript(c) => vec![c.artifact_id.as_str(), c.name.as_str(), c.version.as_str()],
            Self::Bundle(c) => vec![c.symbolic_name.as_str(), c.bundle_version.as_str()],
            Self::DotNet(c) => vec![c.package_id.as_str(), c.version.as_str()],
            Self::Generic(c) => vec![c.name.as_str(), c.version.as_str()],
        }
    }

    /// True when every field is blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }

    /// Name of the package, in the ecosystem's terms
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Maven(c) => &c.artifact_id,
            Self::JavaScript(c) => &c.name,
            Self::Bundle(c) => &c.symbolic_name,
            Self::DotNet(c) => &c.package_id,
            Self::Generic(c) => &c.name,
        }
    }

    /// Version of the package
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Maven(c) => &c.version,
            Self::JavaScript(c) => &c.version,
            Self::Bundle(c) => &c.bundle_version,
            Self::DotNet(c) => &c.version,
            Self::Generic(c) => &c.version,
        }
    }

    /// Match `self` as a needle with `*` wildcards against `other`
    ///
    /// Coordinates of different types never match; blank needle fields match anything.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.coordinate_type() == other.coordinate_type()
            && self
                .fields()
                .iter()
                .zip(other.fields())
                .all(|(needle, input)| wildcard_matches(needle, input))
    }

    /// Render as a package-URL
    #[must_use]
    pub fn purl(&self) -> String {
        let (namespace, name) = match self {
            Self::Maven(c) => (Some(c.group_id.as_str()), c.artifact_id.as_str()),
            Self::JavaScript(c) => (Some(c.name.as_str()), c.artifact_id.as_str()),
            Self::Bundle(c) => (None, c.symbolic_name.as_str()),
            Self::DotNet(c) => (None, c.package_id.as_str()),
            Self::Generic(c) => (None, c.name.as_str()),
        };
        let mut purl = format!("pkg:{}/", self.coordinate_type());
        if let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) {
            purl.push_str(namespace);
            purl.push('/');
        }
        purl.push_str(name);
        let version = self.version();
        if !version.is_empty() {
            purl.push('@');
            purl.push_str(version);
        }
        purl
    }

    /// Parse a package-URL
    ///
    /// Qualifiers (`?...`) and subpaths (`#...`) are ignored.
    ///
    /// # Errors
    /// - [`ArtifactError::MalformedCoordinate`] if the string is not a package-URL
    /// - [`ArtifactError::UnknownFormat`] if the type is not supported
    pub fn parse_purl(input: &str) -> ArtifactResult<Self> {
        let trimmed = input.trim();
        let rest = trimmed
            .strip_prefix("pkg:")
            .ok_or_else(|| ArtifactError::malformed_coordinate(input, "missing 'pkg:' scheme"))?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();

        let (purl_type, path) = rest
            .split_once('/')
            .ok_or_else(|| ArtifactError::malformed_coordinate(input, "missing package name"))?;
        let coordinate_type = CoordinateType::from_purl_type(purl_type)?;

        let (path, version) = match path.rsplit_once('@') {
            Some((path, version)) if !path.is_empty() && !path.ends_with('/') => (path, version),
            _ => (path, ""),
        };
        let (namespace, name) = match path.rsplit_once('/') {
            Some((namespace, name)) => (namespace, name),
            None => ("", path),
        };
        if name.is_empty() {
            return Err(ArtifactError::malformed_coordinate(input, "missing package name"));
        }

        let coordinate = match coordinate_type {
            CoordinateType::Maven => {
                if namespace.is_empty() {
                    return Err(ArtifactError::malformed_coordinate(
                        input,
                        "maven coordinates need a group id",
                    ));
                }
                Self::Maven(MavenCoordinates::new(namespace, name, version))
            }
            CoordinateType::Npm => {
                let package_name = if namespace.is_empty() { name } else { namespace };
                Self::JavaScript(JavaScriptCoordinates::new(name, package_name, version))
            }
            CoordinateType::P2 => Self::Bundle(BundleCoordinates::new(name, version)),
            CoordinateType::Nuget => Self::DotNet(DotNetCoordinates::new(name, version)),
            CoordinateType::Generic => Self::Generic(GenericCoordinates::new(name, version)),
        };
        Ok(coordinate)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.purl())
    }
}

impl FromStr for Coordinate {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_purl(s)
    }
}

impl From<MavenCoordinates> for Coordinate {
    fn from(c: MavenCoordinates) -> Self {
        Self::Maven(c)
    }
}

impl From<JavaScriptCoordinates> for Coordinate {
    fn from(c: JavaScriptCoordinates) -> Self {
        Self::JavaScript(c)
    }
}

impl From<BundleCoordinates> for Coordinate {
    fn from(c: BundleCoordinates) -> Self {
        Self::Bundle(c)
    }
}

impl From<DotNetCoordinates> for Coordinate {
    fn from(c: DotNetCoordinates) -> Self {
        Self::DotNet(c)
    }
}

impl From<GenericCoordinates> for Coordinate {
    fn from(c: GenericCoordinates) -> Self {
        Self::Generic(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builders_trim_fields() {
        let c = MavenCoordinates::new(" org.example ", "lib\n", " 1.0");
        assert_eq!(c, MavenCoordinates::new("org.example", "lib", "1.0"));
    }

    #[test]
    fn maven_purl_roundtrip() {
        let c = Coordinate::from(MavenCoordinates::new("org.apache.commons", "commons-lang3", "3.5"));
        assert_eq!(c.purl(), "pkg:maven/org.apache.commons/commons-lang3@3.5");
        assert_eq!(Coordinate::parse_purl(&c.purl()).unwrap(), c);
    }

    #[test]
    fn npm_purl_uses_name_as_namespace() {
        let c = Coordinate::from(JavaScriptCoordinates::new("lodash-4.17.21", "lodash", "4.17.21"));
        assert_eq!(c.purl(), "pkg:npm/lodash/lodash-4.17.21@4.17.21");
        assert_eq!(Coordinate::parse_purl(&c.purl()).unwrap(), c);
    }

    #[test]
    fn npm_purl_without_namespace() {
        let c = Coordinate::parse_purl("pkg:npm/left-pad@1.3.0").unwrap();
        assert_eq!(
            c,
            Coordinate::from(JavaScriptCoordinates::new("left-pad", "left-pad", "1.3.0"))
        );
    }

    #[test]
    fn p2_nuget_generic_purls() {
        let bundle = Coordinate::from(BundleCoordinates::new("org.eclipse.core", "3.1.0"));
        assert_eq!(bundle.purl(), "pkg:p2/org.eclipse.core@3.1.0");
        let nuget = Coordinate::from(DotNetCoordinates::new("Newtonsoft.Json", "12.0.1"));
        assert_eq!(nuget.purl(), "pkg:nuget/Newtonsoft.Json@12.0.1");
        let generic = Coordinate::from(GenericCoordinates::new("a.jar", "-"));
        assert_eq!(generic.purl(), "pkg:generic/a.jar@-");
        for c in [bundle, nuget, generic] {
            assert_eq!(Coordinate::parse_purl(&c.purl()).unwrap(), c);
        }
    }

    #[test]
    fn qualifiers_are_ignored() {
        let c = Coordinate::parse_purl("pkg:maven/g/a@1?type=jar#sub").unwrap();
        assert_eq!(c, Coordinate::from(MavenCoordinates::new("g", "a", "1")));
    }

    #[test]
    fn missing_version_is_blank() {
        let c = Coordinate::parse_purl("pkg:generic/thing").unwrap();
        assert_eq!(c.version(), "");
        assert_eq!(c.purl(), "pkg:generic/thing");
    }

    #[test]
    fn unknown_type_is_unknown_format() {
        let err = Coordinate::parse_purl("pkg:cargo/serde@1.0").unwrap_err();
        assert!(matches!(err, ArtifactError::UnknownFormat(_)));
    }

    #[test]
    fn malformed_inputs() {
        for input in ["maven/g/a@1", "pkg:maven", "pkg:maven/a@1", "pkg:generic/"] {
            let err = Coordinate::parse_purl(input).unwrap_err();
            assert!(
                matches!(err, ArtifactError::MalformedCoordinate { .. }),
                "{input} gave {err}"
            );
        }
    }

    #[test]
    fn wildcard_matching_per_field() {
        let needle = Coordinate::from(MavenCoordinates::new("org.apache.*", "commons-*", ""));
        let input = Coordinate::from(MavenCoordinates::new("org.apache.commons", "commons-io", "2.6"));
        assert!(needle.matches(&input));
        assert!(!input.matches(&needle));

        let other_type = Coordinate::from(GenericCoordinates::new("commons-io", "2.6"));
        assert!(!needle.matches(&other_type));
    }

    #[test]
    fn empty_coordinates() {
        assert!(Coordinate::from(GenericCoordinates::new(" ", "")).is_empty());
        assert!(!Coordinate::from(GenericCoordinates::new("x", "")).is_empty());
    }
}
