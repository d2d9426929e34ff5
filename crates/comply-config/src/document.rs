//! Configuration documents
//!
//! Serde view of a configuration file. Every section is optional. Selectors,
//! coordinates and license expressions are plain strings in the document
//! and are validated while converting into a [`Configuration`].

use crate::configuration::{Configuration, ConfigurationBuilder};
use crate::error::{ConfigurationError, ConfigurationResult};
use chrono::NaiveDate;
use comply_artifact::{
    Artifact, ArtifactIdentifier, ArtifactSelector, Coordinate, Fact, FileDigest, FilenameEntry,
    SecurityIssue,
};
use comply_license::{parse_spdx, LicenseExpression};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis source of artifacts defined in configuration documents
pub const CONFIGURATION_ANALYSIS_SOURCE: &str = "CONFIGURATION";

/// Root of a configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigurationDocument {
    /// Artifacts excluded from source resolving
    #[serde(default)]
    pub ignore_for_source_resolving: Vec<SelectorDocument>,
    /// Override entries
    #[serde(default, rename = "override")]
    pub overrides: Vec<OverrideDocument>,
    /// Artifacts to remove
    #[serde(default)]
    pub remove_artifact: Vec<SelectorDocument>,
    /// Artifacts to add
    #[serde(default)]
    pub add_artifact: Vec<ArtifactDocument>,
    /// Artifacts whose sources may be missing
    #[serde(default)]
    pub valid_for_missing_sources: Vec<SelectorDocument>,
    /// Artifacts whose sources may be incomplete
    #[serde(default)]
    pub valid_for_incomplete_sources: Vec<SelectorDocument>,
    /// Final license entries
    #[serde(default)]
    pub final_licenses: Vec<FinalLicenseDocument>,
    /// Configured security issues
    #[serde(default)]
    pub security_issues: Vec<SecurityIssuesDocument>,
    /// Suppressed security issues
    #[serde(default)]
    pub suppress_security_issues: Vec<SuppressionDocument>,
    /// Fail on incomplete sources
    #[serde(default)]
    pub fail_on_incomplete_sources: bool,
    /// Fail on missing sources
    #[serde(default)]
    pub fail_on_missing_sources: bool,
}

/// Selector as written in a document
///
/// `filename` and `hash` together form one filename criterion; each purl in
/// `coordinates` adds a coordinate criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SelectorDocument {
    /// Filename pattern, `*` wildcards allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Digest as `algorithm:hex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Package-URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Vec<String>,
}

/// Artifact as written in a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ArtifactDocument {
    /// Filenames
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filenames: Vec<String>,
    /// Digest as `algorithm:hex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Package-URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Vec<String>,
    /// Declared license, SPDX syntax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_license: Option<String>,
    /// Observed license, SPDX syntax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_license: Option<String>,
    /// Overridden license, SPDX syntax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden_license: Option<String>,
    /// Copyright notice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Source download URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Proprietary flag
    #[serde(default)]
    pub proprietary: bool,
    /// Analysis source, defaults to [`CONFIGURATION_ANALYSIS_SOURCE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_source: Option<String>,
}

/// `override` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideDocument {
    /// Matched artifacts
    pub selector: SelectorDocument,
    /// Override values
    pub artifact: ArtifactDocument,
}

/// `final-licenses` entry; `license` is an SPDX expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinalLicenseDocument {
    /// Matched artifacts
    pub selector: SelectorDocument,
    /// License expression
    pub license: String,
}

/// `security-issues` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityIssuesDocument {
    /// Matched artifacts
    pub selector: SelectorDocument,
    /// Issues attached to matched artifacts
    #[serde(default)]
    pub issues: Vec<SecurityIssue>,
}

/// `suppress-security-issues` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuppressionDocument {
    /// Issue reference
    pub reference: String,
    /// Matched artifacts
    pub selector: SelectorDocument,
    /// Suppressed until this date
    pub until: NaiveDate,
}

fn parse_digest(hash: &str) -> ConfigurationResult<FileDigest> {
    Ok(hash.parse::<FileDigest>()?)
}

fn parse_coordinates(purls: &[String]) -> ConfigurationResult<Vec<Coordinate>> {
    purls
        .iter()
        .map(|purl| purl.parse::<Coordinate>().map_err(ConfigurationError::from))
        .collect()
}

fn parse_license(expression: &str) -> ConfigurationResult<LicenseExpression> {
    Ok(parse_spdx(expression)?)
}

impl SelectorDocument {
    /// Convert into a selector
    ///
    /// # Errors
    /// Returns error if the selector is empty or a purl or hash is malformed
    pub fn to_selector(&self) -> ConfigurationResult<ArtifactSelector> {
        let mut criteria = Vec::new();

        let entry = match (&self.filename, &self.hash) {
            (Some(name), Some(hash)) => {
                Some(FilenameEntry::new(name.as_str()).with_digest(parse_digest(hash)?))
            }
            (Some(name), None) => Some(FilenameEntry::new(name.as_str())),
            (None, Some(hash)) => Some(FilenameEntry::from_digest(parse_digest(hash)?)),
            (None, None) => None,
        };
        if let Some(entry) = entry.filter(|e| !e.is_empty()) {
            criteria.push(ArtifactIdentifier::Filename(entry));
        }
        criteria.extend(
            parse_coordinates(&self.coordinates)?
                .into_iter()
                .map(ArtifactIdentifier::Coordinate),
        );

        if criteria.is_empty() {
            return Err(ConfigurationError::document(
                "selector needs a filename, a hash or at least one coordinate",
            ));
        }
        Ok(ArtifactSelector::new(criteria))
    }
}

impl ArtifactDocument {
    /// Convert into an artifact
    ///
    /// # Errors
    /// Returns error if a purl, hash or license expression is malformed
    pub fn to_artifact(&self) -> ConfigurationResult<Artifact> {
        let source = self
            .analysis_source
            .as_deref()
            .unwrap_or(CONFIGURATION_ANALYSIS_SOURCE);
        let mut artifact = Artifact::with_analysis_source(source).with_proprietary(self.proprietary);

        let digest = self.hash.as_deref().map(parse_digest).transpose()?;
        match (self.filenames.split_first(), digest) {
            (Some((first, rest)), digest) => {
                let mut entry = FilenameEntry::new(first.as_str());
                if let Some(digest) = digest {
                    entry = entry.with_digest(digest);
                }
                artifact.add_fact(entry);
                for name in rest {
                    artifact.add_fact(FilenameEntry::new(name.as_str()));
                }
            }
            (None, Some(digest)) => {
                artifact.add_fact(FilenameEntry::from_digest(digest));
            }
            (None, None) => {}
        }

        for coordinate in parse_coordinates(&self.coordinates)? {
            artifact.add_fact(coordinate);
        }
        if let Some(license) = &self.declared_license {
            artifact.add_fact(Fact::DeclaredLicense(parse_license(license)?));
        }
        if let Some(license) = &self.observed_license {
            artifact.add_fact(Fact::ObservedLicense(parse_license(license)?));
        }
        if let Some(license) = &self.overridden_license {
            artifact.add_fact(Fact::OverriddenLicense(parse_license(license)?));
        }
        if let Some(copyright) = &self.copyright {
            artifact.add_fact(Fact::Copyright(copyright.clone()));
        }
        if let Some(homepage) = &self.homepage {
            artifact.add_fact(Fact::Homepage(homepage.clone()));
        }
        if let Some(url) = &self.source_url {
            artifact.add_fact(Fact::SourceUrl(url.clone()));
        }
        Ok(artifact)
    }
}

impl ConfigurationDocument {
    /// Parse a YAML document
    ///
    /// # Errors
    /// Returns error if the YAML is malformed or has unknown sections
    pub fn from_yaml_str(input: &str) -> ConfigurationResult<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Parse a JSON document
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or has unknown sections
    pub fn from_json_str(input: &str) -> ConfigurationResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or has unknown sections
    pub fn from_toml_str(input: &str) -> ConfigurationResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Convert into a configuration
    ///
    /// # Errors
    /// Returns error on the first malformed selector, artifact or license
    pub fn into_configuration(self) -> ConfigurationResult<Configuration> {
        let mut builder = ConfigurationBuilder::new()
            .fail_on_incomplete_sources(self.fail_on_incomplete_sources)
            .fail_on_missing_sources(self.fail_on_missing_sources);

        for selector in &self.ignore_for_source_resolving {
            builder = builder.ignore_for_source_resolving(selector.to_selector()?);
        }
        for entry in &self.overrides {
            builder = builder
                .override_artifact(entry.selector.to_selector()?, entry.artifact.to_artifact()?);
        }
        for selector in &self.remove_artifact {
            builder = builder.remove_artifact(selector.to_selector()?);
        }
        for artifact in &self.add_artifact {
            builder = builder.add_artifact(artifact.to_artifact()?);
        }
        for selector in &self.valid_for_missing_sources {
            builder = builder.valid_for_missing_sources(selector.to_selector()?);
        }
        for selector in &self.valid_for_incomplete_sources {
            builder = builder.valid_for_incomplete_sources(selector.to_selector()?);
        }
        for entry in &self.final_licenses {
            builder =
                builder.final_license(entry.selector.to_selector()?, parse_license(&entry.license)?);
        }
        for entry in self.security_issues {
            builder = builder.security_issues(entry.selector.to_selector()?, entry.issues);
        }
        for entry in self.suppress_security_issues {
            builder = builder.suppress_security_issue(
                entry.reference,
                entry.selector.to_selector()?,
                entry.until,
            );
        }

        let config = builder.build();
        tracing::debug!(
            "configuration document converted: {} overrides, {} final licenses",
            config.overrides().len(),
            config.final_licenses().len()
        );
        Ok(config)
    }
}

impl Configuration {
    /// Parse a YAML configuration document
    ///
    /// # Errors
    /// Returns error if the document is malformed
    pub fn from_yaml_str(input: &str) -> ConfigurationResult<Self> {
        ConfigurationDocument::from_yaml_str(input)?.into_configuration()
    }

    /// Parse a JSON configuration document
    ///
    /// # Errors
    /// Returns error if the document is malformed
    pub fn from_json_str(input: &str) -> ConfigurationResult<Self> {
        ConfigurationDocument::from_json_str(input)?.into_configuration()
    }

    /// Parse a TOML configuration document
    ///
    /// Dates must be written as strings.
    ///
    /// # Errors
    /// Returns error if the document is malformed
    pub fn from_toml_str(input: &str) -> ConfigurationResult<Self> {
        ConfigurationDocument::from_toml_str(input)?.into_configuration()
    }

    /// Load a configuration document, choosing the format by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read, the extension is not
    /// `.yaml`, `.yml`, `.json` or `.toml`, or the document is malformed
    pub fn load(path: impl AsRef<Path>) -> ConfigurationResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let input =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::io_error(path, e))?;

        tracing::info!("loading configuration from {}", path.display());
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&input),
            Some("json") => Self::from_json_str(&input),
            Some("toml") => Self::from_toml_str(&input),
            _ => Err(ConfigurationError::document(format!(
                "unsupported configuration format: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_artifact::{FactKind, IssueStatus, MavenCoordinates};
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r"
ignore-for-source-resolving:
  - filename: internal-*.jar
override:
  - selector:
      coordinates: ['pkg:maven/org.example/lib@1.0']
    artifact:
      declared-license: MIT OR Apache-2.0
      copyright: Example Corp
final-licenses:
  - selector:
      filename: lib-1.0.jar
    license: EPL-2.0
security-issues:
  - selector:
      filename: lib-1.0.jar
    issues:
      - reference: CVE-2020-0001
        status: OPEN
        severity: 7.5
suppress-security-issues:
  - reference: CVE-2020-0001
    selector:
      filename: lib-1.0.jar
    until: 2030-01-01
  - reference: CVE-2020-0001
    selector:
      filename: lib-1.0.jar
    until: 2026-01-01
fail-on-missing-sources: true
";

    #[test]
    fn yaml_document_converts() {
        let config = Configuration::from_yaml_str(DOCUMENT).unwrap();
        let ignored = ArtifactSelector::filename("internal-*.jar");
        let lib = ArtifactSelector::filename("lib-1.0.jar");
        let maven = ArtifactSelector::coordinate(MavenCoordinates::new("org.example", "lib", "1.0"));

        assert!(config.valid_for_missing_sources().contains(&ignored));
        assert!(config.valid_for_incomplete_sources().contains(&ignored));
        assert!(config.fail_on_missing_sources());
        assert!(!config.fail_on_incomplete_sources());

        let override_artifact = &config.overrides()[&maven];
        assert_eq!(
            override_artifact.ask_for(&FactKind::Copyright),
            Some(&Fact::Copyright("Example Corp".into()))
        );
        assert_eq!(override_artifact.analysis_source(), CONFIGURATION_ANALYSIS_SOURCE);

        assert_eq!(config.final_licenses()[&lib].evaluate(), "EPL-2.0");
        assert_eq!(config.security_issues()[&lib][0].status, IssueStatus::Open);
        assert_eq!(
            config.suppressed_security_issues()["CVE-2020-0001"][&lib],
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn empty_document_is_default() {
        let config = Configuration::from_yaml_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn toml_document_converts() {
        let config = Configuration::from_toml_str(
            r#"
fail-on-missing-sources = true

[[remove-artifact]]
filename = "junit-*.jar"

[[suppress-security-issues]]
reference = "CVE-1"
until = "2030-01-01"
selector = { filename = "a.jar" }
"#,
        )
        .unwrap();
        assert!(config.fail_on_missing_sources());
        assert!(config
            .remove_artifact()
            .contains(&ArtifactSelector::filename("junit-*.jar")));
        assert_eq!(config.suppressed_security_issues().len(), 1);
    }

    #[test]
    fn empty_selector_is_rejected() {
        let err = Configuration::from_yaml_str("remove-artifact:\n  - {}\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::Document(_)));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = Configuration::from_json_str(r#"{"remove-artefact": []}"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::Document(_)));
    }

    #[test]
    fn malformed_purl_is_an_artifact_error() {
        let err = Configuration::from_json_str(
            r#"{"remove-artifact": [{"coordinates": ["pkg:cargo/serde@1"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Artifact(_)));
    }

    #[test]
    fn with_operator_is_a_license_error() {
        let err = Configuration::from_yaml_str(
            "final-licenses:\n  - selector: {filename: a.jar}\n    license: GPL-2.0 WITH Classpath-exception-2.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::License(_)));
    }

    #[test]
    fn artifact_document_with_hash_only() {
        let doc = ArtifactDocument {
            hash: Some(format!("sha256:{}", FileDigest::sha256(b"x").value())),
            ..ArtifactDocument::default()
        };
        let artifact = doc.to_artifact().unwrap();
        assert_eq!(artifact.filenames().len(), 1);
        assert!(artifact.filenames()[0].filename().is_none());
    }
}
