//! Error types for configuration handling
//!
//! Provides error handling for:
//! - Escalated merge conflicts
//! - Document loading and conversion

use comply_artifact::ArtifactError;
use comply_license::LicenseError;
use std::path::PathBuf;

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The report holds messages and strict checking was requested
    #[error(
        "there are {count} conflicting configurations, please have a look at the processing report and resolve them"
    )]
    ConflictsPresent { count: usize },

    /// Document could not be deserialized or converted
    #[error("invalid configuration document: {0}")]
    Document(String),

    /// IO error while reading a document
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Selector or artifact in a document is malformed
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// License expression in a document is malformed
    #[error("license error: {0}")]
    License(#[from] LicenseError),
}

impl ConfigurationError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document(message.into())
    }
}

impl From<serde_yaml::Error> for ConfigurationError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Document(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigurationError {
    fn from(e: toml::de::Error) -> Self {
        Self::Document(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Document(e.to_string())
    }
}

/// Result type alias for configuration operations
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_present_display() {
        let err = ConfigurationError::ConflictsPresent { count: 2 };
        assert!(err.to_string().starts_with("there are 2 conflicting configurations"));
    }

    #[test]
    fn artifact_error_converts() {
        let err: ConfigurationError = ArtifactError::UnknownFormat("x".into()).into();
        assert!(matches!(err, ConfigurationError::Artifact(_)));
    }

    #[test]
    fn yaml_error_converts_to_document() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{").unwrap_err();
        let err: ConfigurationError = yaml_err.into();
        assert!(matches!(err, ConfigurationError::Document(_)));
    }
}
