//! Error types for the artifact model

use comply_license::LicenseError;

/// Errors raised while constructing facts from external input
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Coordinate string could not be parsed
    #[error("malformed coordinate '{input}': {reason}")]
    MalformedCoordinate { input: String, reason: String },

    /// Coordinate or digest format is not supported
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Digest string is not `algorithm:hex`
    #[error("invalid digest '{input}': {reason}")]
    InvalidDigest { input: String, reason: String },

    /// License expression could not be built
    #[error("license error: {0}")]
    License(#[from] LicenseError),
}

impl ArtifactError {
    /// Create malformed coordinate error
    pub fn malformed_coordinate(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCoordinate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid digest error
    pub fn invalid_digest(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDigest {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for artifact operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_display() {
        let err = ArtifactError::UnknownFormat("pkg:cargo".to_string());
        assert_eq!(err.to_string(), "unknown format: pkg:cargo");
    }

    #[test]
    fn license_error_converts() {
        let err: ArtifactError = LicenseError::UnsupportedOperator("WITH".to_string()).into();
        assert!(matches!(err, ArtifactError::License(_)));
    }
}
