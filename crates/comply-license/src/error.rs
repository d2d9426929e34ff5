//! Error types for license handling
//!
//! Covers expression parsing and knowledge base loading.

use std::path::PathBuf;

/// Errors raised while parsing license expressions or loading license data
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// Operator the expression algebra cannot represent (e.g. `WITH`)
    #[error("unsupported operator in license expression: '{0}'")]
    UnsupportedOperator(String),

    /// Expression or license id could not be parsed
    #[error("malformed license expression '{expression}': {reason}")]
    Malformed { expression: String, reason: String },

    /// Knowledge base index is unreadable or malformed
    #[error("knowledge base error in {path}: {message}")]
    KnowledgeBase { path: PathBuf, message: String },

    /// IO error while reading license data
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LicenseError {
    /// Create malformed expression error
    pub fn malformed(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create knowledge base error for path
    pub fn knowledge_base(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::KnowledgeBase {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for license operations
pub type LicenseResult<T> = Result<T, LicenseError>;
