//! Comply Configuration
//!
//! Configurations that add, remove, override and whitelist artifacts, and the
//! resolver that merges several of them while reporting conflicts instead of
//! silently picking a winner.
//!
//! # Core Concepts
//!
//! - [`Configuration`]: Immutable policy built with [`ConfigurationBuilder`] or loaded from YAML, JSON or TOML
//! - [`ConfigurationResolver`]: Per-field merge policies over many configurations
//! - [`ConflictSink`]: Append-only destination for conflicts, passed explicitly
//! - [`ProcessingReport`]: In-memory [`ConflictSink`] queryable by category
//! - [`check_report`]: Turns recorded conflicts into [`ConfigurationError::ConflictsPresent`]
//!
//! # Example
//!
//! ```rust,ignore
//! use comply_config::{check_report, Configuration, ConfigurationResolver, ProcessingReport};
//!
//! let team = Configuration::load("team.yaml")?;
//! let project = Configuration::load("project.json")?;
//!
//! let mut report = ProcessingReport::new();
//! let merged = ConfigurationResolver::new().merge(&[team, project], &mut report);
//! check_report(&report)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod configuration;
mod document;
mod error;
mod report;
mod resolver;

// Re-exports
pub use configuration::{Configuration, ConfigurationBuilder, Suppressions};
pub use document::{
    ArtifactDocument, ConfigurationDocument, FinalLicenseDocument, OverrideDocument,
    SecurityIssuesDocument, SelectorDocument, SuppressionDocument, CONFIGURATION_ANALYSIS_SOURCE,
};
pub use error::{ConfigurationError, ConfigurationResult};
pub use report::{ConflictSink, MessageCategory, MessageSubject, ProcessingMessage, ProcessingReport};
pub use resolver::{check_report, ConfigurationResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
