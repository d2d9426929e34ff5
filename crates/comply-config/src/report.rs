//! Processing report and conflict sink
//!
//! The [`ConflictSink`] is passed explicitly into every merge or processing
//! call. [`ProcessingReport`] is the append-only implementation used by the
//! resolver and the workflow.

use comply_artifact::{Artifact, ArtifactIdentity, ArtifactSelector};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Category of a processing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageCategory {
    /// Two configurations disagree
    ConflictingConfigurations,
    /// Artifact added by configuration
    AddArtifact,
    /// Artifact removed by configuration
    RemoveArtifact,
    /// Proprietary artifact dropped
    ArtifactIsProprietary,
    /// Artifact attributes overridden by configuration
    OverrideArtifactAttributes,
    /// Artifact excluded from source resolving
    IgnoreForArtifactResolving,
    /// Added artifact already present
    DuplicateArtifact,
    /// No text known for a license
    MissingLicenseText,
    /// Configured selector matches no artifact
    UnnecessaryConfig,
}

impl MessageCategory {
    /// Upper-case name as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConflictingConfigurations => "CONFLICTING_CONFIGURATIONS",
            Self::AddArtifact => "ADD_ARTIFACT",
            Self::RemoveArtifact => "REMOVE_ARTIFACT",
            Self::ArtifactIsProprietary => "ARTIFACT_IS_PROPRIETARY",
            Self::OverrideArtifactAttributes => "OVERRIDE_ARTIFACT_ATTRIBUTES",
            Self::IgnoreForArtifactResolving => "IGNORE_FOR_ARTIFACTRESOLVING",
            Self::DuplicateArtifact => "DUPLICATE_ARTIFACT",
            Self::MissingLicenseText => "MISSING_LICENSE_TEXT",
            Self::UnnecessaryConfig => "UNNECESSARY_CONFIG",
        }
    }
}

impl Display for MessageCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a message is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageSubject {
    /// Not tied to one artifact
    Global,
    /// A configuration selector
    Selector(ArtifactSelector),
    /// An artifact, by identity
    Artifact(ArtifactIdentity),
}

impl MessageSubject {
    /// Subject for an artifact
    #[must_use]
    pub fn artifact(artifact: &Artifact) -> Self {
        Self::Artifact(artifact.identity())
    }
}

impl Display for MessageSubject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("-"),
            Self::Selector(selector) => write!(f, "selector {selector}"),
            Self::Artifact(identity) => write!(f, "artifact {identity}"),
        }
    }
}

impl Serialize for MessageSubject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingMessage {
    /// What the message is about
    pub subject: MessageSubject,
    /// Category
    pub category: MessageCategory,
    /// Human readable text
    pub message: String,
}

impl ProcessingMessage {
    /// Create message
    #[must_use]
    pub fn new(subject: MessageSubject, category: MessageCategory, message: impl Into<String>) -> Self {
        Self {
            subject,
            category,
            message: message.into(),
        }
    }
}

impl Display for ProcessingMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.category, self.subject, self.message)
    }
}

/// Append-only sink for conflicts and processing messages
pub trait ConflictSink {
    /// Append a message
    fn record(&mut self, message: ProcessingMessage);

    /// Number of recorded messages
    fn message_count(&self) -> usize;

    /// True if at least one message was recorded
    fn has_messages(&self) -> bool {
        self.message_count() > 0
    }

    /// Append a message built from its parts
    fn add(&mut self, subject: MessageSubject, category: MessageCategory, message: String) {
        self.record(ProcessingMessage::new(subject, category, message));
    }
}

/// In-memory processing report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingReport {
    messages: Vec<ProcessingMessage>,
}

impl ProcessingReport {
    /// Create empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in recording order
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ProcessingMessage] {
        &self.messages
    }

    /// Messages of one category
    pub fn by_category(&self, category: MessageCategory) -> impl Iterator<Item = &ProcessingMessage> {
        self.messages.iter().filter(move |m| m.category == category)
    }

    /// Number of messages of one category
    #[must_use]
    pub fn count(&self, category: MessageCategory) -> usize {
        self.by_category(category).count()
    }

    /// Number of messages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the report as pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ConflictSink for ProcessingReport {
    fn record(&mut self, message: ProcessingMessage) {
        tracing::debug!("report: {}", message);
        self.messages.push(message);
    }

    fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_append_only_and_queryable() {
        let mut report = ProcessingReport::new();
        assert!(!report.has_messages());

        report.add(
            MessageSubject::Global,
            MessageCategory::ConflictingConfigurations,
            "a".to_string(),
        );
        report.add(
            MessageSubject::Selector(ArtifactSelector::filename("x.jar")),
            MessageCategory::RemoveArtifact,
            "b".to_string(),
        );

        assert!(report.has_messages());
        assert_eq!(report.len(), 2);
        assert_eq!(report.count(MessageCategory::ConflictingConfigurations), 1);
        assert_eq!(report.messages()[1].message, "b");
    }

    #[test]
    fn message_display() {
        let msg = ProcessingMessage::new(
            MessageSubject::Selector(ArtifactSelector::filename("x.jar")),
            MessageCategory::RemoveArtifact,
            "removed",
        );
        assert_eq!(msg.to_string(), "REMOVE_ARTIFACT [selector [x.jar]] removed");
    }

    #[test]
    fn report_serializes_categories() {
        let mut report = ProcessingReport::new();
        report.add(
            MessageSubject::Global,
            MessageCategory::MissingLicenseText,
            "no text".to_string(),
        );
        let json = report.to_json().unwrap();
        assert!(json.contains("MISSING_LICENSE_TEXT"));
    }
}
