//! Security issue validation
//!
//! Issues come from the artifact's `Issues` fact and from the configured
//! `security_issues` of every matching selector. Ignored references and
//! not-applicable issues are skipped, as are issues suppressed for the
//! artifact until a date after today. The remaining issues are checked
//! against forbidden statuses and the severity limit.

use crate::evaluation::{ComplianceChecker, EvaluationResult, PolicyEvaluation, Severity};
use chrono::NaiveDate;
use comply_artifact::{Artifact, Fact, FactKind, IssueStatus, SecurityIssue};
use comply_config::Configuration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings of [`SecurityIssueValidator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SecurityIssueSettings {
    /// Statuses that produce a finding
    pub forbidden_statuses: Vec<IssueStatus>,
    /// Severity of forbidden-status findings
    pub forbidden_status_severity: Severity,
    /// Issue severity at or above which a finding is produced
    pub severity_limit: f64,
    /// Severity of severity-limit findings
    pub severity_limit_severity: Severity,
    /// References never validated
    pub ignored_references: Vec<String>,
}

impl Default for SecurityIssueSettings {
    fn default() -> Self {
        Self {
            forbidden_statuses: Vec::new(),
            forbidden_status_severity: Severity::Fail,
            severity_limit: f64::MAX,
            severity_limit_severity: Severity::Fail,
            ignored_references: Vec::new(),
        }
    }
}

impl SecurityIssueSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With forbidden statuses
    #[must_use]
    pub fn with_forbidden_statuses(mut self, statuses: impl IntoIterator<Item = IssueStatus>) -> Self {
        self.forbidden_statuses = statuses.into_iter().collect();
        self
    }

    /// With severity limit
    #[inline]
    #[must_use]
    pub fn with_severity_limit(mut self, limit: f64) -> Self {
        self.severity_limit = limit;
        self
    }

    /// With ignored references
    #[must_use]
    pub fn with_ignored_references(mut self, references: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_references = references.into_iter().map(Into::into).collect();
        self
    }

    /// With finding severities for forbidden statuses and the severity limit
    #[inline]
    #[must_use]
    pub fn with_severities(mut self, forbidden_status: Severity, severity_limit: Severity) -> Self {
        self.forbidden_status_severity = forbidden_status;
        self.severity_limit_severity = severity_limit;
        self
    }
}

/// Validator for known security issues
#[derive(Debug, Clone)]
pub struct SecurityIssueValidator {
    config: Arc<Configuration>,
    settings: SecurityIssueSettings,
    today: NaiveDate,
}

impl SecurityIssueValidator {
    /// Create validator; "today" is the current local date
    #[must_use]
    pub fn new(config: Arc<Configuration>, settings: SecurityIssueSettings) -> Self {
        Self {
            config,
            settings,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Evaluate suppressions against `today` instead of the current date
    #[inline]
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Artifact issues followed by configured ones, without duplicates
    fn issues_of(&self, artifact: &Artifact) -> Vec<SecurityIssue> {
        let own = artifact
            .ask_for(&FactKind::Issues)
            .and_then(Fact::as_issues)
            .unwrap_or_default();
        let configured = self
            .config
            .security_issues()
            .iter()
            .filter(|(selector, _)| selector.matches(artifact))
            .flat_map(|(_, issues)| issues.iter());

        let mut merged: Vec<SecurityIssue> = Vec::new();
        for issue in own.iter().chain(configured) {
            if !merged.contains(issue) {
                merged.push(issue.clone());
            }
        }
        merged
    }

    /// Latest date until which `reference` is suppressed for `artifact`
    fn suppressed_until(&self, reference: &str, artifact: &Artifact) -> Option<NaiveDate> {
        self.config
            .suppressed_security_issues()
            .get(reference)?
            .iter()
            .filter(|(selector, _)| selector.matches(artifact))
            .map(|(_, until)| *until)
            .max()
    }

    fn validate(&self, artifact: &Artifact) -> Vec<EvaluationResult> {
        let mut results = Vec::new();
        for issue in self.issues_of(artifact) {
            if self.settings.ignored_references.contains(&issue.reference) {
                tracing::debug!(
                    "Do not validate security issue=[{}], since it is ignored for validation",
                    issue.reference
                );
                continue;
            }
            if issue.status == IssueStatus::NotApplicable {
                tracing::debug!("Ignore not applicable issue=[{}]", issue.reference);
                continue;
            }
            if self
                .suppressed_until(&issue.reference, artifact)
                .is_some_and(|until| self.today < until)
            {
                tracing::debug!("security issue=[{}] is suppressed for {}", issue.reference, artifact);
                continue;
            }
            if self.settings.forbidden_statuses.contains(&issue.status) {
                results.push(EvaluationResult::new(
                    "SecurityIssueValidator::forbiddenSecurityIssueStatus",
                    format!(
                        "The artifact has a security issue [{}] with forbidden status {}.",
                        issue.reference, issue.status
                    ),
                    self.settings.forbidden_status_severity,
                    artifact,
                ));
            }
            if issue.severity >= self.settings.severity_limit {
                results.push(EvaluationResult::new(
                    "SecurityIssueValidator::securityIssueSeverityLimit",
                    format!(
                        "The artifact has a security issue [{}] with a severity {}, which is above the limit {}.",
                        issue.reference, issue.severity, self.settings.severity_limit
                    ),
                    self.settings.severity_limit_severity,
                    artifact,
                ));
            }
        }
        results
    }
}

impl ComplianceChecker for SecurityIssueValidator {
    fn name(&self) -> &'static str {
        "SecurityIssueValidator"
    }

    fn evaluate(&self, artifacts: &[Artifact]) -> PolicyEvaluation {
        artifacts.iter().flat_map(|a| self.validate(a)).collect()
    }
}
