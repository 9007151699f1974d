//! Core domain types for the accessibility tracker.
//!
//! This module defines the records the rest of the system works with:
//! accessibility issues, monitored projects, and the form inputs used to
//! create them. Enumerated fields (severity, status) are closed enums, so an
//! out-of-range value can only appear as a deserialization error.

pub mod queries;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

/// Prefix of generated issue ids
pub const ISSUE_ID_PREFIX: &str = "issue-";

/// Severity of an accessibility issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access for some users entirely
    Critical,
    /// Serious barrier
    High,
    /// Noticeable barrier (default for new issues)
    Medium,
    /// Minor annoyance
    Low,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Fixed ordering weight: critical=4, high=3, medium=2, low=1.
    pub fn weight(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(ValidationError::InvalidValue {
                field: "severity",
                value: other.to_string(),
                expected: "critical, high, medium, low",
            }),
        }
    }
}

/// Triage status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    /// Freshly detected, not yet triaged
    New,
    /// Someone is working on a fix
    InProgress,
    /// Fixed
    Resolved,
    /// Deliberately not fixed
    Ignored,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::New,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Ignored,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::New => "new",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "new" => Ok(IssueStatus::New),
            "in-progress" => Ok(IssueStatus::InProgress),
            "resolved" => Ok(IssueStatus::Resolved),
            "ignored" => Ok(IssueStatus::Ignored),
            other => Err(ValidationError::InvalidValue {
                field: "status",
                value: other.to_string(),
                expected: "new, in-progress, resolved, ignored",
            }),
        }
    }
}

/// Monitoring status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Inactive,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => f.write_str("active"),
            ProjectStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// A reported accessibility problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique opaque identifier
    pub id: String,
    /// Short summary
    pub title: String,
    /// What is wrong and who it affects
    pub description: String,
    pub severity: Severity,
    /// Free-text category (e.g. "Images", "Forms")
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Offending markup snippet
    pub element: String,
    /// Page path or identifier
    pub location: String,
    /// WCAG success criterion reference (e.g. "WCAG 2.1 - 1.1.1 Non-text Content")
    pub wcag_guideline: String,
    /// Remediation guidance
    pub how_to_fix: String,
    /// When the issue was last seen
    pub last_detected: DateTime<Utc>,
    /// Owning project
    pub project_id: String,
    pub status: IssueStatus,
}

impl Issue {
    /// Build an issue from validated form input.
    ///
    /// Assigns a fresh id, stamps `last_detected` with `now` and starts the
    /// issue in the `new` status.
    pub fn from_new(input: NewIssue, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}{}", ISSUE_ID_PREFIX, Uuid::new_v4().simple()),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            severity: input.severity,
            issue_type: input.issue_type.trim().to_string(),
            element: input.element,
            location: input.location.trim().to_string(),
            wcag_guideline: input.wcag_guideline,
            how_to_fix: input.how_to_fix,
            last_detected: now,
            project_id: input.project_id,
            status: IssueStatus::New,
        }
    }

    /// Id without the `issue-` prefix.
    pub fn bare_id(&self) -> &str {
        self.id.strip_prefix(ISSUE_ID_PREFIX).unwrap_or(&self.id)
    }

    /// First eight characters of the bare id, for compact listings.
    pub fn short_id(&self) -> &str {
        let bare = self.bare_id();
        match bare.char_indices().nth(8) {
            Some((idx, _)) => &bare[..idx],
            None => bare,
        }
    }

    /// Whether `prefix` starts either the full id or the bare id.
    pub fn id_starts_with(&self, prefix: &str) -> bool {
        self.id.starts_with(prefix) || self.bare_id().starts_with(prefix)
    }
}

/// Form input for adding an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub element: String,
    pub location: String,
    pub wcag_guideline: String,
    pub how_to_fix: String,
    pub project_id: String,
}

impl NewIssue {
    /// Check that every required field is filled in.
    ///
    /// Title, description, type and location are required. All missing
    /// fields are reported together so nothing is ever partially submitted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("title", &self.title),
            ("description", &self.description),
            ("type", &self.issue_type),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// Partial update applied to an existing issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub issue_type: Option<String>,
    pub element: Option<String>,
    pub location: Option<String>,
    pub wcag_guideline: Option<String>,
    pub how_to_fix: Option<String>,
}

impl IssueEdit {
    pub fn is_empty(&self) -> bool {
        *self == IssueEdit::default()
    }

    /// Apply the edit, rejecting blanks in required fields.
    pub fn apply(self, issue: &mut Issue) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("type", &self.issue_type),
            ("location", &self.location),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                missing.push(name);
            }
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if let Some(t) = self.title {
            issue.title = t.trim().to_string();
        }
        if let Some(d) = self.description {
            issue.description = d.trim().to_string();
        }
        if let Some(s) = self.severity {
            issue.severity = s;
        }
        if let Some(t) = self.issue_type {
            issue.issue_type = t.trim().to_string();
        }
        if let Some(e) = self.element {
            issue.element = e;
        }
        if let Some(l) = self.location {
            issue.location = l.trim().to_string();
        }
        if let Some(w) = self.wcag_guideline {
            issue.wcag_guideline = w;
        }
        if let Some(h) = self.how_to_fix {
            issue.how_to_fix = h;
        }
        Ok(())
    }
}

/// A monitored site or application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub url: String,
    pub last_scan: DateTime<Utc>,
    /// Denormalized count of issues referencing this project
    pub issue_count: usize,
    pub status: ProjectStatus,
}

/// Form input for adding a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub url: String,
}

impl NewProject {
    /// Name and URL are both required (after trimming).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.url.trim().is_empty() {
            missing.push("url");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

impl Project {
    pub fn from_new(input: NewProject, issue_count: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("project-{}", Uuid::new_v4().simple()),
            name: input.name.trim().to_string(),
            url: input.url.trim().to_string(),
            last_scan: now,
            issue_count,
            status: ProjectStatus::Active,
        }
    }
}
