//! Typed domain errors and actionable error formatting.
//!
//! Validation and lookup failures are typed so the binary can map them to
//! exit codes and JSON error codes. `ActionableError` wraps a message with
//! possible causes and remediation steps for human-readable output.

use std::fmt;
use thiserror::Error;

/// Form input or argument validation failures.
///
/// Nothing is persisted when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were blank
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// A field value is outside its enumerated set
    #[error("Invalid {field}: '{value}'. Expected one of: {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The issue references a project that does not exist
    #[error("Unknown project: {0}")]
    UnknownProject(String),
}

/// Failures to resolve an id to a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Issue not found: {0}")]
    IssueNotFound(String),
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Ambiguous ID '{prefix}' matches multiple issues: {}", .matches.join(", "))]
    AmbiguousIssueId { prefix: String, matches: Vec<String> },
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),
}

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use a11y::errors::ActionableError;
///
/// let error = ActionableError::new("Issue abc123 not found")
///     .with_cause("The issue ID may be incorrect")
///     .with_remedy("List issues: a11y issue list --all");
///
/// assert!(error.to_string().contains("To fix:"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    error: String,
    causes: Vec<String>,
    remediation: Vec<String>,
}

impl ActionableError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// Explain a validation failure with the flags that fix it.
pub fn explain_validation(error: &ValidationError) -> ActionableError {
    match error {
        ValidationError::MissingFields(fields) => {
            let mut actionable = ActionableError::new(error.to_string())
                .with_cause("Required fields were left blank");
            for field in fields {
                actionable = actionable.with_remedy(format!("Provide --{}", field));
            }
            actionable
        }
        ValidationError::InvalidValue { field, expected, .. } => {
            ActionableError::new(error.to_string())
                .with_remedy(format!("Use one of the valid {} values: {}", field, expected))
        }
        ValidationError::UnknownProject(_) => ActionableError::new(error.to_string())
            .with_cause("The project ID may be incorrect")
            .with_remedy("List projects: a11y project list")
            .with_remedy("Add the project first: a11y project add --name <name> --url <url>"),
    }
}

/// Explain a lookup failure with the commands that list valid ids.
pub fn explain_lookup(error: &LookupError) -> ActionableError {
    match error {
        LookupError::IssueNotFound(_) | LookupError::AmbiguousIssueId { .. } => {
            ActionableError::new(error.to_string())
                .with_cause("The issue ID or prefix may be incorrect")
                .with_remedy("List all issues: a11y issue list --all")
                .with_remedy("Use a longer ID prefix")
        }
        LookupError::ProjectNotFound(_) => ActionableError::new(error.to_string())
            .with_cause("The project ID may be incorrect")
            .with_remedy("List projects: a11y project list"),
        LookupError::NotificationNotFound(_) => ActionableError::new(error.to_string())
            .with_cause("The notification may have been cleared or expired")
            .with_remedy("List notifications: a11y notifications"),
    }
}
