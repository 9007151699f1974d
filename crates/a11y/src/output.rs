//! Structured output formatting for CLI commands.
//!
//! Every command can emit a JSON envelope (`{success, data, metadata}`) for
//! scripts, or plain text for humans. Errors get the same treatment via
//! [`JsonError`].

use chrono::Utc;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;
use std::io::{self, Write};

use crate::errors::{LookupError, ValidationError};

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

// ============================================================================
// Output Context for Quiet Mode
// ============================================================================

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Print essential output (always shown unless --json)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print success message (suppressed by --quiet or --json)
    pub fn print_success(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print warning (suppressed by --quiet or --json)
    pub fn print_warning(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe_stderr(&format!("Warning: {}", msg))
        } else {
            Ok(())
        }
    }

    /// Emit `data` wrapped in a [`JsonOutput`] envelope on stdout.
    pub fn print_json<T: Serialize>(&self, command: &str, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data, command);
        writeln_safe(&output.to_json_string()?)?;
        Ok(())
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Expected when piping to head
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

/// Safe eprintln that handles broken pipes gracefully
fn writeln_safe_stderr(msg: &str) -> io::Result<()> {
    match writeln!(io::stderr(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// JSON Output Types
// ============================================================================

/// Wrapper for successful command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for error output with suggestions
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

impl JsonError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.error.suggestions.push(suggestion.into());
        self
    }

    /// Build an error envelope from any command failure.
    ///
    /// Typed domain errors anywhere in the chain pick the error code;
    /// anything else is reported as a generic I/O failure.
    pub fn from_error(error: &anyhow::Error, command: impl Into<String>) -> Self {
        let message = format!("{:#}", error);

        if let Some(err) = error.downcast_ref::<LookupError>() {
            return match err {
                LookupError::IssueNotFound(id) => {
                    Self::new(ErrorCode::ISSUE_NOT_FOUND, message, command)
                        .with_details(serde_json::json!({"issue_id": id}))
                        .with_suggestion("Run 'a11y issue list --all' to see available issues")
                }
                LookupError::AmbiguousIssueId { prefix, matches } => {
                    Self::new(ErrorCode::AMBIGUOUS_ID, message, command)
                        .with_details(serde_json::json!({"prefix": prefix, "matches": matches}))
                        .with_suggestion("Use a longer ID prefix")
                }
                LookupError::ProjectNotFound(id) => {
                    Self::new(ErrorCode::PROJECT_NOT_FOUND, message, command)
                        .with_details(serde_json::json!({"project_id": id}))
                        .with_suggestion("Run 'a11y project list' to see available projects")
                }
                LookupError::NotificationNotFound(id) => {
                    Self::new(ErrorCode::NOTIFICATION_NOT_FOUND, message, command)
                        .with_details(serde_json::json!({"notification_id": id}))
                        .with_suggestion("Run 'a11y notifications' to see current notifications")
                }
            };
        }

        if let Some(err) = error.downcast_ref::<ValidationError>() {
            return match err {
                ValidationError::MissingFields(fields) => {
                    Self::new(ErrorCode::VALIDATION_FAILED, message, command)
                        .with_details(serde_json::json!({"missing_fields": fields}))
                }
                ValidationError::InvalidValue { field, value, expected } => {
                    Self::new(ErrorCode::INVALID_ARGUMENT, message, command)
                        .with_details(serde_json::json!({"field": field, "value": value}))
                        .with_suggestion(format!("Valid values are: {}", expected))
                }
                ValidationError::UnknownProject(id) => {
                    Self::new(ErrorCode::VALIDATION_FAILED, message, command)
                        .with_details(serde_json::json!({"project_id": id}))
                        .with_suggestion("Run 'a11y project list' to see available projects")
                }
            };
        }

        if error.downcast_ref::<std::io::Error>().is_some() {
            return Self::new(ErrorCode::IO_ERROR, message, command);
        }

        Self::new(ErrorCode::INTERNAL, message, command)
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ErrorCode::to_exit_code(&self.error.code)
    }
}

/// Error details including code, message, and suggestions
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code (e.g., "ISSUE_NOT_FOUND", "VALIDATION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Suggested actions to resolve the error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Standardized exit codes for the a11y CLI
///
/// # Examples
///
/// ```rust
/// use a11y::output::ExitCode;
///
/// assert_eq!(ExitCode::NotFound.code(), 3);
/// assert_eq!(ExitCode::ValidationFailed.code(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments or usage error (2)
    InvalidArgument = 2,

    /// Issue or project not found (3)
    NotFound = 3,

    /// Form validation failed (4)
    ValidationFailed = 4,

    /// File system failure (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Command succeeded",
            ExitCode::GenericError => "Generic error occurred",
            ExitCode::InvalidArgument => "Invalid arguments or usage error",
            ExitCode::NotFound => "Requested record not found",
            ExitCode::ValidationFailed => "Validation failed (missing required fields, unknown project)",
            ExitCode::ExternalError => "File system operation failed",
        }
    }
}

// ============================================================================
// Error Codes (String constants for JSON responses)
// ============================================================================

/// Standard error codes for JSON error output
pub struct ErrorCode;

impl ErrorCode {
    pub const ISSUE_NOT_FOUND: &'static str = "ISSUE_NOT_FOUND";
    pub const PROJECT_NOT_FOUND: &'static str = "PROJECT_NOT_FOUND";
    pub const NOTIFICATION_NOT_FOUND: &'static str = "NOTIFICATION_NOT_FOUND";
    pub const AMBIGUOUS_ID: &'static str = "AMBIGUOUS_ID";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const VALIDATION_FAILED: &'static str = "VALIDATION_FAILED";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const INTERNAL: &'static str = "INTERNAL_ERROR";

    /// Map error code string to exit code
    pub fn to_exit_code(code: &str) -> ExitCode {
        match code {
            Self::ISSUE_NOT_FOUND
            | Self::PROJECT_NOT_FOUND
            | Self::NOTIFICATION_NOT_FOUND
            | Self::AMBIGUOUS_ID => ExitCode::NotFound,
            Self::VALIDATION_FAILED => ExitCode::ValidationFailed,
            Self::INVALID_ARGUMENT => ExitCode::InvalidArgument,
            Self::IO_ERROR => ExitCode::ExternalError,
            _ => ExitCode::GenericError,
        }
    }
}

/// Response metadata
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp when the response was generated
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: chrono::DateTime<Utc>,
    /// Version of the output format
    pub version: String,
    /// Command that generated this response
    pub command: String,
}

impl Metadata {
    fn new(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

/// Serialize timestamp in ISO 8601 format
fn serialize_timestamp<S>(dt: &chrono::DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}
