//! CSV and JSON export of issue lists.
//!
//! Both formats denormalize the owning project's name into each row. The
//! caller decides which issues to export (normally the filtered, sorted list
//! currently on screen) and where the text goes.

use crate::domain::queries::ProjectScope;
use crate::domain::{Issue, Project};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Name substituted when an issue's project cannot be resolved.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

const CSV_HEADER: [&str; 8] = [
    "Title",
    "Severity",
    "Type",
    "Status",
    "Location",
    "Project",
    "Last Detected",
    "WCAG Guideline",
];

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ValidationError::InvalidValue {
                field: "export format",
                value: other.to_string(),
                expected: "csv, json",
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Resolves project ids to display names.
pub struct ProjectLookup<'a> {
    by_id: HashMap<&'a str, &'a Project>,
}

impl<'a> ProjectLookup<'a> {
    pub fn new(projects: &'a [Project]) -> Self {
        Self {
            by_id: projects.iter().map(|p| (p.id.as_str(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Project> {
        self.by_id.get(id).copied()
    }

    /// Project name, or [`UNKNOWN_PROJECT`] if the id is dangling.
    pub fn name_of(&self, id: &str) -> &'a str {
        self.get(id)
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_PROJECT)
    }
}

/// Finished export, ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub content: String,
    pub issue_count: usize,
}

/// Quote one CSV field, doubling any embedded quotes.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Date in en-US short form, e.g. `1/15/2024`.
pub fn locale_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%-m/%-d/%Y").to_string()
}

/// Render issues as CSV text.
///
/// Plain header row, every data field quoted, rows separated by `\n`.
pub fn export_csv(issues: &[Issue], projects: &ProjectLookup<'_>) -> String {
    let header = CSV_HEADER.join(",");

    let rows = issues.iter().map(|issue| {
        [
            csv_field(&issue.title),
            csv_field(issue.severity.as_str()),
            csv_field(&issue.issue_type),
            csv_field(issue.status.as_str()),
            csv_field(&issue.location),
            csv_field(projects.name_of(&issue.project_id)),
            csv_field(&locale_date(&issue.last_detected)),
            csv_field(&issue.wcag_guideline),
        ]
        .join(",")
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedIssue<'a> {
    #[serde(flatten)]
    issue: &'a Issue,
    project_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    export_date: String,
    project: &'a str,
    total_issues: usize,
    issues: Vec<ExportedIssue<'a>>,
}

/// Render issues as a pretty-printed JSON document.
///
/// `project_label` names the export scope ("All Projects" or a project name).
pub fn export_json(
    issues: &[Issue],
    projects: &ProjectLookup<'_>,
    project_label: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let export = JsonExport {
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        project: project_label,
        total_issues: issues.len(),
        issues: issues
            .iter()
            .map(|issue| ExportedIssue {
                issue,
                project_name: projects.name_of(&issue.project_id),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&export).context("Failed to serialize JSON export")
}

/// Label written into the JSON `project` field.
pub fn scope_label(scope: &ProjectScope, projects: &ProjectLookup<'_>) -> String {
    match scope {
        ProjectScope::All => "All Projects".to_string(),
        ProjectScope::Project(id) => projects
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Current Project".to_string()),
    }
}

/// `accessibility-issues-<scope>-<YYYY-MM-DD>.<ext>`
pub fn export_filename(
    scope: &ProjectScope,
    projects: &ProjectLookup<'_>,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> String {
    let scope_part = match scope {
        ProjectScope::All => "all-projects".to_string(),
        ProjectScope::Project(id) => projects
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "current".to_string()),
    };
    format!(
        "accessibility-issues-{}-{}.{}",
        sanitize_filename(&scope_part),
        now.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Replace path separators and control characters so a project name is
/// safe to embed in a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// Build a complete export artifact for the given issues.
pub fn build_export(
    issues: &[Issue],
    projects: &[Project],
    scope: &ProjectScope,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<ExportArtifact> {
    let lookup = ProjectLookup::new(projects);
    let content = match format {
        ExportFormat::Csv => export_csv(issues, &lookup),
        ExportFormat::Json => export_json(issues, &lookup, &scope_label(scope, &lookup), now)?,
    };

    Ok(ExportArtifact {
        format,
        filename: export_filename(scope, &lookup, format, now),
        content,
        issue_count: issues.len(),
    })
}
