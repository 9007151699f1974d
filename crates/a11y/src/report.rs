//! Compliance report for a project scope.
//!
//! A report summarizes the scoped issues (totals, resolved and critical
//! counts, and a compliance score) and carries a sample of the issues
//! themselves. It is written as a pretty JSON document.

use crate::domain::queries::ProjectScope;
use crate::domain::{Issue, IssueStatus, Project, Severity};
use crate::errors::ValidationError;
use crate::export::{scope_label, ExportArtifact, ExportFormat, ProjectLookup};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of issues included verbatim in a report.
pub const SAMPLE_SIZE: usize = 10;

/// Reporting period label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl ReportPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Week => "7d",
            ReportPeriod::Month => "30d",
            ReportPeriod::Quarter => "90d",
            ReportPeriod::Year => "1y",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(ReportPeriod::Week),
            "30d" => Ok(ReportPeriod::Month),
            "90d" => Ok(ReportPeriod::Quarter),
            "1y" => Ok(ReportPeriod::Year),
            other => Err(ValidationError::InvalidValue {
                field: "report period",
                value: other.to_string(),
                expected: "7d, 30d, 90d, 1y",
            }),
        }
    }
}

impl Serialize for ReportPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub total_issues: usize,
    pub resolved_issues: usize,
    pub critical_issues: usize,
    /// Resolved share of all issues, as a rounded percentage
    pub compliance_score: u32,
}

impl ReportMetrics {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let resolved = issues
            .iter()
            .filter(|i| i.status == IssueStatus::Resolved)
            .count();
        let critical = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();

        Self {
            total_issues: issues.len(),
            resolved_issues: resolved,
            critical_issues: critical,
            compliance_score: compliance_score(resolved, issues.len()),
        }
    }
}

/// `round(resolved / max(total, 1) * 100)`
pub fn compliance_score(resolved: usize, total: usize) -> u32 {
    let ratio = resolved as f64 / total.max(1) as f64;
    (ratio * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Scope label ("All Projects" or the project name)
    pub project: String,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub metrics: ReportMetrics,
    /// The first [`SAMPLE_SIZE`] scoped issues, in stored order
    pub issues: Vec<Issue>,
}

impl ComplianceReport {
    /// `accessibility-report-<epoch millis>.json`
    pub fn filename(&self) -> String {
        format!(
            "accessibility-report-{}.json",
            self.generated_at.timestamp_millis()
        )
    }

    /// Render as a JSON file ready for [`crate::CommandExecutor::write_export`].
    pub fn to_artifact(&self) -> Result<ExportArtifact> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        Ok(ExportArtifact {
            format: ExportFormat::Json,
            filename: self.filename(),
            content,
            issue_count: self.metrics.total_issues,
        })
    }
}

/// Build a report over the issues in `scope`.
pub fn build_report(
    issues: &[Issue],
    projects: &[Project],
    scope: &ProjectScope,
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> ComplianceReport {
    let scoped: Vec<Issue> = issues
        .iter()
        .filter(|issue| scope.contains(issue))
        .cloned()
        .collect();
    let lookup = ProjectLookup::new(projects);

    ComplianceReport {
        project: scope_label(scope, &lookup),
        period,
        generated_at: now,
        metrics: ReportMetrics::from_issues(&scoped),
        issues: scoped.into_iter().take(SAMPLE_SIZE).collect(),
    }
}
