//! CSV and JSON export of the current issue view

use super::*;
use crate::export::{self, ExportArtifact, ExportFormat};
use std::fs;
use std::path::{Path, PathBuf};

impl<S: StateStore> CommandExecutor<S> {
    /// Export the issues selected by `query`.
    ///
    /// The query's project scope also decides the filename and the JSON
    /// `project` label.
    pub fn export(
        &self,
        format: ExportFormat,
        query: &IssueQuery,
        now: DateTime<Utc>,
    ) -> Result<ExportArtifact> {
        let issues = queries::process_issues(&self.state.issues, query);
        export::build_export(
            &issues,
            &self.state.projects,
            &query.filter.scope,
            format,
            now,
        )
    }

    /// Write an export into `dir`, or the configured output directory.
    pub fn write_export(&self, artifact: &ExportArtifact, dir: Option<&Path>) -> Result<PathBuf> {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export().output_dir());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

        let path = dir.join(&artifact.filename);
        fs::write(&path, &artifact.content)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            format = %artifact.format,
            issues = artifact.issue_count,
            "wrote export"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_helpers::setup;
    use crate::domain::queries::{IssueFilter, IssueQuery, ProjectScope, SortKey, SortOrder};
    use crate::domain::Severity;
    use crate::export::ExportFormat;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn all_projects() -> IssueQuery {
        IssueQuery {
            filter: IssueFilter {
                scope: ProjectScope::All,
                ..Default::default()
            },
            sort_key: SortKey::Severity,
            sort_order: SortOrder::Desc,
        }
    }

    #[test]
    fn test_export_json_covers_query_results() {
        let executor = setup();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let artifact = executor
            .export(ExportFormat::Json, &all_projects(), now)
            .unwrap();

        assert_eq!(artifact.filename, "accessibility-issues-all-projects-2024-02-01.json");
        let value: serde_json::Value = serde_json::from_str(&artifact.content).unwrap();
        assert_eq!(value["totalIssues"], 12);
        assert_eq!(value["project"], "All Projects");
        assert_eq!(value["issues"][0]["severity"], "critical");
    }

    #[test]
    fn test_export_csv_respects_filter() {
        let executor = setup();
        let mut query = all_projects();
        query.filter.severity = Some(Severity::Critical);

        let artifact = executor
            .export(ExportFormat::Csv, &query, Utc::now())
            .unwrap();

        assert_eq!(artifact.issue_count, 2);
        assert_eq!(artifact.content.lines().count(), 3);
    }

    #[test]
    fn test_write_export_to_directory() {
        let executor = setup();
        let temp = TempDir::new().unwrap();
        let artifact = executor
            .export(ExportFormat::Csv, &all_projects(), Utc::now())
            .unwrap();

        let path = executor
            .write_export(&artifact, Some(&temp.path().join("reports")))
            .unwrap();

        assert!(path.ends_with(&artifact.filename));
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.content);
    }
}
