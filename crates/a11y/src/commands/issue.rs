//! Issue listing, lookup and lifecycle operations

use super::*;
use crate::seed;

impl<S: StateStore> CommandExecutor<S> {
    /// Filter and sort the full issue collection.
    pub fn list_issues(&self, query: &IssueQuery) -> Vec<Issue> {
        queries::process_issues(&self.state.issues, query)
    }

    /// Look up an issue by exact id, or by a unique id prefix.
    pub fn show_issue(&self, id: &str) -> Result<&Issue, LookupError> {
        let index = self.resolve_issue_index(id)?;
        Ok(&self.state.issues[index])
    }

    fn resolve_issue_index(&self, id: &str) -> Result<usize, LookupError> {
        let id = id.trim();
        if let Some(index) = self.state.issues.iter().position(|i| i.id == id) {
            return Ok(index);
        }
        if id.is_empty() {
            return Err(LookupError::IssueNotFound(id.to_string()));
        }

        let candidates: Vec<usize> = self
            .state
            .issues
            .iter()
            .enumerate()
            .filter(|(_, issue)| issue.id_starts_with(id))
            .map(|(index, _)| index)
            .collect();

        match candidates.as_slice() {
            [index] => Ok(*index),
            [] => Err(LookupError::IssueNotFound(id.to_string())),
            many => Err(LookupError::AmbiguousIssueId {
                prefix: id.to_string(),
                matches: many
                    .iter()
                    .map(|&i| self.state.issues[i].id.clone())
                    .collect(),
            }),
        }
    }

    /// Validate and record a new issue.
    ///
    /// The issue is prepended to the collection and the owning project's
    /// issue count goes up by one. Nothing is written if validation fails.
    pub fn add_issue(&mut self, input: NewIssue, now: DateTime<Utc>) -> Result<Issue> {
        input.validate()?;
        let project_index = self
            .state
            .projects
            .iter()
            .position(|p| p.id == input.project_id)
            .ok_or_else(|| ValidationError::UnknownProject(input.project_id.clone()))?;

        let issue = Issue::from_new(input, now);
        self.state.issues.insert(0, issue.clone());
        self.state.projects[project_index].issue_count += 1;

        self.persist_issues()?;
        self.persist_projects()?;

        tracing::debug!(id = %issue.id, project = %issue.project_id, "added issue");
        Ok(issue)
    }

    pub fn update_issue_status(&mut self, id: &str, status: IssueStatus) -> Result<Issue> {
        let index = self.resolve_issue_index(id)?;
        let issue = &mut self.state.issues[index];
        let previous = issue.status;
        issue.status = status;
        let updated = issue.clone();

        self.persist_issues()?;

        tracing::debug!(id = %updated.id, from = %previous, to = %status, "changed issue status");
        Ok(updated)
    }

    /// Apply field edits to an issue.
    pub fn update_issue(&mut self, id: &str, edit: IssueEdit) -> Result<Issue> {
        let index = self.resolve_issue_index(id)?;
        if edit.is_empty() {
            return Ok(self.state.issues[index].clone());
        }

        edit.apply(&mut self.state.issues[index])?;
        let updated = self.state.issues[index].clone();

        self.persist_issues()?;

        tracing::debug!(id = %updated.id, "edited issue");
        Ok(updated)
    }

    /// Replace the issue collection with the seed data.
    ///
    /// Stands in for a rescan: project issue counts are recomputed and every
    /// project's `last_scan` is set to `now`. Returns the new issue count.
    pub fn refresh_issues(&mut self, now: DateTime<Utc>) -> Result<usize> {
        self.state.issues = seed::seed_issues();
        for project in &mut self.state.projects {
            project.issue_count = queries::count_for_project(&self.state.issues, &project.id);
            project.last_scan = now;
        }

        self.persist_issues()?;
        self.persist_projects()?;

        tracing::debug!(issues = self.state.issues.len(), "refreshed issues from seed data");
        Ok(self.state.issues.len())
    }
}
