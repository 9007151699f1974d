//! Quick search, dashboard stats and recent activity

use super::*;
use crate::domain::queries::IssueStats;
use crate::search::{self, SearchHit};
use serde::Serialize;

/// Issue counts for a scope plus the number of monitored projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStats {
    #[serde(flatten)]
    pub issues: IssueStats,
    pub projects_scanned: usize,
}

impl<S: StateStore> CommandExecutor<S> {
    /// Fuzzy-ranked issues across all projects.
    pub fn quick_search(&self, query: &str) -> Vec<SearchHit> {
        search::quick_search(&self.state.issues, query, self.config.search().options())
    }

    pub fn stats(&self, scope: &ProjectScope) -> TrackerStats {
        let scoped: Vec<Issue> = self
            .state
            .issues
            .iter()
            .filter(|issue| scope.contains(issue))
            .cloned()
            .collect();

        TrackerStats {
            issues: queries::aggregate(&scoped),
            projects_scanned: self.state.projects.len(),
        }
    }

    /// The `limit` most recently detected issues in a scope.
    pub fn recent_issues(&self, scope: &ProjectScope, limit: usize) -> Vec<Issue> {
        queries::query_recent(&self.state.issues, scope, limit)
    }
}
