//! In-memory working set and view preferences.
//!
//! [`AppState`] is loaded once from a [`StateStore`] and then mutated by the
//! command executor. Loading never fails: anything missing or unreadable is
//! replaced with seed data or defaults, and a warning is logged.

use crate::domain::queries::{IssueFilter, IssueQuery, ProjectScope, SortKey, SortOrder};
use crate::domain::{Issue, IssueStatus, Project, Severity};
use crate::notifications::NotificationState;
use crate::seed;
use crate::storage::StateStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Layout preference for issue listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(ValidationError::InvalidValue {
                field: "view mode",
                value: other.to_string(),
                expected: "grid, list",
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

/// Persisted view preferences.
///
/// These seed the default list query; explicit command-line flags override
/// them for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// `None` shows every severity
    pub severity_filter: Option<Severity>,
    /// `None` shows every status
    pub status_filter: Option<IssueStatus>,
    /// `None` shows every issue type
    pub type_filter: Option<String>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Ignore the selected project and show issues from all projects
    pub show_all_projects: bool,
    pub view_mode: ViewMode,
}

/// Everything the tracker works with, held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub issues: Vec<Issue>,
    pub projects: Vec<Project>,
    pub selected_project: Option<String>,
    pub preferences: Preferences,
    pub notifications: NotificationState,
}

impl AppState {
    /// Fresh state built from the seed data.
    pub fn seeded() -> Self {
        let projects = seed::seed_projects();
        let selected_project = projects.first().map(|p| p.id.clone());
        Self {
            issues: seed::seed_issues(),
            projects,
            selected_project,
            preferences: Preferences::default(),
            notifications: NotificationState::default(),
        }
    }

    /// Load state from storage, falling back record by record.
    pub fn load<S: StateStore>(store: &S) -> Self {
        let issues = match store.load_issues() {
            Ok(Some(issues)) => issues,
            Ok(None) => seed::seed_issues(),
            Err(err) => {
                tracing::warn!("stored issues unreadable, using seed data: {:#}", err);
                seed::seed_issues()
            }
        };

        let projects = match store.load_projects() {
            Ok(Some(projects)) => projects,
            Ok(None) => seed::seed_projects(),
            Err(err) => {
                tracing::warn!("stored projects unreadable, using seed data: {:#}", err);
                seed::seed_projects()
            }
        };

        let stored_selection = store.load_selected_project().unwrap_or_else(|err| {
            tracing::warn!("stored project selection unreadable: {:#}", err);
            None
        });
        let selected_project = match stored_selection {
            Some(id) if projects.iter().any(|p| p.id == id) => Some(id),
            other => {
                if let Some(id) = other {
                    tracing::warn!("selected project {} no longer exists", id);
                }
                projects.first().map(|p| p.id.clone())
            }
        };

        let preferences = match store.load_preferences() {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("stored preferences unreadable, using defaults: {:#}", err);
                Preferences::default()
            }
        };

        let notifications = match store.load_notification_state() {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("stored notification state unreadable, resetting: {:#}", err);
                NotificationState::default()
            }
        };

        tracing::debug!(
            issues = issues.len(),
            projects = projects.len(),
            "loaded tracker state"
        );

        Self {
            issues,
            projects,
            selected_project,
            preferences,
            notifications,
        }
    }

    pub fn current_project(&self) -> Option<&Project> {
        let id = self.selected_project.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Scope implied by the preferences and selected project.
    ///
    /// With no selected project (an empty project list) the scope widens to
    /// all projects.
    pub fn default_scope(&self) -> ProjectScope {
        match (&self.selected_project, self.preferences.show_all_projects) {
            (Some(id), false) => ProjectScope::Project(id.clone()),
            _ => ProjectScope::All,
        }
    }

    /// List query implied by the preferences, with no search text.
    pub fn default_query(&self) -> IssueQuery {
        IssueQuery {
            filter: IssueFilter {
                scope: self.default_scope(),
                search: String::new(),
                severity: self.preferences.severity_filter,
                status: self.preferences.status_filter,
                issue_type: self.preferences.type_filter.clone(),
            },
            sort_key: self.preferences.sort_by,
            sort_order: self.preferences.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    #[test]
    fn test_empty_store_loads_seed() {
        let store = InMemoryStorage::new();
        let state = AppState::load(&store);

        assert_eq!(state, AppState::seeded());
        assert_eq!(state.selected_project.as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_selection_falls_back_to_first_project() {
        let store = InMemoryStorage::new();
        store.save_selected_project("does-not-exist").unwrap();

        let state = AppState::load(&store);
        assert_eq!(state.selected_project.as_deref(), Some("1"));
    }

    #[test]
    fn test_stored_selection_is_kept() {
        let store = InMemoryStorage::new();
        store.save_selected_project("3").unwrap();

        let state = AppState::load(&store);
        assert_eq!(state.current_project().map(|p| p.id.as_str()), Some("3"));
        assert_eq!(state.default_scope(), ProjectScope::Project("3".to_string()));
    }

    #[test]
    fn test_show_all_projects_widens_scope() {
        let store = InMemoryStorage::new();
        store
            .save_preferences(&Preferences {
                show_all_projects: true,
                severity_filter: Some(Severity::High),
                ..Default::default()
            })
            .unwrap();

        let state = AppState::load(&store);
        let query = state.default_query();
        assert_eq!(query.filter.scope, ProjectScope::All);
        assert_eq!(query.filter.severity, Some(Severity::High));
    }

    #[test]
    fn test_preferences_tolerate_missing_fields() {
        let prefs: Preferences = serde_json::from_str(r#"{"sortBy":"title"}"#).unwrap();
        assert_eq!(prefs.sort_by, SortKey::Title);
        assert_eq!(prefs.sort_order, SortOrder::Desc);
        assert_eq!(prefs.view_mode, ViewMode::Grid);
    }
}
