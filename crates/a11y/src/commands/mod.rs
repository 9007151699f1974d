//! Command execution logic for all CLI operations.
//!
//! The `CommandExecutor` owns the in-memory [`AppState`] and writes each
//! mutated record back through the storage backend.
//!
//! This module is organized into submodules by functional area:
//! - `issue`: Issue listing, lookup and edits
//! - `project`: Project management and selection
//! - `search`: Quick search, stats and recent activity
//! - `export`: CSV/JSON export
//! - `prefs`: View preferences
//! - `notifications`: Derived alerts and their read/dismissed state
//! - `report`: Compliance report

mod export;
mod issue;
mod notifications;
mod prefs;
mod project;
mod report;
mod search;

#[cfg(test)]
pub mod test_helpers;

pub use prefs::PreferencesUpdate;
pub use search::TrackerStats;

// Common imports used across modules
use crate::config::TrackerConfig;
use crate::domain::queries::{self, IssueQuery, ProjectScope};
use crate::domain::{Issue, IssueEdit, IssueStatus, NewIssue, NewProject, Project};
use crate::errors::{LookupError, ValidationError};
use crate::state::{AppState, Preferences};
use crate::storage::StateStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Executes CLI commands against the loaded tracker state.
///
/// Generic over storage backend to support different implementations
/// (JSON files, in-memory).
pub struct CommandExecutor<S: StateStore> {
    storage: S,
    state: AppState,
    config: TrackerConfig,
}

impl<S: StateStore> CommandExecutor<S> {
    /// Load state and configuration from the given storage.
    ///
    /// Unreadable state falls back to seed data; a malformed `config.toml`
    /// is an error. Backends without a config directory use defaults.
    pub fn new(storage: S) -> Result<Self> {
        let config = match storage.config_dir() {
            Some(dir) => TrackerConfig::load(dir)?,
            None => TrackerConfig::default(),
        };
        let state = AppState::load(&storage);
        Ok(Self {
            storage,
            state,
            config,
        })
    }

    /// Get reference to the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Create the data directory and write the current state to it.
    pub fn init(&self) -> Result<()> {
        self.storage.init()?;
        self.persist_issues()?;
        self.persist_projects()?;
        if let Some(id) = &self.state.selected_project {
            self.storage.save_selected_project(id)?;
        }
        self.storage.save_preferences(&self.state.preferences)?;
        self.storage.save_notification_state(&self.state.notifications)?;
        tracing::debug!(root = %self.storage.root().display(), "initialized data directory");
        Ok(())
    }

    fn persist_issues(&self) -> Result<()> {
        self.storage
            .save_issues(&self.state.issues)
            .context("Failed to save issues")
    }

    fn persist_projects(&self) -> Result<()> {
        self.storage
            .save_projects(&self.state.projects)
            .context("Failed to save projects")
    }

    /// Resolve a project scope flag pair into a scope.
    ///
    /// `all` wins; otherwise an explicit project id must exist; otherwise
    /// the preference-derived default applies.
    pub fn resolve_scope(&self, all: bool, project: Option<&str>) -> Result<ProjectScope> {
        if all {
            return Ok(ProjectScope::All);
        }
        match project {
            Some(id) => {
                let project = self.find_project(id)?;
                Ok(ProjectScope::Project(project.id.clone()))
            }
            None => Ok(self.state.default_scope()),
        }
    }

    fn find_project(&self, id: &str) -> Result<&Project, LookupError> {
        self.state
            .find_project(id)
            .ok_or_else(|| LookupError::ProjectNotFound(id.to_string()))
    }
}
