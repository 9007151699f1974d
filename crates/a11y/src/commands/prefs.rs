//! View preferences

use super::*;
use crate::domain::queries::{SortKey, SortOrder};
use crate::domain::Severity;
use crate::state::ViewMode;

/// Partial preference change. `None` leaves a field alone.
///
/// The filters are doubly optional: `Some(None)` resets the filter to "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub severity_filter: Option<Option<Severity>>,
    pub status_filter: Option<Option<IssueStatus>>,
    pub type_filter: Option<Option<String>>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
    pub show_all_projects: Option<bool>,
    pub view_mode: Option<ViewMode>,
}

impl PreferencesUpdate {
    fn apply(self, prefs: &mut Preferences) {
        if let Some(severity) = self.severity_filter {
            prefs.severity_filter = severity;
        }
        if let Some(status) = self.status_filter {
            prefs.status_filter = status;
        }
        if let Some(issue_type) = self.type_filter {
            prefs.type_filter = issue_type;
        }
        if let Some(key) = self.sort_by {
            prefs.sort_by = key;
        }
        if let Some(order) = self.sort_order {
            prefs.sort_order = order;
        }
        if let Some(all) = self.show_all_projects {
            prefs.show_all_projects = all;
        }
        if let Some(mode) = self.view_mode {
            prefs.view_mode = mode;
        }
    }
}

impl<S: StateStore> CommandExecutor<S> {
    pub fn preferences(&self) -> &Preferences {
        &self.state.preferences
    }

    pub fn set_preferences(&mut self, update: PreferencesUpdate) -> Result<Preferences> {
        update.apply(&mut self.state.preferences);
        self.storage
            .save_preferences(&self.state.preferences)
            .context("Failed to save preferences")?;

        tracing::debug!(preferences = ?self.state.preferences, "updated preferences");
        Ok(self.state.preferences.clone())
    }
}
