//! In-memory storage implementation for testing.
//!
//! Stores every record in RAM. Each instance is isolated; clones share the
//! same data through `Rc<RefCell<_>>`. Nothing touches the file system,
//! including configuration.

use crate::domain::{Issue, Project};
use crate::notifications::NotificationState;
use crate::state::Preferences;
use crate::storage::StateStore;
use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Default)]
struct Records {
    initialized: bool,
    issues: Option<Vec<Issue>>,
    projects: Option<Vec<Project>>,
    selected_project: Option<String>,
    preferences: Option<Preferences>,
    notification_state: Option<NotificationState>,
}

/// In-memory storage backend.
///
/// All data is lost when the last clone is dropped.
#[derive(Clone)]
pub struct InMemoryStorage {
    records: Rc<RefCell<Records>>,
    root: PathBuf,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            records: Rc::new(RefCell::new(Records::default())),
            root: PathBuf::from(":memory:"),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStorage {
    fn init(&self) -> Result<()> {
        self.records.borrow_mut().initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.records.borrow().initialized
    }

    fn load_issues(&self) -> Result<Option<Vec<Issue>>> {
        Ok(self.records.borrow().issues.clone())
    }

    fn save_issues(&self, issues: &[Issue]) -> Result<()> {
        self.records.borrow_mut().issues = Some(issues.to_vec());
        Ok(())
    }

    fn load_projects(&self) -> Result<Option<Vec<Project>>> {
        Ok(self.records.borrow().projects.clone())
    }

    fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.records.borrow_mut().projects = Some(projects.to_vec());
        Ok(())
    }

    fn load_selected_project(&self) -> Result<Option<String>> {
        Ok(self.records.borrow().selected_project.clone())
    }

    fn save_selected_project(&self, project_id: &str) -> Result<()> {
        self.records.borrow_mut().selected_project = Some(project_id.to_string());
        Ok(())
    }

    fn load_preferences(&self) -> Result<Option<Preferences>> {
        Ok(self.records.borrow().preferences.clone())
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.records.borrow_mut().preferences = Some(preferences.clone());
        Ok(())
    }

    fn load_notification_state(&self) -> Result<Option<NotificationState>> {
        Ok(self.records.borrow().notification_state.clone())
    }

    fn save_notification_state(&self, state: &NotificationState) -> Result<()> {
        self.records.borrow_mut().notification_state = Some(state.clone());
        Ok(())
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn config_dir(&self) -> Option<&Path> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_clones_share_data() {
        let storage = InMemoryStorage::new();
        let other = storage.clone();

        storage.save_issues(&seed::seed_issues()).unwrap();
        assert_eq!(other.load_issues().unwrap().map(|i| i.len()), Some(12));
    }

    #[test]
    fn test_has_no_config_dir() {
        let storage = InMemoryStorage::new();
        assert!(storage.config_dir().is_none());
        assert!(!storage.root().exists());
    }

    #[test]
    fn test_instances_are_isolated() {
        let a = InMemoryStorage::new();
        let b = InMemoryStorage::new();

        a.save_selected_project("1").unwrap();
        assert!(b.load_selected_project().unwrap().is_none());
    }
}
