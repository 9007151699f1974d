//! JSON file-based storage implementation.
//!
//! Each record lives in its own file under the data directory. All writes
//! are atomic (write to a temp file, then rename).

use crate::domain::{Issue, Project};
use crate::notifications::NotificationState;
use crate::state::Preferences;
use crate::storage::StateStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ISSUES_FILE: &str = "issues.json";
const PROJECTS_FILE: &str = "projects.json";
const CURRENT_PROJECT_FILE: &str = "current_project";
const PREFERENCES_FILE: &str = "preferences.json";
const NOTIFICATIONS_FILE: &str = "notifications.json";

/// JSON file storage rooted at a data directory (normally `.a11y/`).
#[derive(Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Create a new JSON file storage instance at the given root path
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        self.init()?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temporary file to {}", path.display()))?;
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        self.write_atomic(&self.root.join(file), &json)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<Option<T>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;
        Ok(Some(value))
    }
}

impl StateStore for JsonFileStorage {
    fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create data directory: {}", self.root.display())
        })?;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    fn load_issues(&self) -> Result<Option<Vec<Issue>>> {
        self.read_json(ISSUES_FILE)
    }

    fn save_issues(&self, issues: &[Issue]) -> Result<()> {
        self.write_json(ISSUES_FILE, issues)
    }

    fn load_projects(&self) -> Result<Option<Vec<Project>>> {
        self.read_json(PROJECTS_FILE)
    }

    fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.write_json(PROJECTS_FILE, projects)
    }

    fn load_selected_project(&self) -> Result<Option<String>> {
        let path = self.root.join(CURRENT_PROJECT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let id = contents.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    fn save_selected_project(&self, project_id: &str) -> Result<()> {
        self.write_atomic(&self.root.join(CURRENT_PROJECT_FILE), project_id)
    }

    fn load_preferences(&self) -> Result<Option<Preferences>> {
        self.read_json(PREFERENCES_FILE)
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.write_json(PREFERENCES_FILE, preferences)
    }

    fn load_notification_state(&self) -> Result<Option<NotificationState>> {
        self.read_json(NOTIFICATIONS_FILE)
    }

    fn save_notification_state(&self, state: &NotificationState) -> Result<()> {
        self.write_json(NOTIFICATIONS_FILE, state)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
