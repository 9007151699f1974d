//! Storage abstraction layer for persisting tracker state.
//!
//! The tracker keeps a handful of flat records: the full issue collection,
//! the project list, the selected project id, the view preferences and the
//! notification read/dismissed markers. Each
//! record is read once at startup and rewritten wholesale after a mutation.
//!
//! Readers distinguish three outcomes: `Ok(Some(_))` for a stored value,
//! `Ok(None)` when nothing has been stored yet, and `Err(_)` when the stored
//! value cannot be read or parsed. Falling back to seed data is the caller's
//! job (see [`crate::state::AppState::load`]).

use crate::domain::{Issue, Project};
use crate::notifications::NotificationState;
use crate::state::Preferences;
use anyhow::Result;
use std::path::Path;

pub mod json;
pub mod memory;

pub use json::JsonFileStorage;
pub use memory::InMemoryStorage;

/// Trait for backends that persist tracker state.
///
/// Implementations must be `Clone` so a store handle can be shared between
/// the executor and tests.
///
/// # Examples
///
/// ```
/// use a11y::storage::{InMemoryStorage, StateStore};
///
/// let storage = InMemoryStorage::new();
/// storage.init().unwrap();
/// assert!(storage.load_issues().unwrap().is_none());
///
/// storage.save_selected_project("2").unwrap();
/// assert_eq!(storage.load_selected_project().unwrap().as_deref(), Some("2"));
/// ```
pub trait StateStore: Clone {
    /// Initialize the storage backend (idempotent).
    fn init(&self) -> Result<()>;

    /// Whether [`StateStore::init`] has been run.
    fn is_initialized(&self) -> bool;

    /// Load the issue collection.
    fn load_issues(&self) -> Result<Option<Vec<Issue>>>;

    /// Replace the stored issue collection.
    fn save_issues(&self, issues: &[Issue]) -> Result<()>;

    /// Load the project list.
    fn load_projects(&self) -> Result<Option<Vec<Project>>>;

    /// Replace the stored project list.
    fn save_projects(&self, projects: &[Project]) -> Result<()>;

    /// Load the selected project id.
    fn load_selected_project(&self) -> Result<Option<String>>;

    /// Persist the selected project id.
    fn save_selected_project(&self, project_id: &str) -> Result<()>;

    /// Load persisted view preferences.
    fn load_preferences(&self) -> Result<Option<Preferences>>;

    /// Persist view preferences.
    fn save_preferences(&self, preferences: &Preferences) -> Result<()>;

    /// Load notification read/dismissed markers.
    fn load_notification_state(&self) -> Result<Option<NotificationState>>;

    /// Persist notification read/dismissed markers.
    fn save_notification_state(&self, state: &NotificationState) -> Result<()>;

    /// Root directory of this backend.
    fn root(&self) -> &Path;

    /// Directory searched for `config.toml`, if the backend has one.
    fn config_dir(&self) -> Option<&Path> {
        Some(self.root())
    }
}
