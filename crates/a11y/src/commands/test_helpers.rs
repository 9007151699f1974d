//! Test helper functions for command tests.

use crate::commands::CommandExecutor;
use crate::domain::{NewIssue, Severity};
use crate::storage::{InMemoryStorage, StateStore};

/// Executor over fresh in-memory storage, loaded with seed data.
pub fn setup() -> CommandExecutor<InMemoryStorage> {
    let storage = InMemoryStorage::new();
    storage.init().unwrap();
    CommandExecutor::new(storage).unwrap()
}

/// Valid form input for a new issue in `project_id`.
pub fn new_issue(project_id: &str) -> NewIssue {
    NewIssue {
        title: "Button has no accessible name".to_string(),
        description: "Icon-only close button is announced as \"button\".".to_string(),
        severity: Severity::Medium,
        issue_type: "ARIA".to_string(),
        element: "<button class=\"close\"><svg/></button>".to_string(),
        location: "/account".to_string(),
        wcag_guideline: "WCAG 2.1 - 4.1.2 Name, Role, Value".to_string(),
        how_to_fix: "Add aria-label=\"Close\".".to_string(),
        project_id: project_id.to_string(),
    }
}
