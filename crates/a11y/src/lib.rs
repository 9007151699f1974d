//! Accessibility Issue Tracker Library
//!
//! Core functionality for tracking WCAG accessibility issues: the issue query
//! engine (filter, sort, aggregate), fuzzy quick search, CSV/JSON export,
//! compliance reports and persisted tracker state. Used by the `a11y` binary and by the tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod notifications;
pub mod output;
pub mod report;
pub mod search;
pub mod seed;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use commands::CommandExecutor;
pub use domain::queries::{IssueFilter, IssueQuery, ProjectScope, SortKey, SortOrder};
pub use domain::{Issue, IssueStatus, Project, Severity};
pub use output::{ExitCode, JsonError, JsonOutput};
pub use storage::{InMemoryStorage, JsonFileStorage, StateStore};
