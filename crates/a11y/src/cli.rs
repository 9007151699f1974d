//! Command-line interface definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Accessibility issue tracker
///
/// Tracks WCAG accessibility issues across monitored projects, with
/// filtering, fuzzy quick search, dashboard stats and CSV/JSON export.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or usage error
///   3  - Issue, project or notification not found
///   4  - Validation failed (missing required fields, unknown project)
///  10  - File system operation failed
#[derive(Parser)]
#[command(name = "a11y")]
#[command(about = "Accessibility issue tracker", long_about = None, version)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON ({success, data, metadata})
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and write the seed data to it
    Init,

    /// Issue management commands
    #[command(subcommand)]
    Issue(IssueCommands),

    /// Project management commands
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Dashboard counts by severity and status
    Stats {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Most recently detected issues
    Recent {
        /// Number of issues to show
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Fuzzy quick search across all projects
    Search {
        /// Search text (matched against title, description, location and type)
        query: String,
    },

    /// Export the filtered issue list as CSV or JSON
    Export {
        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        #[command(flatten)]
        view: ViewArgs,

        /// Directory to write the export file to (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the export to stdout instead of writing a file
        #[arg(long, conflicts_with = "output_dir")]
        stdout: bool,
    },

    /// Alerts derived from the current issues (lists them by default)
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationCommands>,
    },

    /// Compliance report: resolved share, critical count and sample issues
    Report {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Reporting period label (7d, 30d, 90d, 1y)
        #[arg(long, default_value = "30d")]
        period: String,

        /// Directory to write the report file to (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Write the report as a JSON file
        #[arg(long)]
        save: bool,
    },

    /// View preference commands
    #[command(subcommand)]
    Prefs(PrefsCommands),
}

/// Project scope flags shared by read commands
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Include issues from all projects
    #[arg(short, long, conflicts_with = "project")]
    pub all: bool,

    /// Limit to one project (default: the selected project)
    #[arg(short, long)]
    pub project: Option<String>,
}

/// Filter and sort flags for issue views.
///
/// Unset flags fall back to the saved preferences.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Case-insensitive text to find in title, description or location
    #[arg(short, long)]
    pub search: Option<String>,

    /// Severity filter (all, critical, high, medium, low)
    #[arg(long)]
    pub severity: Option<String>,

    /// Status filter (all, new, in-progress, resolved, ignored)
    #[arg(long)]
    pub status: Option<String>,

    /// Issue type filter, exact match (all, Images, Forms, ...)
    #[arg(long = "type")]
    pub issue_type: Option<String>,

    /// Sort key (severity, title, lastDetected)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order (asc, desc)
    #[arg(long)]
    pub order: Option<String>,
}

#[derive(Subcommand)]
pub enum IssueCommands {
    /// List issues
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show issue details
    Show {
        /// Issue ID or unique prefix
        id: String,
    },

    /// Report a new issue
    Add {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short = 'd', long, default_value = "")]
        description: String,

        /// Severity (critical, high, medium, low)
        #[arg(long, default_value = "medium")]
        severity: String,

        /// Category, e.g. "Images" or "Forms"
        #[arg(long = "type", default_value = "")]
        issue_type: String,

        /// Offending markup snippet
        #[arg(short, long, default_value = "")]
        element: String,

        /// Page path or identifier
        #[arg(short, long, default_value = "")]
        location: String,

        /// WCAG success criterion reference
        #[arg(long, default_value = "")]
        wcag: String,

        /// Remediation guidance
        #[arg(long, default_value = "")]
        how_to_fix: String,

        /// Owning project (default: the selected project)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Change an issue's status
    Status {
        id: String,

        /// New status (new, in-progress, resolved, ignored)
        status: String,
    },

    /// Edit issue fields
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'd', long)]
        description: Option<String>,

        #[arg(long)]
        severity: Option<String>,

        #[arg(long = "type")]
        issue_type: Option<String>,

        #[arg(short, long)]
        element: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        wcag: Option<String>,

        #[arg(long)]
        how_to_fix: Option<String>,
    },

    /// Rescan: reset issues to the built-in sample set
    Refresh,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        /// Case-insensitive text to find in name or URL
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Add a project
    Add {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long, default_value = "")]
        url: String,

        /// Select the new project after adding it
        #[arg(long)]
        select: bool,
    },

    /// Select the project issue views default to
    Select { id: String },

    /// Show a project (default: the selected project)
    Show { id: Option<String> },
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List current notifications
    List,

    /// Mark a notification as read
    Read { id: String },

    /// Dismiss every current notification
    Clear,
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show saved view preferences
    Show,

    /// Change saved view preferences
    Set {
        /// Default severity filter (all, critical, high, medium, low)
        #[arg(long)]
        severity: Option<String>,

        /// Default status filter (all, new, in-progress, resolved, ignored)
        #[arg(long)]
        status: Option<String>,

        /// Default issue type filter (all, or an exact type such as Images)
        #[arg(long = "type")]
        issue_type: Option<String>,

        /// Default sort key (severity, title, lastDetected)
        #[arg(long)]
        sort: Option<String>,

        /// Default sort order (asc, desc)
        #[arg(long)]
        order: Option<String>,

        /// Show issues from all projects by default
        #[arg(long)]
        show_all_projects: Option<bool>,

        /// Listing layout (grid, list)
        #[arg(long)]
        view: Option<String>,
    },
}

impl Commands {
    /// Command path reported in JSON metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init => "init",
            Commands::Issue(cmd) => match cmd {
                IssueCommands::List { .. } => "issue list",
                IssueCommands::Show { .. } => "issue show",
                IssueCommands::Add { .. } => "issue add",
                IssueCommands::Status { .. } => "issue status",
                IssueCommands::Edit { .. } => "issue edit",
                IssueCommands::Refresh => "issue refresh",
            },
            Commands::Project(cmd) => match cmd {
                ProjectCommands::List { .. } => "project list",
                ProjectCommands::Add { .. } => "project add",
                ProjectCommands::Select { .. } => "project select",
                ProjectCommands::Show { .. } => "project show",
            },
            Commands::Stats { .. } => "stats",
            Commands::Recent { .. } => "recent",
            Commands::Search { .. } => "search",
            Commands::Export { .. } => "export",
            Commands::Notifications { action } => match action {
                None | Some(NotificationCommands::List) => "notifications list",
                Some(NotificationCommands::Read { .. }) => "notifications read",
                Some(NotificationCommands::Clear) => "notifications clear",
            },
            Commands::Report { .. } => "report",
            Commands::Prefs(cmd) => match cmd {
                PrefsCommands::Show => "prefs show",
                PrefsCommands::Set { .. } => "prefs set",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_list_flags() {
        let cli = Cli::try_parse_from([
            "a11y", "issue", "list", "--all", "--severity", "critical", "--sort", "title",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.command.name(), "issue list");
        match cli.command {
            Commands::Issue(IssueCommands::List { view }) => {
                assert!(view.scope.all);
                assert_eq!(view.severity.as_deref(), Some("critical"));
                assert_eq!(view.sort.as_deref(), Some("title"));
            }
            _ => panic!("expected issue list"),
        }
    }

    #[test]
    fn test_notifications_defaults_to_list() {
        let cli = Cli::try_parse_from(["a11y", "notifications"]).unwrap();
        assert_eq!(cli.command.name(), "notifications list");

        let cli = Cli::try_parse_from(["a11y", "notifications", "read", "critical-1"]).unwrap();
        assert_eq!(cli.command.name(), "notifications read");
    }

    #[test]
    fn test_parse_type_filter_and_report_flags() {
        let cli = Cli::try_parse_from(["a11y", "issue", "list", "--type", "Color Contrast"]).unwrap();
        match cli.command {
            Commands::Issue(IssueCommands::List { view }) => {
                assert_eq!(view.issue_type.as_deref(), Some("Color Contrast"));
            }
            _ => panic!("expected issue list"),
        }

        let cli = Cli::try_parse_from(["a11y", "report", "--all", "--period", "7d", "--save"]).unwrap();
        match cli.command {
            Commands::Report { scope, period, save, .. } => {
                assert!(scope.all);
                assert_eq!(period, "7d");
                assert!(save);
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_all_conflicts_with_project() {
        let result = Cli::try_parse_from(["a11y", "stats", "--all", "--project", "1"]);
        assert!(result.is_err());
    }
}
