//! Accessibility Issue Tracker
//!
//! A repository-local CLI for tracking WCAG accessibility issues across
//! monitored projects.
//!
//! # Features
//!
//! - Project-scoped filtering, text search and stable sorting
//! - Fuzzy quick search ranked by similarity
//! - Dashboard counts, compliance reports and derived notifications
//! - CSV and JSON export

// Binary-specific module (not in library)
mod output_macros;

use a11y::cli::{
    Cli, Commands, IssueCommands, NotificationCommands, PrefsCommands, ProjectCommands, ViewArgs,
};
use a11y::commands::{CommandExecutor, PreferencesUpdate};
use a11y::domain::queries::{self, IssueQuery, ProjectScope};
use a11y::domain::{Issue, IssueEdit, NewIssue, NewProject, Project};
use a11y::errors::{explain_lookup, explain_validation, LookupError, ValidationError};
use a11y::export::ExportFormat;
use a11y::notifications::Notification;
use a11y::output::{ExitCode, JsonError, OutputContext};
use a11y::report::ReportPeriod;
use a11y::state::ViewMode;
use a11y::storage::{JsonFileStorage, StateStore};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::env;
use tracing_subscriber::EnvFilter;

/// Route log output to stderr, filtered by `A11Y_LOG` (or `RUST_LOG`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("A11Y_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Human-readable rendering of a command failure.
fn describe_error(error: &anyhow::Error) -> String {
    if let Some(err) = error.downcast_ref::<LookupError>() {
        return explain_lookup(err).to_string();
    }
    if let Some(err) = error.downcast_ref::<ValidationError>() {
        return explain_validation(err).to_string();
    }
    format!("Error: {:#}", error)
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    let command = cli.command.name();

    let exit_code = match run(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let report = JsonError::from_error(&e, command);
            if json {
                match report.to_json_string() {
                    Ok(s) => println!("{}", s),
                    Err(_) => eprintln!("Error: {:#}", e),
                }
            } else {
                eprintln!("{}", describe_error(&e));
            }
            report.exit_code()
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let current_dir = env::current_dir()?;

    // Data directory: A11Y_DATA_DIR env var or default to .a11y/
    let data_dir = match env::var("A11Y_DATA_DIR") {
        Ok(custom_dir) => current_dir.join(custom_dir),
        Err(_) => current_dir.join(".a11y"),
    };

    let storage = JsonFileStorage::new(&data_dir);
    let mut executor = CommandExecutor::new(storage)?;
    let ctx = OutputContext::new(cli.quiet, cli.json);
    let command = cli.command.name();

    match cli.command {
        Commands::Init => {
            executor.init()?;
            output_message!(ctx, command, "Initialized a11y tracker in {}", data_dir.display());
        }

        Commands::Issue(issue_cmd) => match issue_cmd {
            IssueCommands::List { view } => {
                let query = build_query(&executor, &view)?;
                let issues = executor.list_issues(&query);
                let layout = executor.preferences().view_mode;
                output_data!(
                    ctx,
                    command,
                    serde_json::json!({ "issues": issues, "count": issues.len() }),
                    {
                        if issues.is_empty() {
                            ctx.print_data("No issues match the current filters")?;
                        }
                        for issue in &issues {
                            print_issue_summary(&ctx, issue, &executor, layout)?;
                        }
                        ctx.print_success(format!("{} issue(s)", issues.len()))?;
                    }
                );
            }
            IssueCommands::Show { id } => {
                let issue = executor.show_issue(&id)?;
                let project_name = executor
                    .state()
                    .find_project(&issue.project_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(a11y::export::UNKNOWN_PROJECT);
                output_data!(ctx, command, issue, {
                    print_issue_details(&ctx, issue, project_name)?;
                });
            }
            IssueCommands::Add {
                title,
                description,
                severity,
                issue_type,
                element,
                location,
                wcag,
                how_to_fix,
                project,
            } => {
                let project_id = match project {
                    Some(id) => id,
                    None => executor
                        .state()
                        .selected_project
                        .clone()
                        .context("No project selected; pass --project")?,
                };
                let input = NewIssue {
                    title,
                    description,
                    severity: severity.parse()?,
                    issue_type,
                    element,
                    location,
                    wcag_guideline: wcag,
                    how_to_fix,
                    project_id,
                };
                let issue = executor.add_issue(input, Utc::now())?;
                output_data!(ctx, command, issue, {
                    ctx.print_success(format!("Added issue {}: {}", issue.id, issue.title))?;
                });
            }
            IssueCommands::Status { id, status } => {
                let issue = executor.update_issue_status(&id, status.parse()?)?;
                output_data!(ctx, command, issue, {
                    ctx.print_success(format!("Issue {} is now {}", issue.short_id(), issue.status))?;
                });
            }
            IssueCommands::Edit {
                id,
                title,
                description,
                severity,
                issue_type,
                element,
                location,
                wcag,
                how_to_fix,
            } => {
                let edit = IssueEdit {
                    title,
                    description,
                    severity: severity.map(|s| s.parse()).transpose()?,
                    issue_type,
                    element,
                    location,
                    wcag_guideline: wcag,
                    how_to_fix,
                };
                if edit.is_empty() {
                    ctx.print_warning("No fields to update")?;
                }
                let issue = executor.update_issue(&id, edit)?;
                output_data!(ctx, command, issue, {
                    ctx.print_success(format!("Updated issue {}", issue.short_id()))?;
                });
            }
            IssueCommands::Refresh => {
                let count = executor.refresh_issues(Utc::now())?;
                output_data!(ctx, command, serde_json::json!({ "count": count }), {
                    ctx.print_success(format!("Refreshed: {} issues detected", count))?;
                });
            }
        },

        Commands::Project(project_cmd) => match project_cmd {
            ProjectCommands::List { search } => {
                let projects = executor.list_projects(&search);
                let selected = executor.state().selected_project.clone();
                output_data!(
                    ctx,
                    command,
                    serde_json::json!({
                        "projects": projects,
                        "selected": selected,
                        "count": projects.len(),
                    }),
                    {
                        for project in &projects {
                            let marker = if selected.as_deref() == Some(project.id.as_str()) {
                                "*"
                            } else {
                                " "
                            };
                            ctx.print_data(format!(
                                "{} {:<10} {:<28} {:>4} issues  {:<8}  {}",
                                marker,
                                project.id,
                                project.name,
                                project.issue_count,
                                project.status,
                                project.url
                            ))?;
                        }
                    }
                );
            }
            ProjectCommands::Add { name, url, select } => {
                let mut project = executor.add_project(NewProject { name, url }, Utc::now())?;
                if select {
                    project = executor.select_project(&project.id)?;
                }
                output_data!(ctx, command, project, {
                    ctx.print_success(format!("Added project {}: {}", project.id, project.name))?;
                    if select {
                        ctx.print_success(format!("Selected {}", project.name))?;
                    }
                });
            }
            ProjectCommands::Select { id } => {
                let project = executor.select_project(&id)?;
                output_data!(ctx, command, project, {
                    ctx.print_success(format!("Selected {} ({})", project.name, project.id))?;
                });
            }
            ProjectCommands::Show { id } => {
                let project = executor.show_project(id.as_deref())?;
                output_data!(ctx, command, project, {
                    print_project(&ctx, project)?;
                });
            }
        },

        Commands::Stats { scope } => {
            let scope = executor.resolve_scope(scope.all, scope.project.as_deref())?;
            let stats = executor.stats(&scope);
            output_data!(ctx, command, stats, {
                ctx.print_data(format!("Scope:             {}", describe_scope(&executor, &scope)))?;
                ctx.print_data(format!("Total issues:      {}", stats.issues.total))?;
                ctx.print_data(format!("  Critical:        {}", stats.issues.critical))?;
                ctx.print_data(format!("  High:            {}", stats.issues.high))?;
                ctx.print_data(format!("  Medium:          {}", stats.issues.medium))?;
                ctx.print_data(format!("  Low:             {}", stats.issues.low))?;
                ctx.print_data(format!("  New:             {}", stats.issues.new))?;
                ctx.print_data(format!("  In progress:     {}", stats.issues.in_progress))?;
                ctx.print_data(format!("  Resolved:        {}", stats.issues.resolved))?;
                ctx.print_data(format!("  Ignored:         {}", stats.issues.ignored))?;
                ctx.print_data(format!("Projects scanned:  {}", stats.projects_scanned))?;
            });
        }

        Commands::Recent { limit, scope } => {
            let scope = executor.resolve_scope(scope.all, scope.project.as_deref())?;
            let issues = executor.recent_issues(&scope, limit);
            output_data!(
                ctx,
                command,
                serde_json::json!({ "issues": issues, "count": issues.len() }),
                {
                    for issue in &issues {
                        print_issue_summary(&ctx, issue, &executor, ViewMode::List)?;
                    }
                }
            );
        }

        Commands::Search { query } => {
            let hits = executor.quick_search(&query);
            output_data!(
                ctx,
                command,
                serde_json::json!({ "query": query, "results": hits, "count": hits.len() }),
                {
                    if hits.is_empty() {
                        ctx.print_data(format!("No results for \"{}\"", query))?;
                    }
                    for hit in &hits {
                        ctx.print_data(format!(
                            "{:.2}  {:<8}  [{:<8}] {}  ({})",
                            hit.score,
                            hit.issue.short_id(),
                            hit.issue.severity,
                            hit.issue.title,
                            hit.issue.location
                        ))?;
                    }
                }
            );
        }

        Commands::Export {
            format,
            view,
            output_dir,
            stdout,
        } => {
            let format: ExportFormat = format.parse()?;
            let query = build_query(&executor, &view)?;
            let artifact = executor.export(format, &query, Utc::now())?;

            if stdout {
                println!("{}", artifact.content);
            } else {
                let path = executor.write_export(&artifact, output_dir.as_deref())?;
                output_data!(
                    ctx,
                    command,
                    serde_json::json!({
                        "path": path,
                        "filename": artifact.filename,
                        "format": artifact.format.to_string(),
                        "issueCount": artifact.issue_count,
                    }),
                    {
                        ctx.print_success(format!(
                            "Exported {} issue(s) to {}",
                            artifact.issue_count,
                            path.display()
                        ))?;
                    }
                );
            }
        }

        Commands::Notifications { action } => match action {
            None | Some(NotificationCommands::List) => {
                let notes = executor.notifications(Utc::now())?;
                let unread = notes.iter().filter(|n| !n.read).count();
                output_data!(
                    ctx,
                    command,
                    serde_json::json!({
                        "notifications": notes,
                        "count": notes.len(),
                        "unread": unread,
                    }),
                    {
                        if notes.is_empty() {
                            ctx.print_data("No notifications")?;
                        }
                        for note in &notes {
                            print_notification(&ctx, note)?;
                        }
                        ctx.print_success(format!("{} unread", unread))?;
                    }
                );
            }
            Some(NotificationCommands::Read { id }) => {
                let note = executor.mark_notification_read(&id, Utc::now())?;
                output_data!(ctx, command, note, {
                    ctx.print_success(format!("Marked {} as read", note.id))?;
                });
            }
            Some(NotificationCommands::Clear) => {
                let cleared = executor.clear_notifications(Utc::now())?;
                output_data!(ctx, command, serde_json::json!({ "cleared": cleared }), {
                    ctx.print_success(format!("Cleared {} notification(s)", cleared))?;
                });
            }
        },

        Commands::Report {
            scope,
            period,
            output_dir,
            save,
        } => {
            let period: ReportPeriod = period.parse()?;
            let scope = executor.resolve_scope(scope.all, scope.project.as_deref())?;
            let report = executor.report(&scope, period, Utc::now());
            let path = if save || output_dir.is_some() {
                Some(executor.write_export(&report.to_artifact()?, output_dir.as_deref())?)
            } else {
                None
            };
            output_data!(
                ctx,
                command,
                serde_json::json!({ "report": report, "path": path }),
                {
                    let metrics = &report.metrics;
                    ctx.print_data(format!("Report:            {} ({})", report.project, report.period))?;
                    ctx.print_data(format!("Total issues:      {}", metrics.total_issues))?;
                    ctx.print_data(format!("Resolved:          {}", metrics.resolved_issues))?;
                    ctx.print_data(format!("Critical:          {}", metrics.critical_issues))?;
                    ctx.print_data(format!("Compliance score:  {}%", metrics.compliance_score))?;
                    if let Some(path) = &path {
                        ctx.print_success(format!("Wrote report to {}", path.display()))?;
                    }
                }
            );
        }

        Commands::Prefs(prefs_cmd) => match prefs_cmd {
            PrefsCommands::Show => {
                let prefs = executor.preferences();
                output_data!(ctx, command, prefs, {
                    print_preferences(&ctx, prefs)?;
                });
            }
            PrefsCommands::Set {
                severity,
                status,
                issue_type,
                sort,
                order,
                show_all_projects,
                view,
            } => {
                let update = PreferencesUpdate {
                    severity_filter: severity
                        .map(|s| queries::parse_severity_filter(&s))
                        .transpose()?,
                    status_filter: status
                        .map(|s| queries::parse_status_filter(&s))
                        .transpose()?,
                    type_filter: issue_type.map(|t| queries::parse_type_filter(&t)),
                    sort_by: sort.map(|s| s.parse()).transpose()?,
                    sort_order: order.map(|s| s.parse()).transpose()?,
                    show_all_projects,
                    view_mode: view.map(|s| s.parse()).transpose()?,
                };
                let prefs = executor.set_preferences(update)?;
                output_data!(ctx, command, prefs, {
                    print_preferences(&ctx, &prefs)?;
                });
            }
        },
    }

    Ok(())
}

/// Combine command-line view flags with the saved preferences.
fn build_query<S: StateStore>(executor: &CommandExecutor<S>, view: &ViewArgs) -> Result<IssueQuery> {
    let mut query = executor.state().default_query();
    query.filter.scope = executor.resolve_scope(view.scope.all, view.scope.project.as_deref())?;
    if let Some(search) = &view.search {
        query.filter.search = search.clone();
    }
    if let Some(severity) = &view.severity {
        query.filter.severity = queries::parse_severity_filter(severity)?;
    }
    if let Some(status) = &view.status {
        query.filter.status = queries::parse_status_filter(status)?;
    }
    if let Some(issue_type) = &view.issue_type {
        query.filter.issue_type = queries::parse_type_filter(issue_type);
    }
    if let Some(sort) = &view.sort {
        query.sort_key = sort.parse()?;
    }
    if let Some(order) = &view.order {
        query.sort_order = order.parse()?;
    }
    Ok(query)
}

fn describe_scope<S: StateStore>(executor: &CommandExecutor<S>, scope: &ProjectScope) -> String {
    match scope {
        ProjectScope::All => "All Projects".to_string(),
        ProjectScope::Project(id) => executor
            .state()
            .find_project(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.clone()),
    }
}

fn print_issue_summary<S: StateStore>(
    ctx: &OutputContext,
    issue: &Issue,
    executor: &CommandExecutor<S>,
    layout: ViewMode,
) -> Result<()> {
    match layout {
        ViewMode::List => {
            ctx.print_data(format!(
                "{:<8}  [{:<8}] {:<11} {}  ({})",
                issue.short_id(),
                issue.severity,
                issue.status,
                issue.title,
                issue.location
            ))?;
        }
        ViewMode::Grid => {
            let project = executor
                .state()
                .find_project(&issue.project_id)
                .map(|p| p.name.as_str())
                .unwrap_or(a11y::export::UNKNOWN_PROJECT);
            ctx.print_data(format!("{}  {}", issue.short_id(), issue.title))?;
            ctx.print_data(format!(
                "    {} | {} | {} | {}",
                issue.severity, issue.status, issue.issue_type, issue.location
            ))?;
            ctx.print_data(format!(
                "    {} | detected {}",
                project,
                issue.last_detected.format("%Y-%m-%d %H:%M")
            ))?;
        }
    }
    Ok(())
}

fn print_issue_details(ctx: &OutputContext, issue: &Issue, project_name: &str) -> Result<()> {
    ctx.print_data(format!("ID:             {}", issue.id))?;
    ctx.print_data(format!("Title:          {}", issue.title))?;
    ctx.print_data(format!("Severity:       {}", issue.severity))?;
    ctx.print_data(format!("Status:         {}", issue.status))?;
    ctx.print_data(format!("Type:           {}", issue.issue_type))?;
    ctx.print_data(format!("Location:       {}", issue.location))?;
    ctx.print_data(format!("Project:        {}", project_name))?;
    ctx.print_data(format!("Last detected:  {}", issue.last_detected.to_rfc3339()))?;
    if !issue.wcag_guideline.is_empty() {
        ctx.print_data(format!("WCAG:           {}", issue.wcag_guideline))?;
    }
    ctx.print_data(format!("\n{}", issue.description))?;
    if !issue.element.is_empty() {
        ctx.print_data(format!("\nElement:\n  {}", issue.element))?;
    }
    if !issue.how_to_fix.is_empty() {
        ctx.print_data(format!("\nHow to fix:\n  {}", issue.how_to_fix))?;
    }
    Ok(())
}

fn print_project(ctx: &OutputContext, project: &Project) -> Result<()> {
    ctx.print_data(format!("ID:         {}", project.id))?;
    ctx.print_data(format!("Name:       {}", project.name))?;
    ctx.print_data(format!("URL:        {}", project.url))?;
    ctx.print_data(format!("Status:     {}", project.status))?;
    ctx.print_data(format!("Issues:     {}", project.issue_count))?;
    ctx.print_data(format!("Last scan:  {}", project.last_scan.to_rfc3339()))?;
    Ok(())
}

fn print_notification(ctx: &OutputContext, note: &Notification) -> Result<()> {
    let marker = if note.read { " " } else { "*" };
    ctx.print_data(format!(
        "{} [{:?}] {}: {}  ({})",
        marker, note.kind, note.title, note.message, note.id
    ))?;
    Ok(())
}

fn print_preferences(ctx: &OutputContext, prefs: &a11y::state::Preferences) -> Result<()> {
    let or_all = |v: Option<String>| v.unwrap_or_else(|| "all".to_string());
    ctx.print_data(format!(
        "Severity filter:    {}",
        or_all(prefs.severity_filter.map(|s| s.to_string()))
    ))?;
    ctx.print_data(format!(
        "Status filter:      {}",
        or_all(prefs.status_filter.map(|s| s.to_string()))
    ))?;
    ctx.print_data(format!(
        "Type filter:        {}",
        or_all(prefs.type_filter.clone())
    ))?;
    ctx.print_data(format!("Sort by:            {}", prefs.sort_by))?;
    ctx.print_data(format!("Sort order:         {}", prefs.sort_order))?;
    ctx.print_data(format!("Show all projects:  {}", prefs.show_all_projects))?;
    ctx.print_data(format!("View mode:          {}", prefs.view_mode))?;
    Ok(())
}
