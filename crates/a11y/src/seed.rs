//! Built-in seed data.
//!
//! Used on first run, whenever persisted state is missing or unreadable, and
//! by `issue refresh` to reset the issue collection.

use crate::domain::{Issue, IssueStatus, Project, ProjectStatus, Severity};
use chrono::{DateTime, Utc};

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn project(id: &str, name: &str, url: &str, last_scan: &str, status: ProjectStatus) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        last_scan: at(last_scan),
        issue_count: 0,
        status,
    }
}

#[allow(clippy::too_many_arguments)]
fn issue(
    id: &str,
    project_id: &str,
    title: &str,
    description: &str,
    severity: Severity,
    issue_type: &str,
    element: &str,
    location: &str,
    wcag_guideline: &str,
    how_to_fix: &str,
    last_detected: &str,
    status: IssueStatus,
) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        issue_type: issue_type.to_string(),
        element: element.to_string(),
        location: location.to_string(),
        wcag_guideline: wcag_guideline.to_string(),
        how_to_fix: how_to_fix.to_string(),
        last_detected: at(last_detected),
        project_id: project_id.to_string(),
        status,
    }
}

/// Seed projects, with `issue_count` matching [`seed_issues`].
pub fn seed_projects() -> Vec<Project> {
    let issues = seed_issues();
    let mut projects = vec![
        project(
            "1",
            "E-commerce Website",
            "https://shop.example.com",
            "2024-01-15T10:30:00Z",
            ProjectStatus::Active,
        ),
        project(
            "2",
            "Corporate Blog",
            "https://blog.example.com",
            "2024-01-14T16:45:00Z",
            ProjectStatus::Active,
        ),
        project(
            "3",
            "Customer Portal",
            "https://portal.example.com",
            "2024-01-13T09:15:00Z",
            ProjectStatus::Active,
        ),
        project(
            "4",
            "Legacy Marketing Site",
            "https://old.example.com",
            "2023-11-02T08:00:00Z",
            ProjectStatus::Inactive,
        ),
    ];
    for p in &mut projects {
        p.issue_count = crate::domain::queries::count_for_project(&issues, &p.id);
    }
    projects
}

/// Seed issues spread across the seed projects.
pub fn seed_issues() -> Vec<Issue> {
    vec![
        issue(
            "1",
            "1",
            "Missing alt text on product images",
            "Product images in the catalogue grid have no text alternative, so screen reader users hear only the file name.",
            Severity::Critical,
            "Images",
            r#"<img src="/img/products/sku-1042.jpg" class="product-thumb">"#,
            "/products",
            "WCAG 2.1 - 1.1.1 Non-text Content",
            "Add an alt attribute describing the product, e.g. alt=\"Blue cotton t-shirt, front view\".",
            "2024-01-15T10:30:00Z",
            IssueStatus::New,
        ),
        issue(
            "2",
            "1",
            "Insufficient color contrast on sale badges",
            "White text on the orange sale badge has a contrast ratio of 2.8:1.",
            Severity::High,
            "Color Contrast",
            r#"<span class="badge badge-sale">SALE</span>"#,
            "/products",
            "WCAG 2.1 - 1.4.3 Contrast (Minimum)",
            "Darken the badge background until the ratio reaches at least 4.5:1.",
            "2024-01-15T09:12:00Z",
            IssueStatus::InProgress,
        ),
        issue(
            "3",
            "1",
            "Checkout form fields lack labels",
            "Card number and expiry inputs rely on placeholder text only.",
            Severity::Critical,
            "Forms",
            r#"<input type="text" name="card" placeholder="Card number">"#,
            "/checkout",
            "WCAG 2.1 - 3.3.2 Labels or Instructions",
            "Associate a visible <label for=\"card\"> with each input.",
            "2024-01-14T18:20:00Z",
            IssueStatus::New,
        ),
        issue(
            "4",
            "1",
            "Mega menu not reachable by keyboard",
            "Sub-menus open on hover only; Tab skips over them entirely.",
            Severity::High,
            "Keyboard",
            r#"<li class="nav-item has-submenu">"#,
            "/",
            "WCAG 2.1 - 2.1.1 Keyboard",
            "Open sub-menus on focus and Enter, and manage aria-expanded on the trigger.",
            "2024-01-13T11:05:00Z",
            IssueStatus::New,
        ),
        issue(
            "5",
            "1",
            "Carousel auto-advances without pause control",
            "The homepage hero carousel rotates every 4 seconds with no way to stop it.",
            Severity::Medium,
            "Motion",
            r#"<div class="hero-carousel" data-autoplay="4000">"#,
            "/",
            "WCAG 2.1 - 2.2.2 Pause, Stop, Hide",
            "Add a visible pause button and stop rotation on focus or hover.",
            "2024-01-12T08:40:00Z",
            IssueStatus::Resolved,
        ),
        issue(
            "6",
            "2",
            "Heading levels skip from h1 to h4",
            "Article pages jump heading levels, breaking document outline navigation.",
            Severity::Medium,
            "Structure",
            "<h4 class=\"post-subtitle\">",
            "/blog/post/*",
            "WCAG 2.1 - 1.3.1 Info and Relationships",
            "Use sequential heading levels; style with CSS instead of picking levels for size.",
            "2024-01-14T16:45:00Z",
            IssueStatus::New,
        ),
        issue(
            "7",
            "2",
            "Links with ambiguous text \"Read more\"",
            "Dozens of \"Read more\" links are indistinguishable out of context.",
            Severity::Low,
            "Links",
            r#"<a href="/blog/post/42">Read more</a>"#,
            "/blog",
            "WCAG 2.1 - 2.4.4 Link Purpose (In Context)",
            "Include the article title in the link text or add aria-label.",
            "2024-01-14T15:30:00Z",
            IssueStatus::Ignored,
        ),
        issue(
            "8",
            "2",
            "Embedded videos lack captions",
            "Interview videos have no captions or transcript.",
            Severity::High,
            "Media",
            r#"<iframe src="https://video.example.com/embed/913">"#,
            "/blog/interviews",
            "WCAG 2.1 - 1.2.2 Captions (Prerecorded)",
            "Provide synchronized captions and link a transcript below each video.",
            "2024-01-10T12:00:00Z",
            IssueStatus::InProgress,
        ),
        issue(
            "9",
            "3",
            "Session timeout gives no warning",
            "Users are logged out after 10 minutes without any chance to extend the session.",
            Severity::High,
            "Timing",
            "<body data-session-timeout=\"600\">",
            "/dashboard",
            "WCAG 2.1 - 2.2.1 Timing Adjustable",
            "Warn at least 20 seconds before timeout and offer a one-step extension.",
            "2024-01-13T09:15:00Z",
            IssueStatus::New,
        ),
        issue(
            "10",
            "3",
            "Error messages not announced to screen readers",
            "Inline validation errors appear visually but are not in a live region.",
            Severity::Medium,
            "Forms",
            r#"<div class="field-error">Invalid email</div>"#,
            "/settings/profile",
            "WCAG 2.1 - 4.1.3 Status Messages",
            "Render errors inside an element with role=\"alert\" or aria-live=\"assertive\".",
            "2024-01-12T14:25:00Z",
            IssueStatus::New,
        ),
        issue(
            "11",
            "3",
            "Focus indicator removed on buttons",
            "Global CSS sets outline: none on buttons with no replacement focus style.",
            Severity::Medium,
            "Keyboard",
            "button:focus { outline: none; }",
            "/",
            "WCAG 2.1 - 2.4.7 Focus Visible",
            "Restore a visible focus style, e.g. a 2px outline with sufficient contrast.",
            "2024-01-11T10:00:00Z",
            IssueStatus::Resolved,
        ),
        issue(
            "12",
            "3",
            "Page language not declared",
            "The html element has no lang attribute.",
            Severity::Low,
            "Language",
            "<html>",
            "/",
            "WCAG 2.1 - 3.1.1 Language of Page",
            "Add lang=\"en\" to the html element.",
            "2024-01-09T07:30:00Z",
            IssueStatus::New,
        ),
    ]
}
