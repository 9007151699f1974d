//! Pure query operations on issue collections.
//!
//! Filtering, sorting and aggregation over slices of issues. Nothing here
//! touches storage; callers pass in the full working set and get back the
//! ordered subset to display or export.

use super::{Issue, IssueStatus, Severity};
use crate::errors::ValidationError;
use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which projects an operation looks at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectScope {
    /// Every project
    #[default]
    All,
    /// A single project, by id
    Project(String),
}

impl ProjectScope {
    pub fn contains(&self, issue: &Issue) -> bool {
        match self {
            ProjectScope::All => true,
            ProjectScope::Project(id) => issue.project_id == *id,
        }
    }
}

/// Field to order issues by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Severity,
    Title,
    #[default]
    LastDetected,
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "severity" => Ok(SortKey::Severity),
            "title" => Ok(SortKey::Title),
            "lastdetected" => Ok(SortKey::LastDetected),
            other => Err(ValidationError::InvalidValue {
                field: "sort key",
                value: other.to_string(),
                expected: "severity, title, lastDetected",
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Severity => f.write_str("severity"),
            SortKey::Title => f.write_str("title"),
            SortKey::LastDetected => f.write_str("lastDetected"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ValidationError::InvalidValue {
                field: "sort order",
                value: other.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Filter parameters for the issue list.
///
/// `None` for severity, status or type means "all".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueFilter {
    pub scope: ProjectScope,
    pub search: String,
    pub severity: Option<Severity>,
    pub status: Option<IssueStatus>,
    /// Exact issue category, e.g. "Images"
    pub issue_type: Option<String>,
}

impl IssueFilter {
    /// Check one issue against every predicate.
    ///
    /// Stages AND together; the search text is an OR across title,
    /// description and location.
    pub fn matches(&self, issue: &Issue) -> bool {
        self.scope.contains(issue)
            && matches_search(issue, &self.search)
            && self.severity.map_or(true, |s| issue.severity == s)
            && self.status.map_or(true, |s| issue.status == s)
            && self
                .issue_type
                .as_deref()
                .map_or(true, |t| issue.issue_type == t)
    }
}

/// Complete list query: filter then sort
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueQuery {
    pub filter: IssueFilter,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

/// Summary counts over a set of issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStats {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub new: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub ignored: usize,
}

/// Parse a severity filter value where "all" means no filter.
pub fn parse_severity_filter(s: &str) -> Result<Option<Severity>, ValidationError> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Parse a type filter value where "all" (or blank) means no filter.
///
/// Types are free text, so anything else is kept verbatim after trimming.
pub fn parse_type_filter(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse a status filter value where "all" means no filter.
pub fn parse_status_filter(s: &str) -> Result<Option<IssueStatus>, ValidationError> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Case-insensitive substring match against title, description and location.
///
/// Empty search text matches everything. This is a literal substring test;
/// fuzzy matching is only used by the quick search in [`crate::search`].
pub fn matches_search(issue: &Issue, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    issue.title.to_lowercase().contains(&needle)
        || issue.description.to_lowercase().contains(&needle)
        || issue.location.to_lowercase().contains(&needle)
}

/// Return the issues satisfying the filter, in input order.
pub fn filter_issues(issues: &[Issue], filter: &IssueFilter) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| filter.matches(issue))
        .cloned()
        .collect()
}

/// Locale-aware ordering for issue titles.
///
/// Root collation at tertiary strength: accented letters sort beside their
/// base letter and a lowercase title precedes its capitalized twin. Raw text
/// breaks collation ties so the ordering is total.
pub struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!("title collation unavailable, comparing case-insensitively: {}", err);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two titles with a one-off [`TitleCollator`].
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

/// Stable sort in place. Equal keys keep their relative input order in
/// both directions.
pub fn sort_issues(issues: &mut [Issue], key: SortKey, order: SortOrder) {
    let titles = OnceCell::new();
    issues.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Severity => a.severity.weight().cmp(&b.severity.weight()),
            SortKey::Title => titles
                .get_or_init(TitleCollator::new)
                .compare(&a.title, &b.title),
            SortKey::LastDetected => a.last_detected.cmp(&b.last_detected),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Filter then sort.
pub fn process_issues(issues: &[Issue], query: &IssueQuery) -> Vec<Issue> {
    let mut result = filter_issues(issues, &query.filter);
    sort_issues(&mut result, query.sort_key, query.sort_order);
    result
}

/// Count issues by severity and status.
pub fn aggregate(issues: &[Issue]) -> IssueStats {
    issues.iter().fold(IssueStats::default(), |mut stats, issue| {
        stats.total += 1;
        match issue.severity {
            Severity::Critical => stats.critical += 1,
            Severity::High => stats.high += 1,
            Severity::Medium => stats.medium += 1,
            Severity::Low => stats.low += 1,
        }
        match issue.status {
            IssueStatus::New => stats.new += 1,
            IssueStatus::InProgress => stats.in_progress += 1,
            IssueStatus::Resolved => stats.resolved += 1,
            IssueStatus::Ignored => stats.ignored += 1,
        }
        stats
    })
}

/// Most recently detected issues within a scope.
pub fn query_recent(issues: &[Issue], scope: &ProjectScope, limit: usize) -> Vec<Issue> {
    let filter = IssueFilter {
        scope: scope.clone(),
        ..Default::default()
    };
    let mut recent = filter_issues(issues, &filter);
    sort_issues(&mut recent, SortKey::LastDetected, SortOrder::Desc);
    recent.truncate(limit);
    recent
}

/// Count issues referencing a project id.
pub fn count_for_project(issues: &[Issue], project_id: &str) -> usize {
    issues.iter().filter(|i| i.project_id == project_id).count()
}
