//! Fuzzy quick search over issues.
//!
//! Backs the global search box: a cheap similarity heuristic rather than edit
//! distance. A literal (case-insensitive) substring hit scores 1.0; anything
//! else scores the fraction of query characters found by a single greedy
//! left-to-right subsequence scan of the text.
//!
//! # Example
//!
//! ```
//! use a11y::search::score;
//!
//! assert_eq!(score("alt", "Missing ALT text"), 1.0);
//! assert_eq!(score("", "anything"), 0.0);
//! ```

use crate::domain::Issue;
use serde::Serialize;

/// Default minimum score; candidates at or below it are dropped.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default number of results returned.
pub const DEFAULT_LIMIT: usize = 5;

/// Ranked quick-search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Best score across the searchable fields, in `[0, 1]`
    pub score: f64,
    pub issue: Issue,
}

/// Options for [`quick_search`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickSearchOptions {
    /// Scores less than or equal to this are discarded
    pub threshold: f64,
    /// Maximum number of hits
    pub limit: usize,
}

impl Default for QuickSearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Similarity of `text` to `query`, in `[0, 1]`.
///
/// Returns 0 when either side is empty. Lengths are counted in characters.
pub fn score(query: &str, text: &str) -> f64 {
    if query.is_empty() || text.is_empty() {
        return 0.0;
    }

    let query_lower = query.to_lowercase();
    let text_lower = text.to_lowercase();

    if text_lower.contains(&query_lower) {
        return 1.0;
    }

    let query_chars: Vec<char> = query_lower.chars().collect();
    let mut matched = 0usize;

    for c in text_lower.chars() {
        if matched == query_chars.len() {
            break;
        }
        if c == query_chars[matched] {
            matched += 1;
        }
    }

    matched as f64 / query_chars.len() as f64
}

/// Best score across title, description, location and type.
pub fn score_issue(query: &str, issue: &Issue) -> f64 {
    [
        issue.title.as_str(),
        issue.description.as_str(),
        issue.location.as_str(),
        issue.issue_type.as_str(),
    ]
    .iter()
    .map(|field| score(query, field))
    .fold(0.0, f64::max)
}

/// Rank issues against a quick-search query.
///
/// Whitespace-only queries return nothing. Survivors are ordered by
/// descending score; equal scores keep their input order.
pub fn quick_search(issues: &[Issue], query: &str, options: QuickSearchOptions) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = issues
        .iter()
        .map(|issue| SearchHit {
            score: score_issue(query, issue),
            issue: issue.clone(),
        })
        .filter(|hit| hit.score > options.threshold)
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(options.limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueStatus, Severity};
    use chrono::Utc;

    fn make_issue(id: &str, title: &str, issue_type: &str) -> Issue {
        Issue {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            severity: Severity::Medium,
            issue_type: issue_type.to_string(),
            element: String::new(),
            location: String::new(),
            wcag_guideline: String::new(),
            how_to_fix: String::new(),
            last_detected: Utc::now(),
            project_id: "1".to_string(),
            status: IssueStatus::New,
        }
    }

    #[test]
    fn test_substring_scores_one() {
        assert_eq!(score("contrast", "Low Color CONTRAST on buttons"), 1.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(score("", "text"), 0.0);
        assert_eq!(score("query", ""), 0.0);
    }

    #[test]
    fn test_greedy_subsequence_fraction() {
        assert_eq!(score("ctr", "contrast"), 1.0);
        assert_eq!(score("xyz", "contrast"), 0.0);
        assert_eq!(score("cz", "contrast"), 0.5);
    }

    #[test]
    fn test_scan_is_greedy_not_optimal() {
        // 'b' is skipped while waiting for 'a'
        assert_eq!(score("ab", "ba"), 0.5);
    }

    #[test]
    fn test_non_ascii_counts_characters() {
        assert_eq!(score("éz", "café"), 0.5);
    }

    #[test]
    fn test_quick_search_ranks_and_truncates() {
        let issues: Vec<Issue> = (0..8)
            .map(|i| make_issue(&i.to_string(), &format!("Missing alt text {}", i), "Images"))
            .chain(std::iter::once(make_issue("x", "Keyboard trap", "Keyboard")))
            .collect();

        let hits = quick_search(&issues, "alt", QuickSearchOptions::default());
        assert_eq!(hits.len(), 5);
        assert!(hits.iter().all(|h| h.score == 1.0));
        assert_eq!(hits[0].issue.id, "0");
    }

    #[test]
    fn test_quick_search_matches_type_field() {
        let issues = vec![make_issue("1", "Trap", "Keyboard")];
        let hits = quick_search(&issues, "keyboard", QuickSearchOptions::default());
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_quick_search_drops_scores_at_threshold() {
        let issues = vec![make_issue("1", "abc", "x")];
        let options = QuickSearchOptions {
            threshold: 0.5,
            limit: 5,
        };
        // "azzz" -> only 'a' matches: 0.25
        assert!(quick_search(&issues, "azzz", options).is_empty());
        // "az" -> 0.5, equal to threshold, also dropped
        assert!(quick_search(&issues, "az", options).is_empty());
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let issues = vec![make_issue("1", "Anything", "Images")];
        assert!(quick_search(&issues, "   ", QuickSearchOptions::default()).is_empty());
    }
}
