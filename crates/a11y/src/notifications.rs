//! Alerts derived from the current issue set.
//!
//! Notifications are recomputed from issues on demand: one alert per
//! critical issue detected recently, plus a warning when the backlog grows
//! past a threshold. Only the read and dismissed markers are stored, keyed by
//! notification id, so an alert keeps its state for as long as it is live.

use crate::config::NotificationsConfig;
use crate::domain::{Issue, Severity};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
}

/// Persisted read/dismissed markers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationState {
    pub read: BTreeSet<String>,
    pub dismissed: BTreeSet<String>,
}

impl NotificationState {
    /// Drop markers for notifications that are no longer live.
    pub fn retain_live(&mut self, live: &[Notification]) {
        let ids: BTreeSet<&str> = live.iter().map(|n| n.id.as_str()).collect();
        self.read.retain(|id| ids.contains(id.as_str()));
        self.dismissed.retain(|id| ids.contains(id.as_str()));
    }
}

/// Every alert the issues currently raise, ignoring read/dismissed state.
///
/// Critical issues whose `last_detected` falls inside the recent window
/// (and not in the future) each produce an error-level alert.
pub fn live_notifications(
    issues: &[Issue],
    now: DateTime<Utc>,
    config: &NotificationsConfig,
) -> Result<Vec<Notification>> {
    let window = config.recent_window()?;

    let mut notifications: Vec<Notification> = issues
        .iter()
        .filter(|issue| issue.severity == Severity::Critical)
        .filter(|issue| {
            let age = now.signed_duration_since(issue.last_detected);
            age >= Duration::zero() && age < window
        })
        .map(|issue| Notification {
            id: format!("critical-{}", issue.id),
            title: "Critical Issue Detected".to_string(),
            message: format!("{} requires immediate attention", issue.title),
            kind: NotificationKind::Error,
            timestamp: issue.last_detected,
            read: false,
            issue_id: Some(issue.id.clone()),
        })
        .collect();

    if issues.len() > config.high_issue_count() {
        notifications.push(Notification {
            id: "high-issue-count".to_string(),
            title: "High Issue Count".to_string(),
            message: format!(
                "You have {} accessibility issues. Consider prioritizing fixes.",
                issues.len()
            ),
            kind: NotificationKind::Warning,
            timestamp: now,
            read: false,
            issue_id: None,
        });
    }

    Ok(notifications)
}

/// Notifications to show as of `now`.
///
/// Dismissed alerts are hidden, read alerts are flagged, and the total is
/// capped at the configured maximum.
pub fn derive_notifications(
    issues: &[Issue],
    now: DateTime<Utc>,
    config: &NotificationsConfig,
    state: &NotificationState,
) -> Result<Vec<Notification>> {
    let mut notifications = live_notifications(issues, now, config)?;
    notifications.retain(|n| !state.dismissed.contains(&n.id));
    for notification in &mut notifications {
        notification.read = state.read.contains(&notification.id);
    }
    notifications.truncate(config.max());
    Ok(notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueStatus;

    fn issue(id: &str, severity: Severity, detected: DateTime<Utc>) -> Issue {
        Issue {
            id: id.to_string(),
            title: format!("Issue {}", id),
            description: String::new(),
            severity,
            issue_type: "Forms".to_string(),
            element: String::new(),
            location: "/".to_string(),
            wcag_guideline: String::new(),
            how_to_fix: String::new(),
            last_detected: detected,
            project_id: "1".to_string(),
            status: IssueStatus::New,
        }
    }

    fn derive(issues: &[Issue], now: DateTime<Utc>) -> Vec<Notification> {
        derive_notifications(
            issues,
            now,
            &NotificationsConfig::default(),
            &NotificationState::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_recent_critical_issue_alerts() {
        let now = Utc::now();
        let issues = vec![
            issue("a", Severity::Critical, now - Duration::minutes(2)),
            issue("b", Severity::Critical, now - Duration::minutes(30)),
            issue("c", Severity::High, now - Duration::minutes(1)),
        ];

        let notes = derive(&issues, now);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "critical-a");
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert!(!notes[0].read);
        assert!(notes[0].message.contains("Issue a"));
    }

    #[test]
    fn test_high_issue_count_warning() {
        let now = Utc::now();
        let old = now - Duration::days(3);
        let issues: Vec<Issue> = (0..51)
            .map(|i| issue(&i.to_string(), Severity::Low, old))
            .collect();

        let notes = derive(&issues, now);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "high-issue-count");
        assert!(notes[0].message.contains("51"));
    }

    #[test]
    fn test_notifications_are_capped() {
        let now = Utc::now();
        let issues: Vec<Issue> = (0..30)
            .map(|i| issue(&i.to_string(), Severity::Critical, now))
            .collect();
        let config = NotificationsConfig {
            max: Some(3),
            ..Default::default()
        };

        let notes =
            derive_notifications(&issues, now, &config, &NotificationState::default()).unwrap();
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn test_read_and_dismissed_markers_apply() {
        let now = Utc::now();
        let issues = vec![
            issue("a", Severity::Critical, now),
            issue("b", Severity::Critical, now),
        ];
        let state = NotificationState {
            read: BTreeSet::from(["critical-a".to_string()]),
            dismissed: BTreeSet::from(["critical-b".to_string()]),
        };

        let notes =
            derive_notifications(&issues, now, &NotificationsConfig::default(), &state).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "critical-a");
        assert!(notes[0].read);
    }

    #[test]
    fn test_retain_live_drops_stale_markers() {
        let now = Utc::now();
        let live = derive(&[issue("a", Severity::Critical, now)], now);
        let mut state = NotificationState {
            read: BTreeSet::from(["critical-a".to_string(), "critical-gone".to_string()]),
            dismissed: BTreeSet::from(["high-issue-count".to_string()]),
        };

        state.retain_live(&live);
        assert_eq!(state.read, BTreeSet::from(["critical-a".to_string()]));
        assert!(state.dismissed.is_empty());
    }

    #[test]
    fn test_invalid_window_is_an_error() {
        let config = NotificationsConfig {
            recent_window_minutes: Some(-1),
            ..Default::default()
        };
        assert!(live_notifications(&[], Utc::now(), &config).is_err());
    }
}
