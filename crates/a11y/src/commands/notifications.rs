//! Derived alerts and their read/dismissed state

use super::*;
use crate::notifications::{self, Notification};

impl<S: StateStore> CommandExecutor<S> {
    pub fn notifications(&self, now: DateTime<Utc>) -> Result<Vec<Notification>> {
        notifications::derive_notifications(
            &self.state.issues,
            now,
            &self.config.notifications(),
            &self.state.notifications,
        )
    }

    /// Mark one visible notification as read.
    pub fn mark_notification_read(&mut self, id: &str, now: DateTime<Utc>) -> Result<Notification> {
        let mut notification = self
            .notifications(now)?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| LookupError::NotificationNotFound(id.to_string()))?;

        self.state.notifications.read.insert(notification.id.clone());
        self.persist_notification_state(now)?;

        tracing::debug!(id = %notification.id, "marked notification read");
        notification.read = true;
        Ok(notification)
    }

    /// Dismiss every visible notification; returns how many were cleared.
    ///
    /// Dismissed alerts stay hidden while they are live. Once the issue that
    /// raised one is no longer recent, its marker is dropped.
    pub fn clear_notifications(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let visible = self.notifications(now)?;
        for notification in &visible {
            self.state.notifications.dismissed.insert(notification.id.clone());
        }
        self.persist_notification_state(now)?;

        tracing::debug!(count = visible.len(), "cleared notifications");
        Ok(visible.len())
    }

    fn persist_notification_state(&mut self, now: DateTime<Utc>) -> Result<()> {
        let live = notifications::live_notifications(
            &self.state.issues,
            now,
            &self.config.notifications(),
        )?;
        self.state.notifications.retain_live(&live);
        self.storage
            .save_notification_state(&self.state.notifications)
            .context("Failed to save notification state")
    }
}
