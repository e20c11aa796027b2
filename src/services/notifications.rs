//! In-process notification center

use std::{collections::BTreeMap, sync::Mutex};

use tracing::{info, warn};

use super::platform::{Notification, Notifier};
use crate::widget::WidgetId;

/// Posted notifications keyed by id; posting an existing id replaces it
#[derive(Debug, Default)]
pub struct NotificationCenter {
    posted: Mutex<BTreeMap<WidgetId, Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> Vec<Notification> {
        self.posted
            .lock()
            .map(|posted| posted.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, id: WidgetId) -> Option<Notification> {
        self.posted.lock().ok().and_then(|posted| posted.get(&id).cloned())
    }

    /// Remove a notification the user tapped, returning it
    pub fn dismiss(&self, id: WidgetId) -> Option<Notification> {
        self.posted.lock().ok().and_then(|mut posted| posted.remove(&id))
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        info!("Posting notification {}: {}", notification.id, notification.title);
        match self.posted.lock() {
            Ok(mut posted) => {
                posted.insert(notification.id, notification);
            }
            Err(e) => warn!("Failed to lock notifications: {}", e),
        }
    }

    fn cancel(&self, id: WidgetId) {
        match self.posted.lock() {
            Ok(mut posted) => {
                if posted.remove(&id).is_some() {
                    info!("Cancelled notification {}", id);
                }
            }
            Err(e) => warn!("Failed to lock notifications: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_and_cancel() {
        let center = NotificationCenter::new();
        center.notify(Notification::time_is_up(3));
        center.notify(Notification::time_is_up(3));
        assert_eq!(center.posted().len(), 1);
        assert_eq!(center.get(3).map(|n| n.text), Some("Tap to dismiss".to_string()));

        center.cancel(3);
        assert!(center.posted().is_empty());

        // cancelling again is harmless
        center.cancel(3);
    }

    #[test]
    fn test_dismiss_returns_tap_event() {
        let center = NotificationCenter::new();
        center.notify(Notification::time_is_up(9));

        let dismissed = center.dismiss(9).unwrap();
        assert_eq!(dismissed.on_tap.widget_id, 9);
        assert_eq!(dismissed.on_tap.duration_seconds, 0);
        assert!(center.dismiss(9).is_none());
    }
}
