//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::WidgetPreferences;
use crate::{
    services::{
        CommandAlarm, NotificationCenter, Platform, ReportedDisplay, ViewTable, WakeLockProvider,
        WidgetRenderer,
    },
    tasks::{CountdownManager, CountdownSnapshot, ToggleOutcome},
    widget::{label_view, ToggleEvent, WidgetId, WidgetSettings, WidgetView},
};

/// Everything known about one widget
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub widget_id: WidgetId,
    pub duration_seconds: i64,
    pub keep_screen_on: bool,
    pub view: Option<WidgetView>,
    pub countdown: Option<CountdownSnapshot>,
}

/// Main application state shared by every handler
pub struct AppState {
    /// Per-widget configuration
    pub prefs: WidgetPreferences,
    /// Running countdowns
    pub countdowns: CountdownManager,
    /// Host-side collaborators
    pub views: Arc<ViewTable>,
    pub notifications: Arc<NotificationCenter>,
    pub display: Arc<ReportedDisplay>,
    pub alarm: Arc<CommandAlarm>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the application state around a preference store, an alarm and
    /// a wake lock provider
    pub fn new(
        port: u16,
        host: String,
        prefs: WidgetPreferences,
        alarm: Arc<CommandAlarm>,
        wake_locks: Arc<dyn WakeLockProvider>,
    ) -> Self {
        let views = Arc::new(ViewTable::new());
        let notifications = Arc::new(NotificationCenter::new());
        let display = Arc::new(ReportedDisplay::new());

        let platform = Platform {
            renderer: views.clone(),
            alarm: alarm.clone(),
            notifier: notifications.clone(),
            display: display.clone(),
            wake_locks,
        };

        Self {
            countdowns: CountdownManager::new(platform, prefs.clone()),
            prefs,
            views,
            notifications,
            display,
            alarm,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn record_action(&self, action: String) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Save the configuration of a placed widget and show its label
    pub fn configure_widget(&self, widget_id: WidgetId, settings: &WidgetSettings) -> Result<WidgetSnapshot, String> {
        let duration = settings.duration_seconds();
        info!(
            "Configuring widget {}: {}s, keep screen on: {}",
            widget_id, duration, settings.keep_screen_on
        );

        // a running countdown would restore the label of its old duration
        if self.countdowns.stop(widget_id)? {
            debug!("Stopped running countdown of reconfigured widget {}", widget_id);
        }

        self.prefs
            .persist_keep_screen_on(widget_id, settings.keep_screen_on)
            .map_err(|e| format!("Failed to persist screen preference: {:#}", e))?;
        self.views.update_widget(widget_id, label_view(widget_id, duration));
        self.prefs
            .persist_duration(widget_id, duration)
            .map_err(|e| format!("Failed to persist duration: {:#}", e))?;

        self.record_action(format!("configure {}", widget_id));
        self.widget_snapshot(widget_id)
            .ok_or_else(|| format!("Widget {} vanished after configuration", widget_id))
    }

    pub fn is_configured(&self, widget_id: WidgetId) -> bool {
        self.prefs.duration_for(widget_id) != super::NO_DURATION
    }

    /// Deliver a toggle event to the countdown manager
    pub fn handle_toggle(&self, event: ToggleEvent) -> Result<ToggleOutcome, String> {
        debug!("Toggle event for widget {}", event.widget_id);
        let outcome = self.countdowns.toggle(event)?;
        self.record_action(format!("toggle {}", event.widget_id));
        Ok(outcome)
    }

    /// Tap on the widget face: toggle with the persisted duration
    pub fn tap_widget(&self, widget_id: WidgetId) -> Result<ToggleOutcome, String> {
        let duration = self.prefs.duration_for(widget_id);
        self.handle_toggle(ToggleEvent::new(widget_id, duration))
    }

    /// Tap on an alarm notification. Returns `None` if no such notification exists.
    pub fn dismiss_notification(&self, id: WidgetId) -> Result<Option<ToggleOutcome>, String> {
        let Some(notification) = self.notifications.dismiss(id) else {
            return Ok(None);
        };
        self.handle_toggle(notification.on_tap).map(Some)
    }

    /// Widget removed from the host: stop it and forget its configuration
    pub fn remove_widget(&self, widget_id: WidgetId) -> Result<(), String> {
        if self.countdowns.stop(widget_id)? {
            debug!("Stopped running countdown of removed widget {}", widget_id);
        }
        self.prefs
            .delete(widget_id)
            .map_err(|e| format!("Failed to delete preferences: {:#}", e))?;
        self.views.remove(widget_id);

        info!("Removed widget {}", widget_id);
        self.record_action(format!("remove {}", widget_id));
        Ok(())
    }

    /// Render the label of every configured widget, returning how many were drawn
    pub fn restore_labels(&self) -> usize {
        let mut restored = 0;
        for widget_id in self.prefs.configured_widgets() {
            let duration = self.prefs.duration_for(widget_id);
            if duration > 0 {
                self.views.update_widget(widget_id, label_view(widget_id, duration));
                restored += 1;
            } else {
                debug!("Widget {} has no usable duration, skipping label", widget_id);
            }
        }
        info!("Restored labels for {} widgets", restored);
        restored
    }

    pub fn widget_snapshot(&self, widget_id: WidgetId) -> Option<WidgetSnapshot> {
        if !self.is_configured(widget_id) {
            return None;
        }
        Some(WidgetSnapshot {
            widget_id,
            duration_seconds: self.prefs.duration_for(widget_id),
            keep_screen_on: self.prefs.keep_screen_on_for(widget_id),
            view: self.views.get(widget_id),
            countdown: self.countdowns.snapshot_of(widget_id),
        })
    }

    pub fn set_display_interactive(&self, interactive: bool) {
        self.display.set_interactive(interactive);
        self.record_action(format!("display {}", if interactive { "on" } else { "off" }));
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop every running countdown before the process exits
    pub async fn shutdown(&self) {
        if self.countdowns.is_idle() {
            return;
        }
        warn!("Shutting down with {} running countdowns", self.countdowns.active_count());
        self.countdowns.shutdown().await;
    }
}
