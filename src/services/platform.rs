//! Capability traits for everything the countdown drives on the host
//!
//! A countdown never touches the platform directly; it goes through these
//! traits so the host can render, notify and hold the machine awake however
//! it likes.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::widget::{ToggleEvent, WidgetId, WidgetView};

/// Surface the widget faces are pushed to
pub trait WidgetRenderer: Send + Sync {
    fn update_widget(&self, widget_id: WidgetId, view: WidgetView);
}

/// Alarm sound played when a countdown reaches zero
pub trait AlarmSound: Send + Sync {
    fn play(&self, widget_id: WidgetId);
    fn stop(&self, widget_id: WidgetId);
}

/// Notification presentation
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
    fn cancel(&self, id: WidgetId);
}

/// Display power state
pub trait DisplayPower: Send + Sync {
    fn is_interactive(&self) -> bool;
    fn wake(&self);
}

/// Kind of hold taken while a countdown runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeLockKind {
    /// Keeps the display lit as well as the CPU running
    ScreenBright,
    /// Keeps only the CPU running
    Partial,
}

impl WakeLockKind {
    pub fn for_keep_screen_on(keep_screen_on: bool) -> Self {
        if keep_screen_on {
            WakeLockKind::ScreenBright
        } else {
            WakeLockKind::Partial
        }
    }
}

impl fmt::Display for WakeLockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WakeLockKind::ScreenBright => write!(f, "screen-bright"),
            WakeLockKind::Partial => write!(f, "partial"),
        }
    }
}

/// A held wake lock. Dropping the handle releases it.
pub trait WakeLock: Send {
    fn kind(&self) -> WakeLockKind;
}

/// Source of wake locks
pub trait WakeLockProvider: Send + Sync {
    fn acquire(&self, widget_id: WidgetId, kind: WakeLockKind) -> Result<Box<dyn WakeLock>, String>;
}

/// Notification posted when an alarm fires with the display off
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: WidgetId,
    pub title: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
    /// Event delivered when the user taps the notification
    pub on_tap: ToggleEvent,
}

impl Notification {
    pub fn time_is_up(widget_id: WidgetId) -> Self {
        Self {
            id: widget_id,
            title: "Time is up!".to_string(),
            text: "Tap to dismiss".to_string(),
            posted_at: Utc::now(),
            on_tap: ToggleEvent::new(widget_id, 0),
        }
    }
}

/// Bundle of host collaborators handed to every countdown
#[derive(Clone)]
pub struct Platform {
    pub renderer: Arc<dyn WidgetRenderer>,
    pub alarm: Arc<dyn AlarmSound>,
    pub notifier: Arc<dyn Notifier>,
    pub display: Arc<dyn DisplayPower>,
    pub wake_locks: Arc<dyn WakeLockProvider>,
}
