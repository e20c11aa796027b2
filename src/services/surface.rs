//! In-process widget surface and display state
//!
//! The daemon keeps the latest face of every widget so that the host can
//! poll and draw it. Display power is reported by the host.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex,
    },
};

use tracing::{debug, info, warn};

use super::platform::{DisplayPower, WidgetRenderer};
use crate::widget::{WidgetId, WidgetView};

/// Latest rendered view per widget
#[derive(Debug, Default)]
pub struct ViewTable {
    views: Mutex<BTreeMap<WidgetId, WidgetView>>,
}

impl ViewTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, widget_id: WidgetId) -> Option<WidgetView> {
        self.views
            .lock()
            .ok()
            .and_then(|views| views.get(&widget_id).cloned())
    }

    pub fn all(&self) -> BTreeMap<WidgetId, WidgetView> {
        self.views.lock().map(|views| views.clone()).unwrap_or_default()
    }

    pub fn remove(&self, widget_id: WidgetId) -> Option<WidgetView> {
        self.views
            .lock()
            .ok()
            .and_then(|mut views| views.remove(&widget_id))
    }
}

impl WidgetRenderer for ViewTable {
    fn update_widget(&self, widget_id: WidgetId, view: WidgetView) {
        match self.views.lock() {
            Ok(mut views) => {
                views.insert(widget_id, view);
            }
            Err(e) => warn!("Failed to lock view table for widget {}: {}", widget_id, e),
        }
    }
}

/// Display power as last reported by the host
#[derive(Debug)]
pub struct ReportedDisplay {
    interactive: AtomicBool,
    wake_requests: AtomicU64,
}

impl ReportedDisplay {
    pub fn new() -> Self {
        Self {
            interactive: AtomicBool::new(true),
            wake_requests: AtomicU64::new(0),
        }
    }

    pub fn set_interactive(&self, interactive: bool) {
        let previous = self.interactive.swap(interactive, Ordering::SeqCst);
        if previous != interactive {
            info!("Display reported {}", if interactive { "on" } else { "off" });
        }
    }

    /// Number of times a countdown asked for the display to be woken
    pub fn wake_requests(&self) -> u64 {
        self.wake_requests.load(Ordering::SeqCst)
    }
}

impl Default for ReportedDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPower for ReportedDisplay {
    fn is_interactive(&self) -> bool {
        self.interactive.load(Ordering::SeqCst)
    }

    fn wake(&self) {
        debug!("Display wake requested");
        self.wake_requests.fetch_add(1, Ordering::SeqCst);
        self.interactive.store(true, Ordering::SeqCst);
    }
}
