//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::WidgetSnapshot,
    tasks::{CountdownSnapshot, ToggleOutcome},
    widget::WidgetId,
};

/// API response structure for widget actions
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub widget: Option<WidgetSnapshot>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, widget: Option<WidgetSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            widget,
        }
    }

    /// Response to a configuration request
    pub fn configured(widget: WidgetSnapshot) -> Self {
        Self::new(
            "configured".to_string(),
            format!("Widget {} configured", widget.widget_id),
            Some(widget),
        )
    }

    /// Response to a toggle event, named after what it did
    pub fn toggled(outcome: ToggleOutcome, widget: Option<WidgetSnapshot>) -> Self {
        let (status, message) = match outcome {
            ToggleOutcome::Started => ("started", "Countdown started"),
            ToggleOutcome::Stopped => ("stopped", "Countdown stopped"),
            ToggleOutcome::Ignored => ("ignored", "Widget has no duration, nothing to start"),
        };
        Self::new(status.to_string(), message.to_string(), widget)
    }

    /// Response to a widget removal
    pub fn removed(widget_id: WidgetId) -> Self {
        Self::new("removed".to_string(), format!("Widget {} removed", widget_id), None)
    }
}

/// Display state report from the host
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayReport {
    pub interactive: bool,
}

/// Status response with the running countdowns
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub countdowns: Vec<CountdownSnapshot>,
    pub idle: bool,
    pub display_interactive: bool,
    pub alarms_fired: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
