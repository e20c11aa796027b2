//! HTTP endpoint handlers

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use super::responses::{ApiResponse, DisplayReport, HealthResponse, StatusResponse};
use crate::{
    services::{DisplayPower, Notification},
    state::{AppState, WidgetSnapshot},
    widget::{WidgetId, WidgetSettings, WidgetView},
};

const ABOUT: &str = "\
Simple Timer

Place a timer widget, pick its minutes and seconds, and choose whether the
screen should stay on while it counts down.

Tap the widget to start the countdown. Tap it again to stop it. When time is
up the alarm sounds for 15 seconds; if the screen was off a notification is
posted, and tapping it silences the alarm.
";

/// Handle GET / - Short usage instructions
pub async fn about_handler() -> &'static str {
    ABOUT
}

/// Handle POST /widgets/:id/configure - Save settings and draw the label
pub async fn configure_handler(
    State(state): State<Arc<AppState>>,
    Path(widget_id): Path<WidgetId>,
    Json(settings): Json<WidgetSettings>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.configure_widget(widget_id, &settings) {
        Ok(widget) => {
            info!("Widget {} configured", widget_id);
            Ok(Json(ApiResponse::configured(widget)))
        }
        Err(e) => {
            error!("Failed to configure widget {}: {}", widget_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /widgets/:id/toggle - Tap on the widget face
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(widget_id): Path<WidgetId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if !state.is_configured(widget_id) {
        return Err(StatusCode::NOT_FOUND);
    }

    match state.tap_widget(widget_id) {
        Ok(outcome) => Ok(Json(ApiResponse::toggled(
            outcome,
            state.widget_snapshot(widget_id),
        ))),
        Err(e) => {
            error!("Failed to toggle widget {}: {}", widget_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /widgets/:id - Widget removed from the host
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(widget_id): Path<WidgetId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if !state.is_configured(widget_id) {
        return Err(StatusCode::NOT_FOUND);
    }

    match state.remove_widget(widget_id) {
        Ok(()) => Ok(Json(ApiResponse::removed(widget_id))),
        Err(e) => {
            error!("Failed to remove widget {}: {}", widget_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /widgets/:id - Configuration, face and countdown of one widget
pub async fn widget_handler(
    State(state): State<Arc<AppState>>,
    Path(widget_id): Path<WidgetId>,
) -> Result<Json<WidgetSnapshot>, StatusCode> {
    state
        .widget_snapshot(widget_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Handle GET /widgets - Current face of every widget
pub async fn widgets_handler(State(state): State<Arc<AppState>>) -> Json<BTreeMap<WidgetId, WidgetView>> {
    Json(state.views.all())
}

/// Handle GET /notifications - Posted notifications
pub async fn notifications_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Notification>> {
    Json(state.notifications.posted())
}

/// Handle POST /notifications/:id/dismiss - Tap on an alarm notification
pub async fn dismiss_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WidgetId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.dismiss_notification(id) {
        Ok(Some(outcome)) => Ok(Json(ApiResponse::toggled(outcome, state.widget_snapshot(id)))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to dismiss notification {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /display - Host reports whether the display is on
pub async fn display_handler(
    State(state): State<Arc<AppState>>,
    Json(report): Json<DisplayReport>,
) -> StatusCode {
    state.set_display_interactive(report.interactive);
    StatusCode::NO_CONTENT
}

/// Handle GET /status - Return running countdowns and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    let countdowns = state.countdowns.snapshot();

    Json(StatusResponse {
        idle: countdowns.is_empty(),
        countdowns,
        display_interactive: state.display.is_interactive(),
        alarms_fired: state.alarm.fired(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
