//! HTTP API module
//!
//! The host drives the widgets through these endpoints: placing and
//! configuring them, tapping them, and reading back their faces.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(about_handler))
        .route("/widgets", get(widgets_handler))
        .route("/widgets/:id", get(widget_handler).delete(remove_handler))
        .route("/widgets/:id/configure", post(configure_handler))
        .route("/widgets/:id/toggle", post(toggle_handler))
        .route("/notifications", get(notifications_handler))
        .route("/notifications/:id/dismiss", post(dismiss_handler))
        .route("/display", post(display_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
