//! Widget Timer - A home-screen countdown widget daemon
//!
//! Each placed widget is configured with a duration. Tapping it starts a
//! countdown task that updates the widget face every second, sounds an
//! alarm at zero and stops itself after a short grace period. The machine
//! is kept awake for as long as a countdown runs.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod widget;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use tasks::{CountdownManager, ToggleOutcome};
pub use utils::signals::shutdown_signal;
pub use widget::{format_duration_for_label, ToggleEvent, WidgetId};
