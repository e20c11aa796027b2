//! State management module
//!
//! This module contains the countdown state machine, widget preferences and
//! the shared application state.

pub mod app_state;
pub mod countdown_state;
pub mod preferences;

// Re-export main types
pub use app_state::{AppState, WidgetSnapshot};
pub use countdown_state::{CountdownState, Phase, Tick};
pub use preferences::{PrefValue, PreferenceStore, SharedPreferences, WidgetPreferences, NO_DURATION};
