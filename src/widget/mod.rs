//! Widget face module
//!
//! Pure helpers that turn durations into label text and view descriptions.
//! Nothing in here talks to the rendering surface directly.

pub mod configure;
pub mod label;
pub mod view;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use configure::WidgetSettings;
pub use label::{format_countdown, format_duration_for_label, LabelText};
pub use view::{countdown_view, label_view, WidgetView};

/// Identifier of one widget placement on the host surface
pub type WidgetId = i32;

/// Event emitted when a widget is tapped; starts or stops its countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleEvent {
    pub widget_id: WidgetId,
    pub duration_seconds: i64,
}

impl ToggleEvent {
    pub fn new(widget_id: WidgetId, duration_seconds: i64) -> Self {
        Self {
            widget_id,
            duration_seconds,
        }
    }
}
