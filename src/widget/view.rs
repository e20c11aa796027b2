//! View descriptions pushed to the rendering surface

use serde::Serialize;

use super::{format_duration_for_label, ToggleEvent, WidgetId};

/// One of the two mutually exclusive widget layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum WidgetView {
    /// Static two-line label with the timer icon; tapping re-emits the toggle
    Label {
        primary: String,
        secondary: String,
        icon_visible: bool,
        on_click: ToggleEvent,
    },
    /// Single numeric countdown field
    Countdown { text: String, visible: bool },
}

impl WidgetView {
    pub fn is_countdown(&self) -> bool {
        matches!(self, WidgetView::Countdown { .. })
    }
}

/// Build the countdown layout. A blinking display hides the text slot.
pub fn countdown_view(formatted: &str, blink: bool) -> WidgetView {
    WidgetView::Countdown {
        text: formatted.to_string(),
        visible: !blink,
    }
}

/// Build the static label layout for a configured duration
pub fn label_view(widget_id: WidgetId, duration_seconds: i64) -> WidgetView {
    let text = format_duration_for_label(duration_seconds);
    WidgetView::Label {
        primary: text.primary,
        secondary: text.secondary,
        icon_visible: true,
        on_click: ToggleEvent::new(widget_id, duration_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_view_visibility() {
        assert_eq!(
            countdown_view("1:05", false),
            WidgetView::Countdown {
                text: "1:05".into(),
                visible: true
            }
        );
        assert_eq!(
            countdown_view("0:00", true),
            WidgetView::Countdown {
                text: "0:00".into(),
                visible: false
            }
        );
    }

    #[test]
    fn test_label_view_wires_click_with_duration() {
        let view = label_view(7, 300);
        match view {
            WidgetView::Label {
                primary,
                secondary,
                icon_visible,
                on_click,
            } => {
                assert_eq!(primary, "5");
                assert_eq!(secondary, "Minutes");
                assert!(icon_visible);
                assert_eq!(on_click, ToggleEvent::new(7, 300));
            }
            other => panic!("expected label layout, got {:?}", other),
        }
    }

    #[test]
    fn test_view_serializes_layout_tag() {
        let json = serde_json::to_value(countdown_view("0:30", false)).unwrap();
        assert_eq!(json["layout"], "countdown");
        assert_eq!(json["text"], "0:30");
    }
}
