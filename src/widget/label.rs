//! Duration formatting for the widget label and countdown display

use serde::Serialize;

/// Two-line text shown on the static widget label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelText {
    pub primary: String,
    pub secondary: String,
}

impl LabelText {
    fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Simplify common durations ("2 Minutes", "45 Seconds"), falling back to
/// `Timer` over `M:SS` for anything else.
///
/// The checks overlap and are evaluated in order; the first match wins.
pub fn format_duration_for_label(duration_seconds: i64) -> LabelText {
    if duration_seconds == 60 {
        LabelText::new("1", "Minute")
    } else if duration_seconds % 60 == 0 && duration_seconds > 60 {
        LabelText::new((duration_seconds / 60).to_string(), "Minutes")
    } else if duration_seconds == 1 {
        LabelText::new("1", "Second")
    } else if duration_seconds < 180 {
        LabelText::new(duration_seconds.to_string(), "Seconds")
    } else {
        LabelText::new("Timer", format_countdown(duration_seconds))
    }
}

/// Format remaining time as `M:SS`. Negative values display as `0:00`.
pub fn format_countdown(duration_seconds: i64) -> String {
    let duration = duration_seconds.max(0);
    format!("{}:{:02}", duration / 60, duration % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(d: i64) -> (String, String) {
        let text = format_duration_for_label(d);
        (text.primary, text.secondary)
    }

    #[test]
    fn test_single_minute() {
        assert_eq!(label(60), ("1".into(), "Minute".into()));
    }

    #[test]
    fn test_whole_minutes() {
        assert_eq!(label(120), ("2".into(), "Minutes".into()));
        assert_eq!(label(600), ("10".into(), "Minutes".into()));
    }

    #[test]
    fn test_single_second() {
        assert_eq!(label(1), ("1".into(), "Second".into()));
    }

    #[test]
    fn test_short_durations_in_seconds() {
        assert_eq!(label(45), ("45".into(), "Seconds".into()));
        assert_eq!(label(90), ("90".into(), "Seconds".into()));
        assert_eq!(label(179), ("179".into(), "Seconds".into()));
    }

    #[test]
    fn test_long_durations_fall_back_to_clock() {
        assert_eq!(label(180 + 1), ("Timer".into(), "3:01".into()));
        assert_eq!(label(210), ("Timer".into(), "3:30".into()));
        assert_eq!(label(3725), ("Timer".into(), "62:05".into()));
    }

    #[test]
    fn test_minute_check_wins_over_clock() {
        // 180 is both >= 180 and a whole number of minutes
        assert_eq!(label(180), ("3".into(), "Minutes".into()));
    }

    #[test]
    fn test_countdown_format() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(5), "0:05");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(600), "10:00");
    }

    #[test]
    fn test_countdown_floors_negative_values() {
        assert_eq!(format_countdown(-1), "0:00");
        assert_eq!(format_countdown(-60), "0:00");
    }
}
