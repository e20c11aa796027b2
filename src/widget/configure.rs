//! Settings collected when a widget is placed or reconfigured

use serde::Deserialize;

/// Values entered on the configuration screen. Empty fields count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetSettings {
    #[serde(default)]
    pub minutes: Option<u32>,
    #[serde(default)]
    pub seconds: Option<u32>,
    /// Hold the display awake (rather than just the CPU) while counting down
    #[serde(default)]
    pub keep_screen_on: bool,
}

impl WidgetSettings {
    pub fn duration_seconds(&self) -> i64 {
        i64::from(self.minutes.unwrap_or(0)) * 60 + i64::from(self.seconds.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_fields() {
        let settings = WidgetSettings {
            minutes: Some(2),
            seconds: Some(30),
            keep_screen_on: false,
        };
        assert_eq!(settings.duration_seconds(), 150);
    }

    #[test]
    fn test_empty_fields_are_zero() {
        let settings: WidgetSettings = serde_json::from_str(r#"{"seconds": 45}"#).unwrap();
        assert_eq!(settings.duration_seconds(), 45);
        assert!(!settings.keep_screen_on);

        let empty: WidgetSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.duration_seconds(), 0);
    }

    #[test]
    fn test_seconds_may_exceed_a_minute() {
        let settings: WidgetSettings =
            serde_json::from_str(r#"{"minutes": 1, "seconds": 90, "keep_screen_on": true}"#).unwrap();
        assert_eq!(settings.duration_seconds(), 150);
        assert!(settings.keep_screen_on);
    }
}
