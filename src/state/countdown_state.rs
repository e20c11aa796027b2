//! Countdown state machine for a single widget

use std::time::Duration;

use serde::Serialize;

use crate::widget::{format_countdown, WidgetId};

/// Tick period while the countdown is still running
pub const RUNNING_TICK: Duration = Duration::from_secs(1);

/// Tick period once the alarm is sounding
pub const EXPIRED_TICK: Duration = Duration::from_millis(250);

/// Number of fast ticks the alarm sounds before the countdown stops itself (15 s)
pub const GRACE_TICKS: i64 = 60;

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Running,
    Expired,
    Stopped,
}

/// What a single tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tick {
    /// The counter just reached zero; the alarm should start
    pub alarm_started: bool,
    /// The grace period ran out and the countdown stopped itself
    pub grace_elapsed: bool,
}

/// Per-widget countdown counters
#[derive(Debug, Clone, Serialize)]
pub struct CountdownState {
    pub widget_id: WidgetId,
    pub reset_seconds: i64,
    pub current_seconds: i64,
    pub stopped: bool,
}

impl CountdownState {
    /// Create a running countdown starting at `reset_seconds`
    pub fn new(widget_id: WidgetId, reset_seconds: i64) -> Self {
        Self {
            widget_id,
            reset_seconds,
            current_seconds: reset_seconds,
            stopped: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.stopped {
            Phase::Stopped
        } else if self.current_seconds > 0 {
            Phase::Running
        } else {
            Phase::Expired
        }
    }

    /// How long to wait before the next tick
    pub fn next_interval(&self) -> Duration {
        if self.current_seconds > 0 {
            RUNNING_TICK
        } else {
            EXPIRED_TICK
        }
    }

    /// Advance the counter by one tick. A stopped countdown does not move.
    pub fn tick(&mut self) -> Tick {
        if self.stopped {
            return Tick::default();
        }

        self.current_seconds -= 1;

        let mut tick = Tick {
            alarm_started: self.current_seconds == 0,
            grace_elapsed: false,
        };
        if self.current_seconds <= -GRACE_TICKS {
            self.stopped = true;
            tick.grace_elapsed = true;
        }
        tick
    }

    /// Mark the countdown stopped. Returns false if it already was.
    pub fn stop(&mut self) -> bool {
        !std::mem::replace(&mut self.stopped, true)
    }

    /// Remaining time as `M:SS`, floored at zero
    pub fn display_text(&self) -> String {
        format_countdown(self.current_seconds)
    }

    /// Whether the countdown slot is hidden on this tick.
    ///
    /// Once expired the display blinks by parity of the (negative) counter:
    /// visible on even values, hidden on odd ones.
    pub fn blink(&self) -> bool {
        self.current_seconds <= 0 && self.current_seconds % 2 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_countdown_is_running() {
        let state = CountdownState::new(3, 5);
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.current_seconds, 5);
        assert_eq!(state.next_interval(), RUNNING_TICK);
        assert_eq!(state.display_text(), "0:05");
        assert!(!state.blink());
    }

    #[test]
    fn test_alarm_starts_exactly_once() {
        let mut state = CountdownState::new(3, 5);
        let mut alarms = 0;
        for _ in 0..5 {
            if state.tick().alarm_started {
                alarms += 1;
            }
        }
        assert_eq!(state.current_seconds, 0);
        assert_eq!(alarms, 1);
        assert_eq!(state.phase(), Phase::Expired);
        assert_eq!(state.next_interval(), EXPIRED_TICK);

        for _ in 0..30 {
            assert!(!state.tick().alarm_started);
        }
    }

    #[test]
    fn test_grace_period_ends_at_minus_sixty() {
        let mut state = CountdownState::new(1, 1);
        state.tick();
        assert_eq!(state.current_seconds, 0);

        for _ in 0..59 {
            let tick = state.tick();
            assert!(!tick.grace_elapsed);
            assert_eq!(state.phase(), Phase::Expired);
        }
        assert_eq!(state.current_seconds, -59);

        let tick = state.tick();
        assert!(tick.grace_elapsed);
        assert_eq!(state.current_seconds, -60);
        assert_eq!(state.phase(), Phase::Stopped);
    }

    #[test]
    fn test_stopped_countdown_does_not_tick() {
        let mut state = CountdownState::new(1, 10);
        assert!(state.stop());
        assert!(!state.stop());
        assert_eq!(state.tick(), Tick::default());
        assert_eq!(state.current_seconds, 10);
    }

    #[test]
    fn test_blink_follows_parity_after_expiry() {
        let mut state = CountdownState::new(1, 2);
        state.tick();
        assert!(!state.blink()); // 1, still running
        state.tick();
        assert!(!state.blink()); // 0, even
        state.tick();
        assert!(state.blink()); // -1, odd
        state.tick();
        assert!(!state.blink()); // -2, even
        assert_eq!(state.display_text(), "0:00");
    }
}
