//! Per-widget countdown background task

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{sync::Notify, task::JoinHandle, time::sleep};
use tracing::{debug, error, info, trace};

use crate::{
    services::{Notification, Platform},
    state::{CountdownState, Phase},
    widget::{countdown_view, label_view, WidgetId},
};

struct Shared {
    state: Mutex<CountdownState>,
    wake: Notify,
    platform: Platform,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, CountdownState>, String> {
        self.state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    fn render_countdown(&self, state: &CountdownState) {
        let view = countdown_view(&state.display_text(), state.blink());
        self.platform.renderer.update_widget(state.widget_id, view);
    }

    fn restore_label(&self, state: &CountdownState) {
        self.platform
            .renderer
            .update_widget(state.widget_id, label_view(state.widget_id, state.reset_seconds));
    }

    fn sound_alarm(&self, widget_id: WidgetId) {
        info!("Countdown for widget {} reached zero", widget_id);
        self.platform.alarm.play(widget_id);

        let display = &self.platform.display;
        if !display.is_interactive() {
            debug!("Display is off, waking it and posting a notification");
            display.wake();
            self.platform.notifier.notify(Notification::time_is_up(widget_id));
        }
    }

    fn silence(&self, widget_id: WidgetId) {
        self.platform.alarm.stop(widget_id);
        self.platform.notifier.cancel(widget_id);
    }
}

/// Handle to a running countdown
pub struct CountdownProcess {
    widget_id: WidgetId,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl CountdownProcess {
    /// Spawn the countdown task. The initial display is rendered right away.
    ///
    /// `on_finish` runs once if the countdown stops itself at the end of the
    /// alarm grace period; it does not run after [`CountdownProcess::stop`].
    pub fn spawn<F>(
        widget_id: WidgetId,
        reset_seconds: i64,
        platform: Platform,
        on_finish: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let state = CountdownState::new(widget_id, reset_seconds);
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            wake: Notify::new(),
            platform,
        });

        if let Ok(state) = shared.lock() {
            shared.render_countdown(&state);
        }

        let task = tokio::spawn(run_countdown(Arc::clone(&shared), on_finish));

        Self {
            widget_id,
            shared,
            task,
        }
    }

    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> Result<CountdownState, String> {
        self.shared.lock().map(|state| state.clone())
    }

    pub fn phase(&self) -> Phase {
        self.shared
            .lock()
            .map(|state| state.phase())
            .unwrap_or(Phase::Stopped)
    }

    /// Stop the countdown: restore the label, silence the alarm, cancel the
    /// notification and wake the task so it exits.
    ///
    /// Returns false if the countdown had already stopped.
    pub fn stop(&self) -> bool {
        let mut state = match self.shared.lock() {
            Ok(state) => state,
            Err(e) => {
                error!("{}", e);
                self.shared.wake.notify_one();
                return false;
            }
        };

        if !state.stop() {
            debug!("Countdown for widget {} already stopped", self.widget_id);
            return false;
        }

        info!(
            "Stopping countdown for widget {} at {}s",
            self.widget_id, state.current_seconds
        );
        self.shared.restore_label(&state);
        self.shared.silence(self.widget_id);
        drop(state);

        self.shared.wake.notify_one();
        true
    }

    /// Wait for the task to exit
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Countdown task for widget {} failed: {}", self.widget_id, e);
        }
    }
}

async fn run_countdown<F>(shared: Arc<Shared>, on_finish: F)
where
    F: FnOnce() + Send + 'static,
{
    let (widget_id, mut interval) = match shared.lock() {
        Ok(state) => (state.widget_id, state.next_interval()),
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    debug!("Countdown task starting for widget {}", widget_id);

    let mut finished = false;

    loop {
        let woken = tokio::select! {
            _ = sleep(interval) => false,
            _ = shared.wake.notified() => true,
        };

        let mut state = match shared.lock() {
            Ok(state) => state,
            Err(e) => {
                error!("{}", e);
                break;
            }
        };

        if state.stopped {
            break;
        }
        if woken {
            debug!("Countdown task for widget {} woken without a stop", widget_id);
            continue;
        }

        let tick = state.tick();
        if state.current_seconds % 10 == 0 {
            trace!("Widget {} down to {}s", widget_id, state.current_seconds);
        }

        if tick.alarm_started {
            shared.sound_alarm(widget_id);
        }

        shared.render_countdown(&state);

        if tick.grace_elapsed {
            info!("Alarm grace period over for widget {}, stopping", widget_id);
            shared.silence(widget_id);
            shared.restore_label(&state);
            finished = true;
            break;
        }

        interval = state.next_interval();
    }

    debug!("Countdown task for widget {} exiting", widget_id);
    if finished {
        on_finish();
    }
}
