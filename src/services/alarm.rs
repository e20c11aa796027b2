//! Alarm playback through an external sound command

use std::{
    collections::HashMap,
    process::Stdio,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::platform::AlarmSound;
use crate::widget::WidgetId;

/// Plays the alarm by spawning a configured command, one child per widget.
///
/// Without a command the alarm is only logged.
#[derive(Debug, Default)]
pub struct CommandAlarm {
    command: Option<Vec<String>>,
    ringing: Mutex<HashMap<WidgetId, Option<Child>>>,
    fired: AtomicU64,
}

impl CommandAlarm {
    /// Create an alarm running `command` (program followed by its arguments)
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command: if command.is_empty() { None } else { Some(command) },
            ..Self::default()
        }
    }

    /// Alarm that only logs
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_ringing(&self, widget_id: WidgetId) -> bool {
        self.ringing
            .lock()
            .map(|ringing| ringing.contains_key(&widget_id))
            .unwrap_or(false)
    }

    /// Total number of alarms started since launch
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }

    fn spawn_sound(&self, widget_id: WidgetId) -> Option<Child> {
        let (program, args) = self.command.as_ref()?.split_first()?;
        debug!("Spawning alarm command {} for widget {}", program, widget_id);

        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => Some(child),
            Err(e) => {
                warn!("Failed to execute alarm command {}: {}", program, e);
                None
            }
        }
    }
}

impl AlarmSound for CommandAlarm {
    fn play(&self, widget_id: WidgetId) {
        info!("Alarm ringing for widget {}", widget_id);
        self.fired.fetch_add(1, Ordering::SeqCst);

        let child = self.spawn_sound(widget_id);
        match self.ringing.lock() {
            Ok(mut ringing) => {
                ringing.insert(widget_id, child);
            }
            Err(e) => warn!("Failed to lock alarm table: {}", e),
        }
    }

    fn stop(&self, widget_id: WidgetId) {
        let entry = match self.ringing.lock() {
            Ok(mut ringing) => ringing.remove(&widget_id),
            Err(e) => {
                warn!("Failed to lock alarm table: {}", e);
                return;
            }
        };

        match entry {
            Some(Some(mut child)) => {
                if let Err(e) = child.start_kill() {
                    // the sound may simply have finished already
                    debug!("Alarm command for widget {} not killed: {}", widget_id, e);
                }
                info!("Alarm stopped for widget {}", widget_id);
            }
            Some(None) => info!("Alarm stopped for widget {}", widget_id),
            None => {}
        }
    }
}
