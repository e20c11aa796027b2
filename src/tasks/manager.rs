//! Countdown lifecycle manager
//!
//! Owns the registry of running countdowns. Every widget id maps to at most
//! one countdown together with the wake lock taken for it; both live in the
//! same entry and leave the registry together.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, Weak,
    },
};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::countdown::CountdownProcess;
use crate::{
    services::{Platform, WakeLock, WakeLockKind},
    state::{Phase, WidgetPreferences},
    widget::{ToggleEvent, WidgetId},
};

/// Result of a toggle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Started,
    Stopped,
    /// Start requested with a non-positive duration
    Ignored,
}

/// Status view of one running countdown
#[derive(Debug, Clone, Serialize)]
pub struct CountdownSnapshot {
    pub widget_id: WidgetId,
    pub reset_seconds: i64,
    pub current_seconds: i64,
    pub phase: Phase,
    pub wake_lock: Option<WakeLockKind>,
}

struct ActiveCountdown {
    run: u64,
    process: CountdownProcess,
    wake_lock: Option<Box<dyn WakeLock>>,
}

impl ActiveCountdown {
    /// Stop the countdown and release its wake lock
    fn end(self) -> CountdownProcess {
        self.process.stop();
        match self.wake_lock {
            Some(lock) => {
                debug!("Releasing {} wake lock for widget {}", lock.kind(), self.process.widget_id());
                drop(lock);
            }
            None => debug!("No wake lock held for widget {}", self.process.widget_id()),
        }
        self.process
    }
}

struct Registry {
    active: Mutex<HashMap<WidgetId, ActiveCountdown>>,
    next_run: AtomicU64,
    platform: Platform,
    prefs: WidgetPreferences,
}

impl Registry {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<WidgetId, ActiveCountdown>>, String> {
        self.active
            .lock()
            .map_err(|e| format!("Failed to lock countdown registry: {}", e))
    }

    /// Drop the entry of a countdown that stopped itself, unless a newer run
    /// has taken its place.
    fn retire(&self, widget_id: WidgetId, run: u64) {
        let mut active = match self.lock() {
            Ok(active) => active,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };

        if active.get(&widget_id).map(|entry| entry.run) != Some(run) {
            debug!("Countdown run {} for widget {} already removed", run, widget_id);
            return;
        }

        if let Some(entry) = active.remove(&widget_id) {
            entry.end();
            info!("Countdown for widget {} finished", widget_id);
        }
        if active.is_empty() {
            info!("No countdowns remain, service is idle");
        }
    }
}

/// Registry of running countdowns, shared by the host's handlers
#[derive(Clone)]
pub struct CountdownManager {
    registry: Arc<Registry>,
}

impl CountdownManager {
    pub fn new(platform: Platform, prefs: WidgetPreferences) -> Self {
        Self {
            registry: Arc::new(Registry {
                active: Mutex::new(HashMap::new()),
                next_run: AtomicU64::new(1),
                platform,
                prefs,
            }),
        }
    }

    /// Start the widget's countdown if none is running, otherwise stop it
    pub fn toggle(&self, event: ToggleEvent) -> Result<ToggleOutcome, String> {
        let widget_id = event.widget_id;
        let mut active = self.registry.lock()?;

        if let Some(entry) = active.remove(&widget_id) {
            entry.end();
            if active.is_empty() {
                info!("No countdowns remain, service is idle");
            }
            return Ok(ToggleOutcome::Stopped);
        }

        if event.duration_seconds <= 0 {
            debug!(
                "Ignoring start of widget {} with duration {}",
                widget_id, event.duration_seconds
            );
            return Ok(ToggleOutcome::Ignored);
        }

        let keep_screen_on = self.registry.prefs.keep_screen_on_for(widget_id);
        info!(
            "Starting countdown of {}s for widget {} (keep screen on: {})",
            event.duration_seconds, widget_id, keep_screen_on
        );

        let run = self.registry.next_run.fetch_add(1, Ordering::SeqCst);
        let registry: Weak<Registry> = Arc::downgrade(&self.registry);
        let process = CountdownProcess::spawn(
            widget_id,
            event.duration_seconds,
            self.registry.platform.clone(),
            move || {
                if let Some(registry) = registry.upgrade() {
                    registry.retire(widget_id, run);
                }
            },
        );

        let kind = WakeLockKind::for_keep_screen_on(keep_screen_on);
        let wake_lock = match self.registry.platform.wake_locks.acquire(widget_id, kind) {
            Ok(lock) => Some(lock),
            Err(e) => {
                warn!("Running widget {} without a wake lock: {}", widget_id, e);
                None
            }
        };

        active.insert(
            widget_id,
            ActiveCountdown {
                run,
                process,
                wake_lock,
            },
        );
        Ok(ToggleOutcome::Started)
    }

    /// Stop the widget's countdown if one is running
    pub fn stop(&self, widget_id: WidgetId) -> Result<bool, String> {
        if !self.is_active(widget_id) {
            return Ok(false);
        }
        // toggle re-checks under the lock; a start here means the run ended meanwhile
        match self.toggle(ToggleEvent::new(widget_id, 0))? {
            ToggleOutcome::Stopped => Ok(true),
            _ => Ok(false),
        }
    }

    pub fn is_active(&self, widget_id: WidgetId) -> bool {
        self.registry
            .lock()
            .map(|active| active.contains_key(&widget_id))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.registry.lock().map(|active| active.len()).unwrap_or(0)
    }

    /// True when no countdown is running and the host may wind down
    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    pub fn snapshot_of(&self, widget_id: WidgetId) -> Option<CountdownSnapshot> {
        let active = self.registry.lock().ok()?;
        active.get(&widget_id).and_then(snapshot_entry)
    }

    /// Running countdowns ordered by widget id
    pub fn snapshot(&self) -> Vec<CountdownSnapshot> {
        let mut snapshots: Vec<CountdownSnapshot> = match self.registry.lock() {
            Ok(active) => active.values().filter_map(snapshot_entry).collect(),
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };
        snapshots.sort_by_key(|s| s.widget_id);
        snapshots
    }

    /// Stop every countdown and wait for their tasks to exit
    pub async fn shutdown(&self) {
        let drained: Vec<ActiveCountdown> = match self.registry.lock() {
            Ok(mut active) => active.drain().map(|(_, entry)| entry).collect(),
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };

        if !drained.is_empty() {
            info!("Stopping {} running countdowns", drained.len());
        }

        let processes: Vec<CountdownProcess> = drained.into_iter().map(ActiveCountdown::end).collect();
        for process in processes {
            process.join().await;
        }
    }
}

fn snapshot_entry(entry: &ActiveCountdown) -> Option<CountdownSnapshot> {
    let state = entry.process.snapshot().ok()?;
    Some(CountdownSnapshot {
        widget_id: state.widget_id,
        reset_seconds: state.reset_seconds,
        current_seconds: state.current_seconds,
        phase: state.phase(),
        wake_lock: entry.wake_lock.as_ref().map(|lock| lock.kind()),
    })
}
