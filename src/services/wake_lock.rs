//! Wake lock providers
//!
//! On systemd machines a wake lock is a `systemd-inhibit` child process that
//! blocks sleep (and idle, for screen locks) for as long as it lives. The
//! ledger provider keeps the same bookkeeping without touching the system.

use std::{
    collections::HashMap,
    process::Stdio,
    sync::{Arc, Mutex},
};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::platform::{WakeLock, WakeLockKind, WakeLockProvider};
use crate::widget::WidgetId;

/// Wake locks backed by `systemd-inhibit`
#[derive(Debug, Default)]
pub struct InhibitWakeLocks;

impl InhibitWakeLocks {
    pub fn new() -> Self {
        Self
    }

    fn inhibit_what(kind: WakeLockKind) -> &'static str {
        match kind {
            WakeLockKind::ScreenBright => "idle:sleep",
            WakeLockKind::Partial => "sleep",
        }
    }
}

impl WakeLockProvider for InhibitWakeLocks {
    fn acquire(&self, widget_id: WidgetId, kind: WakeLockKind) -> Result<Box<dyn WakeLock>, String> {
        debug!("Acquiring {} wake lock for widget {}", kind, widget_id);

        let mut child = Command::new("systemd-inhibit")
            .arg(format!("--what={}", Self::inhibit_what(kind)))
            .arg("--who=widget-timer")
            .arg(format!("--why=Countdown running for widget {}", widget_id))
            .arg("--mode=block")
            .args(["sleep", "infinity"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute systemd-inhibit: {}", e))?;
        ensure_running(&mut child)?;

        info!("Acquired {} wake lock for widget {}", kind, widget_id);
        Ok(Box::new(InhibitLock {
            widget_id,
            kind,
            child,
        }))
    }
}

struct InhibitLock {
    widget_id: WidgetId,
    kind: WakeLockKind,
    child: Child,
}

impl WakeLock for InhibitLock {
    fn kind(&self) -> WakeLockKind {
        self.kind
    }
}

impl Drop for InhibitLock {
    fn drop(&mut self) {
        // a refusal can land after acquire returned
        if let Err(e) = ensure_running(&mut self.child) {
            warn!("Wake lock for widget {} was not held: {}", self.widget_id, e);
        }
        if let Err(e) = self.child.start_kill() {
            warn!("Failed to end systemd-inhibit for widget {}: {}", self.widget_id, e);
        }
        info!("Released {} wake lock for widget {}", self.kind, self.widget_id);
    }
}

/// Fail if the inhibitor has already exited, which means logind refused it
fn ensure_running(child: &mut Child) -> Result<(), String> {
    match child.try_wait() {
        Ok(None) => Ok(()),
        Ok(Some(status)) => Err(format!("systemd-inhibit exited early ({})", status)),
        Err(e) => Err(format!("Failed to poll systemd-inhibit: {}", e)),
    }
}

/// Check that systemd-inhibit can be executed
pub async fn check_inhibit_available() -> Result<(), String> {
    let output = Command::new("systemd-inhibit")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "systemd-inhibit is not available".to_string())?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("systemd-inhibit --version failed: {}", stderr));
    }

    info!("systemd-inhibit is available");
    Ok(())
}

/// Wake locks tracked in-process only
#[derive(Debug, Default, Clone)]
pub struct LedgerWakeLocks {
    held: Arc<Mutex<HashMap<WidgetId, Vec<WakeLockKind>>>>,
    peak: Arc<Mutex<HashMap<WidgetId, usize>>>,
}

impl LedgerWakeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locks currently held for `widget_id`
    pub fn held(&self, widget_id: WidgetId) -> usize {
        self.held
            .lock()
            .map(|held| held.get(&widget_id).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Number of locks held across all widgets
    pub fn total_held(&self) -> usize {
        self.held
            .lock()
            .map(|held| held.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Highest number of locks ever held at once for `widget_id`
    pub fn peak_held(&self, widget_id: WidgetId) -> usize {
        self.peak
            .lock()
            .map(|peak| peak.get(&widget_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn kind_held(&self, widget_id: WidgetId) -> Option<WakeLockKind> {
        self.held
            .lock()
            .ok()
            .and_then(|held| held.get(&widget_id).and_then(|kinds| kinds.first().copied()))
    }
}

impl WakeLockProvider for LedgerWakeLocks {
    fn acquire(&self, widget_id: WidgetId, kind: WakeLockKind) -> Result<Box<dyn WakeLock>, String> {
        let mut held = self
            .held
            .lock()
            .map_err(|e| format!("Failed to lock wake lock ledger: {}", e))?;
        let kinds = held.entry(widget_id).or_default();
        kinds.push(kind);
        if let Ok(mut peak) = self.peak.lock() {
            let highest = peak.entry(widget_id).or_default();
            *highest = (*highest).max(kinds.len());
        }
        info!("Acquired {} wake lock for widget {}", kind, widget_id);

        Ok(Box::new(LedgerLock {
            widget_id,
            kind,
            held: Arc::clone(&self.held),
        }))
    }
}

struct LedgerLock {
    widget_id: WidgetId,
    kind: WakeLockKind,
    held: Arc<Mutex<HashMap<WidgetId, Vec<WakeLockKind>>>>,
}

impl WakeLock for LedgerLock {
    fn kind(&self) -> WakeLockKind {
        self.kind
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        match self.held.lock() {
            Ok(mut held) => {
                if let Some(kinds) = held.get_mut(&self.widget_id) {
                    if let Some(pos) = kinds.iter().position(|k| *k == self.kind) {
                        kinds.remove(pos);
                    }
                    if kinds.is_empty() {
                        held.remove(&self.widget_id);
                    }
                }
            }
            Err(e) => warn!("Failed to lock wake lock ledger on release: {}", e),
        }
        info!("Released {} wake lock for widget {}", self.kind, self.widget_id);
    }
}
