//! Per-widget preference persistence
//!
//! Preferences live in a flat string-keyed store, scoped by widget id:
//! `duration_<id>` holds the configured seconds and `keep_screen_on_<id>`
//! whether the countdown should hold the display awake.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::widget::WidgetId;

const DURATION: &str = "duration";
const KEEP_SCREEN_ON: &str = "keep_screen_on";

/// Value returned when a widget has no persisted duration
pub const NO_DURATION: i64 = -1;

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
}

/// Key-value preference storage
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<PrefValue>;
    fn put(&self, key: &str, value: PrefValue) -> anyhow::Result<()>;
    fn remove(&self, keys: &[&str]) -> anyhow::Result<()>;
    fn keys(&self) -> Vec<String>;
}

/// Preference store kept in memory and optionally mirrored to a JSON file
#[derive(Debug, Default)]
pub struct SharedPreferences {
    entries: Mutex<BTreeMap<String, PrefValue>>,
    path: Option<PathBuf>,
}

impl SharedPreferences {
    /// Create a store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`. A missing file starts out empty.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse preferences in {}", path.display()))?
        } else {
            debug!("No preferences file at {}, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            entries: Mutex::new(entries),
            path: Some(path),
        })
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, BTreeMap<String, PrefValue>>> {
        self.entries
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock preferences: {}", e))
    }

    fn flush(&self, entries: &BTreeMap<String, PrefValue>) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write preferences to {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace preferences file {}", path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for SharedPreferences {
    fn get(&self, key: &str) -> Option<PrefValue> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                warn!("Failed to lock preferences for read: {}", e);
                None
            }
        }
    }

    fn put(&self, key: &str, value: PrefValue) -> anyhow::Result<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, keys: &[&str]) -> anyhow::Result<()> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(*key);
        }
        self.flush(&entries)
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Typed access to the per-widget keys
#[derive(Clone)]
pub struct WidgetPreferences {
    store: Arc<dyn PreferenceStore>,
}

fn key(base: &str, widget_id: WidgetId) -> String {
    format!("{}_{}", base, widget_id)
}

impl WidgetPreferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn persist_duration(&self, widget_id: WidgetId, duration_seconds: i64) -> anyhow::Result<()> {
        self.store
            .put(&key(DURATION, widget_id), PrefValue::Int(duration_seconds))
    }

    /// Configured duration in seconds, or [`NO_DURATION`] if none is stored
    pub fn duration_for(&self, widget_id: WidgetId) -> i64 {
        match self.store.get(&key(DURATION, widget_id)) {
            Some(PrefValue::Int(seconds)) => seconds,
            _ => NO_DURATION,
        }
    }

    pub fn persist_keep_screen_on(&self, widget_id: WidgetId, keep_screen_on: bool) -> anyhow::Result<()> {
        self.store
            .put(&key(KEEP_SCREEN_ON, widget_id), PrefValue::Bool(keep_screen_on))
    }

    pub fn keep_screen_on_for(&self, widget_id: WidgetId) -> bool {
        matches!(
            self.store.get(&key(KEEP_SCREEN_ON, widget_id)),
            Some(PrefValue::Bool(true))
        )
    }

    /// Remove every key belonging to `widget_id`
    pub fn delete(&self, widget_id: WidgetId) -> anyhow::Result<()> {
        let keep = key(KEEP_SCREEN_ON, widget_id);
        let duration = key(DURATION, widget_id);
        self.store.remove(&[keep.as_str(), duration.as_str()])
    }

    /// Widget ids that have a persisted duration, in ascending order
    pub fn configured_widgets(&self) -> Vec<WidgetId> {
        let prefix = format!("{}_", DURATION);
        let mut ids: Vec<WidgetId> = self
            .store
            .keys()
            .iter()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|id| id.parse().ok())
            .collect();
        ids.sort_unstable();
        ids
    }
}
