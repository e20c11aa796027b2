//! Host collaborator module
//!
//! This module contains the capability traits a countdown drives and the
//! desktop implementations the daemon ships with: view table, notification
//! center, alarm command and wake locks.

pub mod alarm;
pub mod notifications;
pub mod platform;
pub mod surface;
pub mod wake_lock;

// Re-export main types
pub use alarm::CommandAlarm;
pub use notifications::NotificationCenter;
pub use platform::*;
pub use surface::{ReportedDisplay, ViewTable};
pub use wake_lock::{check_inhibit_available, InhibitWakeLocks, LedgerWakeLocks};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;

    /// In-memory host with handles to every concrete collaborator
    pub(crate) struct TestHost {
        pub views: Arc<ViewTable>,
        pub alarm: Arc<CommandAlarm>,
        pub notifications: Arc<NotificationCenter>,
        pub display: Arc<ReportedDisplay>,
        pub wake_locks: Arc<LedgerWakeLocks>,
    }

    impl TestHost {
        pub fn new() -> Self {
            Self {
                views: Arc::new(ViewTable::new()),
                alarm: Arc::new(CommandAlarm::silent()),
                notifications: Arc::new(NotificationCenter::new()),
                display: Arc::new(ReportedDisplay::new()),
                wake_locks: Arc::new(LedgerWakeLocks::new()),
            }
        }

        pub fn platform(&self) -> Platform {
            Platform {
                renderer: self.views.clone(),
                alarm: self.alarm.clone(),
                notifier: self.notifications.clone(),
                display: self.display.clone(),
                wake_locks: self.wake_locks.clone(),
            }
        }
    }
}
