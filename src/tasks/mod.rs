//! Background tasks module
//!
//! This module contains the per-widget countdown task and the manager that
//! starts and stops them.

pub mod countdown;
pub mod manager;

// Re-export main types
pub use countdown::CountdownProcess;
pub use manager::{CountdownManager, CountdownSnapshot, ToggleOutcome};
