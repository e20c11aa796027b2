//! Utility functions module
//!
//! Process-level helpers that sit outside the widget domain.

pub mod signals;

pub use signals::shutdown_signal;
