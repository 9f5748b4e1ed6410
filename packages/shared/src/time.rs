//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as `HH:MM:SS` in the local timezone.
///
/// Out-of-range timestamps render as an empty string.
pub fn format_clock_time(timestamp_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_millis) {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => String::new(),
    }
}
