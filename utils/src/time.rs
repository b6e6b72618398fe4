//! Clock abstraction and time formatting helpers.

use cosign_types::Timestamp;

/// Source of wall-clock time. Swapped for a controllable clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Remaining time until `deadline`, or `"expired"`.
pub fn format_time_left(now: Timestamp, deadline: Timestamp) -> String {
    if deadline <= now {
        return "expired".to_string();
    }
    format_duration(now.millis_until(deadline) / 1000)
}
