//! Timing and rate utilities
//!
//! Task timings are kept at millisecond resolution. Every rate computed here
//! uses a floor of one millisecond so a task (or run) that finishes inside the
//! timer resolution still yields a finite rate.

use std::time::{Duration, Instant};

/// Bytes per megabyte in every MB figure the benchmark reports
pub const MEGA: u64 = 1024 * 1024;

/// Wall-clock timestamp for measuring one task or a whole run
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
}

impl Timestamp {
    /// Create a new timestamp representing the current time
    #[inline]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Get the elapsed time since this timestamp
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Get the elapsed time in milliseconds, never less than 1
    #[inline]
    pub fn elapsed_millis(&self) -> u64 {
        millis_at_least_one(self.elapsed())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// Whole milliseconds in `duration`, floored at 1
pub fn millis_at_least_one(duration: Duration) -> u64 {
    (duration.as_millis() as u64).max(1)
}

/// Megabytes per second for `bytes` moved in `millis` milliseconds
///
/// ```
/// use dfsio::util::time::mb_per_sec;
///
/// assert_eq!(mb_per_sec(1024 * 1024, 1000), 1.0);
/// assert_eq!(mb_per_sec(10 * 1024 * 1024, 500), 20.0);
/// ```
pub fn mb_per_sec(bytes: u64, millis: u64) -> f64 {
    let millis = millis.max(1);
    bytes as f64 * 1000.0 / (millis as f64 * MEGA as f64)
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dfsio::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timestamp_elapsed() {
        let start = Timestamp::now();
        thread::sleep(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(start.elapsed_millis() >= 10);
    }

    #[test]
    fn test_elapsed_millis_floor() {
        let start = Timestamp::now();
        assert!(start.elapsed_millis() >= 1);
        assert_eq!(millis_at_least_one(Duration::ZERO), 1);
        assert_eq!(millis_at_least_one(Duration::from_micros(2500)), 2);
    }

    #[test]
    fn test_mb_per_sec() {
        assert_eq!(mb_per_sec(MEGA, 1000), 1.0);
        assert_eq!(mb_per_sec(MEGA, 0), 1000.0);
        assert_eq!(mb_per_sec(0, 10), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
