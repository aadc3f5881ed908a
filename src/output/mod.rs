//! Run reports
//!
//! A `Report` is derived once from the run statistics and the wall-clock time
//! of the whole run. Two time bases are involved and must not be mixed:
//!
//! - **Aggregate throughput** divides total bytes by the wall-clock elapsed
//!   time of the run. Summed per-task time would overstate throughput when
//!   tasks overlap.
//! - **Mean rate / standard deviation** come from the per-task rates, each of
//!   which was measured against that task's own time.
//!
//! A run in which no task succeeded has no rate figures at all; the report
//! says so instead of dividing by zero.

pub mod json;
pub mod text;

use crate::config::{CompressionCodec, RunMode};
use crate::stats::aggregator::{RunStats, TaskFailure};
use crate::stats::AggregateStats;
use crate::util::time::{millis_at_least_one, MEGA};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate figures of a run with at least one successful task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    /// Total MB over wall-clock seconds of the whole run
    pub throughput_mb_s: f64,
    /// Mean of the per-task rates (MB/s)
    pub mean_rate_mb_s: f64,
    /// Standard deviation of the per-task rates (MB/s)
    pub std_dev_mb_s: f64,
}

impl RateSummary {
    /// Derive rate figures, or `None` when the aggregate holds no task
    pub fn derive(stats: &AggregateStats, elapsed: Duration) -> Option<Self> {
        Some(Self {
            throughput_mb_s: aggregate_throughput(stats.total_bytes, elapsed),
            mean_rate_mb_s: mean_rate(stats)?,
            std_dev_mb_s: std_dev(stats)?,
        })
    }
}

/// `sum_rate / task_count / 1000`
pub fn mean_rate(stats: &AggregateStats) -> Option<f64> {
    if stats.is_empty() {
        return None;
    }
    Some(stats.sum_rate / stats.task_count as f64 / 1000.0)
}

/// `sqrt(|sum_rate_squared / 1000 / task_count - mean^2|)`
///
/// The absolute value absorbs a slightly negative difference that floating
/// point cancellation produces when the variance is close to zero.
pub fn std_dev(stats: &AggregateStats) -> Option<f64> {
    let mean = mean_rate(stats)?;
    let second_moment = stats.sum_rate_squared / 1000.0 / stats.task_count as f64;
    Some((second_moment - mean * mean).abs().sqrt())
}

/// MB per second over the wall-clock time of the whole run
pub fn aggregate_throughput(total_bytes: u64, elapsed: Duration) -> f64 {
    let millis = millis_at_least_one(elapsed);
    total_bytes as f64 * 1000.0 / (millis as f64 * MEGA as f64)
}

/// Report timestamp layout; the zone is printed as a numeric offset
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %:z %Y";

/// Format a report timestamp
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Human-facing summary of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub mode: RunMode,
    /// Local time the report was produced, with its UTC offset
    pub timestamp: String,
    /// Node that orchestrated the run
    pub hostname: Option<String>,
    pub requested_tasks: usize,
    pub executed_tasks: u64,
    pub failures: Vec<TaskFailure>,
    pub total_bytes: u64,
    pub total_mb: f64,
    pub elapsed_secs: f64,
    pub buffer_size: usize,
    pub compression: Option<CompressionCodec>,
    /// `None` when no task succeeded
    pub rates: Option<RateSummary>,
}

impl Report {
    /// Build the report for a finished run
    pub fn new(
        mode: RunMode,
        stats: &RunStats,
        elapsed: Duration,
        buffer_size: usize,
        compression: Option<CompressionCodec>,
    ) -> Self {
        let aggregate = &stats.aggregate;
        Self {
            mode,
            timestamp: format_timestamp(&Local::now()),
            hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
            requested_tasks: stats.requested,
            executed_tasks: stats.executed(),
            failures: stats.failures.clone(),
            total_bytes: aggregate.total_bytes,
            total_mb: aggregate.total_bytes as f64 / MEGA as f64,
            elapsed_secs: elapsed.as_secs_f64(),
            buffer_size,
            compression,
            rates: RateSummary::derive(aggregate, elapsed),
        }
    }

    pub fn has_data(&self) -> bool {
        self.rates.is_some()
    }

    pub fn is_degraded(&self) -> bool {
        self.executed_tasks < self.requested_tasks as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregator::reduce;
    use crate::stats::Measurement;

    fn stats_with_rates(rates: &[f64]) -> AggregateStats {
        reduce(rates.iter().map(|&r| Measurement::with_rate(r, 1024, 10)))
    }

    #[test]
    fn test_mean_and_std_dev() {
        let stats = stats_with_rates(&[10.0, 20.0, 30.0]);
        let mean = mean_rate(&stats).unwrap();
        let sd = std_dev(&stats).unwrap();

        assert!((mean - 20.0).abs() < 1e-9);
        assert!((sd - (200.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((sd - 8.165).abs() < 1e-3);
    }

    #[test]
    fn test_identical_rates_have_zero_deviation() {
        let stats = stats_with_rates(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]);
        let sd = std_dev(&stats).unwrap();
        assert!(sd.is_finite());
        assert!(sd < 1e-6);
    }

    #[test]
    fn test_empty_aggregate_has_no_data() {
        let empty = AggregateStats::zero();
        assert!(mean_rate(&empty).is_none());
        assert!(std_dev(&empty).is_none());
        assert!(RateSummary::derive(&empty, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_throughput_uses_wall_clock() {
        // 100 MB in 2s of wall clock, however long the tasks took in sum
        let bytes = 100 * MEGA;
        assert!((aggregate_throughput(bytes, Duration::from_secs(2)) - 50.0).abs() < 1e-9);
        assert!(aggregate_throughput(bytes, Duration::ZERO).is_finite());
    }

    #[test]
    fn test_report_from_run() {
        let stats = RunStats {
            requested: 4,
            aggregate: stats_with_rates(&[5.0, 5.0, 5.0]),
            failures: vec![TaskFailure {
                task: "test_io_2".into(),
                error: "boom".into(),
            }],
        };
        let report = Report::new(RunMode::Write, &stats, Duration::from_secs(1), 4096, None);

        assert_eq!(report.requested_tasks, 4);
        assert_eq!(report.executed_tasks, 3);
        assert_eq!(report.total_bytes, 3 * 1024);
        assert!(report.is_degraded());
        assert!(report.has_data());
        let rates = report.rates.unwrap();
        assert!((rates.mean_rate_mb_s - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_timestamp_shows_offset() {
        let offset = chrono::FixedOffset::east_opt(3600).unwrap();
        let time = offset.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&time), "Sat Oct 17 12:00:00 +01:00 2026");

        let utc = chrono::Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&utc), "Sat Oct 17 12:00:00 +00:00 2026");
    }

    #[test]
    fn test_report_without_successes() {
        let stats = RunStats {
            requested: 2,
            aggregate: AggregateStats::zero(),
            failures: Vec::new(),
        };
        let report = Report::new(RunMode::Read, &stats, Duration::from_millis(10), 1024, None);
        assert!(!report.has_data());
        assert!(report.is_degraded());
    }
}
