//! Statistics collection
//!
//! Per-task measurements and their order-independent aggregate.
//!
//! Every task produces exactly one `Measurement`. Measurements are folded into
//! an `AggregateStats` by componentwise summation, which makes the merge a
//! commutative monoid with the all-zero aggregate as identity. Because of that,
//! partial aggregates can be combined in any grouping and any order, which is
//! what happens when tasks finish concurrently on different workers.
//!
//! # Rate scaling
//!
//! A task that moved `bytes` in `millis` has a rate of
//! `r = bytes * 1000 / (millis * 2^20)` MB/s. The measurement carries
//! `rate = r * 1000` and `rate_squared = r^2 * 1000`; dividing the sums by 1000
//! in the report yields the mean rate and the second moment in MB/s units.
//!
//! # Example
//!
//! ```
//! use dfsio::stats::{AggregateStats, Measurement};
//!
//! let a = Measurement::from_transfer(1024 * 1024, 1000);
//! let b = Measurement::from_transfer(2 * 1024 * 1024, 1000);
//!
//! let total = AggregateStats::zero().merge(&a.into()).merge(&b.into());
//! assert_eq!(total.task_count, 2);
//! assert_eq!(total.total_bytes, 3 * 1024 * 1024);
//! ```

pub mod aggregator;

use crate::util::time::mb_per_sec;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Result of executing one task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Always 1
    pub task_count: u64,
    /// Bytes actually transferred
    pub total_bytes: u64,
    /// Task time from open to close, floored at 1 ms
    pub total_time_millis: u64,
    /// Scaled per-task rate (MB/s * 1000)
    pub rate: f64,
    /// Scaled squared rate (MB/s^2 * 1000)
    pub rate_squared: f64,
}

impl Measurement {
    /// Measurement for a task that moved `bytes` in `millis` milliseconds
    pub fn from_transfer(bytes: u64, millis: u64) -> Self {
        let millis = millis.max(1);
        Self::with_rate(mb_per_sec(bytes, millis), bytes, millis)
    }

    /// Measurement with an explicit per-task rate in MB/s
    pub fn with_rate(mb_per_sec: f64, bytes: u64, millis: u64) -> Self {
        Self {
            task_count: 1,
            total_bytes: bytes,
            total_time_millis: millis,
            rate: mb_per_sec * 1000.0,
            rate_squared: mb_per_sec * mb_per_sec * 1000.0,
        }
    }

    /// Per-task rate in MB/s
    pub fn mb_per_sec(&self) -> f64 {
        self.rate / 1000.0
    }
}

/// Componentwise sum of measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub task_count: u64,
    pub total_bytes: u64,
    pub total_time_millis: u64,
    pub sum_rate: f64,
    pub sum_rate_squared: f64,
}

impl AggregateStats {
    /// Identity of the merge
    pub const fn zero() -> Self {
        Self {
            task_count: 0,
            total_bytes: 0,
            total_time_millis: 0,
            sum_rate: 0.0,
            sum_rate_squared: 0.0,
        }
    }

    /// Combine two aggregates
    ///
    /// Associative and commutative; integer fields exactly, floating-point
    /// fields up to rounding.
    pub fn merge(&self, other: &AggregateStats) -> AggregateStats {
        AggregateStats {
            task_count: self.task_count + other.task_count,
            total_bytes: self.total_bytes + other.total_bytes,
            total_time_millis: self.total_time_millis + other.total_time_millis,
            sum_rate: self.sum_rate + other.sum_rate,
            sum_rate_squared: self.sum_rate_squared + other.sum_rate_squared,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task_count == 0
    }

    /// Equality with relative tolerance on the floating-point sums
    pub fn approx_eq(&self, other: &AggregateStats, tolerance: f64) -> bool {
        fn close(a: f64, b: f64, tol: f64) -> bool {
            let scale = a.abs().max(b.abs()).max(1.0);
            (a - b).abs() <= tol * scale
        }

        self.task_count == other.task_count
            && self.total_bytes == other.total_bytes
            && self.total_time_millis == other.total_time_millis
            && close(self.sum_rate, other.sum_rate, tolerance)
            && close(self.sum_rate_squared, other.sum_rate_squared, tolerance)
    }
}

impl From<Measurement> for AggregateStats {
    fn from(m: Measurement) -> Self {
        Self {
            task_count: m.task_count,
            total_bytes: m.total_bytes,
            total_time_millis: m.total_time_millis,
            sum_rate: m.rate,
            sum_rate_squared: m.rate_squared,
        }
    }
}

impl Add for AggregateStats {
    type Output = AggregateStats;

    fn add(self, rhs: AggregateStats) -> AggregateStats {
        self.merge(&rhs)
    }
}

impl Sum for AggregateStats {
    fn sum<I: Iterator<Item = AggregateStats>>(iter: I) -> Self {
        iter.fold(AggregateStats::zero(), |acc, s| acc.merge(&s))
    }
}

impl Sum<Measurement> for AggregateStats {
    fn sum<I: Iterator<Item = Measurement>>(iter: I) -> Self {
        iter.map(AggregateStats::from).sum()
    }
}
