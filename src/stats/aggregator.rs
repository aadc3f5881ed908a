//! Statistics reduction
//!
//! Folds the unordered collection of task outcomes into one `AggregateStats`.
//! Successful measurements are summed; failed tasks are kept aside by name so
//! the report can show `executed < requested` instead of hiding them.
//!
//! The fold is a pure function of the multiset of measurements. Sequential
//! `reduce`, `reduce_partials` over arbitrarily grouped partial aggregates, and
//! the rayon tree reduction in `par_reduce` all agree (up to floating-point
//! rounding in the rate sums).
//!
//! # Example
//!
//! ```
//! use dfsio::stats::Measurement;
//! use dfsio::stats::aggregator::{reduce, reduce_partials};
//!
//! let ms: Vec<_> = (1..=6u64).map(|i| Measurement::from_transfer(i * 4096, i)).collect();
//!
//! let whole = reduce(ms.iter().copied());
//! let halves = reduce_partials([reduce(ms[..2].iter().copied()), reduce(ms[2..].iter().copied())]);
//! assert!(whole.approx_eq(&halves, 1e-12));
//! ```

use super::{AggregateStats, Measurement};
use crate::task::TaskOutcome;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fold measurements into an aggregate; empty input yields the zero aggregate
pub fn reduce<I>(measurements: I) -> AggregateStats
where
    I: IntoIterator<Item = Measurement>,
{
    measurements
        .into_iter()
        .fold(AggregateStats::zero(), |acc, m| acc.merge(&m.into()))
}

/// Combine partial aggregates produced by any grouping of the measurements
pub fn reduce_partials<I>(partials: I) -> AggregateStats
where
    I: IntoIterator<Item = AggregateStats>,
{
    partials.into_iter().sum()
}

/// Tree reduction across the rayon pool (merge order unspecified)
pub fn par_reduce(measurements: &[Measurement]) -> AggregateStats {
    measurements
        .par_iter()
        .map(|&m| AggregateStats::from(m))
        .reduce(AggregateStats::zero, |a, b| a.merge(&b))
}

/// A task that did not produce a measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub task: String,
    pub error: String,
}

/// Aggregate of one run plus its failed tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Tasks listed in the manifest
    pub requested: usize,
    /// Sum over successful tasks
    pub aggregate: AggregateStats,
    /// Tasks excluded from the aggregate
    pub failures: Vec<TaskFailure>,
}

impl RunStats {
    /// Split outcomes into the aggregate and the failure list
    pub fn from_outcomes(requested: usize, outcomes: Vec<TaskOutcome>) -> Self {
        let mut failures = Vec::new();
        let mut measurements = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            match outcome.result {
                Ok(m) => measurements.push(m),
                Err(e) => {
                    warn!(task = %outcome.task, error = %e, "task failed");
                    failures.push(TaskFailure {
                        task: outcome.task,
                        error: e.to_string(),
                    });
                }
            }
        }

        failures.sort_by(|a, b| a.task.cmp(&b.task));

        Self {
            requested,
            aggregate: reduce(measurements),
            failures,
        }
    }

    /// Number of tasks that contributed to the aggregate
    pub fn executed(&self) -> u64 {
        self.aggregate.task_count
    }

    /// Whether fewer tasks succeeded than the manifest requested
    pub fn is_degraded(&self) -> bool {
        self.executed() < self.requested as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use std::io;

    fn sample() -> Vec<Measurement> {
        vec![
            Measurement::from_transfer(1024 * 1024, 7),
            Measurement::from_transfer(3 * 1024 * 1024, 113),
            Measurement::from_transfer(512, 1),
            Measurement::from_transfer(10 * 1024 * 1024, 999),
            Measurement::with_rate(0.1, 1, 3),
            Measurement::with_rate(12345.678, 77, 2),
        ]
    }

    /// All permutations of `items` (Heap's algorithm)
    fn permutations(items: &[Measurement]) -> Vec<Vec<Measurement>> {
        fn heap(k: usize, a: &mut Vec<Measurement>, out: &mut Vec<Vec<Measurement>>) {
            if k <= 1 {
                out.push(a.clone());
                return;
            }
            for i in 0..k {
                heap(k - 1, a, out);
                if k % 2 == 0 {
                    a.swap(i, k - 1);
                } else {
                    a.swap(0, k - 1);
                }
            }
        }
        let mut a = items.to_vec();
        let mut out = Vec::new();
        heap(a.len(), &mut a, &mut out);
        out
    }

    #[test]
    fn test_reduce_empty() {
        let s = reduce(Vec::new());
        assert_eq!(s, AggregateStats::zero());
        assert!(s.is_empty());
        assert_eq!(par_reduce(&[]), AggregateStats::zero());
    }

    #[test]
    fn test_reduce_is_order_independent() {
        let base = reduce(sample());
        let perms = permutations(&sample());
        assert_eq!(perms.len(), 720);

        for perm in perms {
            assert!(reduce(perm).approx_eq(&base, 1e-12));
        }
    }

    #[test]
    fn test_reduce_is_grouping_independent() {
        let ms = sample();
        let base = reduce(ms.iter().copied());

        // Every contiguous two- and three-way split, merged in both orders
        for i in 0..=ms.len() {
            for j in i..=ms.len() {
                let a = reduce(ms[..i].iter().copied());
                let b = reduce(ms[i..j].iter().copied());
                let c = reduce(ms[j..].iter().copied());

                let left = a.merge(&b).merge(&c);
                let right = a.merge(&b.merge(&c));
                let shuffled = reduce_partials([c, a, b]);

                assert!(left.approx_eq(&base, 1e-12));
                assert!(right.approx_eq(&base, 1e-12));
                assert!(shuffled.approx_eq(&base, 1e-12));
            }
        }
    }

    #[test]
    fn test_par_reduce_matches_sequential() {
        let ms: Vec<_> = (1..=1000u64)
            .map(|i| Measurement::from_transfer(i * 997, i % 50 + 1))
            .collect();
        let seq = reduce(ms.iter().copied());
        let par = par_reduce(&ms);

        assert_eq!(par.task_count, 1000);
        assert!(par.approx_eq(&seq, 1e-9));
    }

    #[test]
    fn test_integer_fields_exact() {
        let s = reduce(sample());
        assert_eq!(s.task_count, 6);
        assert_eq!(s.total_bytes, 1024 * 1024 + 3 * 1024 * 1024 + 512 + 10 * 1024 * 1024 + 1 + 77);
        assert_eq!(s.total_time_millis, 7 + 113 + 1 + 999 + 3 + 2);
    }

    #[test]
    fn test_from_outcomes_excludes_failures() {
        let mut outcomes: Vec<TaskOutcome> = (0..10)
            .map(|i| TaskOutcome {
                task: format!("test_io_{}", i),
                result: Ok(Measurement::from_transfer(1024, 1)),
            })
            .collect();
        outcomes[4].result = Err(BenchError::io("test_io_4", io::Error::other("boom")));

        let stats = RunStats::from_outcomes(10, outcomes);
        assert_eq!(stats.executed(), 9);
        assert_eq!(stats.aggregate.total_bytes, 9 * 1024);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].task, "test_io_4");
        assert!(stats.failures[0].error.contains("boom"));
        assert!(stats.is_degraded());
    }

    #[test]
    fn test_from_outcomes_complete_run() {
        let outcomes = vec![TaskOutcome {
            task: "test_io_0".into(),
            result: Ok(Measurement::from_transfer(10, 1)),
        }];
        let stats = RunStats::from_outcomes(1, outcomes);
        assert!(!stats.is_degraded());
        assert!(stats.failures.is_empty());
    }
}
