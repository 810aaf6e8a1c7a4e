//! Wait-time statistics: running averages, convergence detection, and per-configuration summaries.

use crate::core::{Cycle, Process};
use crate::results::ResultRow;
use std::collections::BTreeMap;

/// Relative change below which a run is considered converged (0.02%).
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.0002;

/// Stand-in for a zero average when computing relative change.
pub const DEFAULT_ZERO_AVERAGE_FLOOR: f64 = 0.1;

/// Mean over processes of each process's wait cycles per elapsed cycle.
pub fn average_wait_time(processes: &[Process], elapsed: Cycle) -> f64 {
    if processes.is_empty() || elapsed == 0 {
        return 0.0;
    }
    let total: f64 = processes.iter().map(|p| p.wait_rate(elapsed)).sum();
    total / processes.len() as f64
}

/// `|1 - current / previous|` with zero averages replaced by `floor`.
pub fn relative_difference(previous: f64, current: f64, floor: f64) -> f64 {
    let previous = if previous == 0.0 { floor } else { previous };
    let current = if current == 0.0 { floor } else { current };
    (1.0 - current / previous).abs()
}

/// Tracks successive averages and reports when they stop moving.
#[derive(Clone, Debug)]
pub struct Convergence {
    threshold: f64,
    floor: f64,
    previous: Option<f64>,
    last_difference: Option<f64>,
}

impl Convergence {
    pub fn new(threshold: f64, floor: f64) -> Self {
        Self {
            threshold,
            floor,
            previous: None,
            last_difference: None,
        }
    }

    /// Records this cycle's average. True once it differs from the previous
    /// cycle's by less than the threshold; never true on the first sample.
    pub fn observe(&mut self, current: f64) -> bool {
        let converged = match self.previous {
            Some(previous) => {
                let diff = relative_difference(previous, current, self.floor);
                self.last_difference = Some(diff);
                diff < self.threshold
            }
            None => false,
        };
        self.previous = Some(current);
        converged
    }

    pub fn last_difference(&self) -> Option<f64> {
        self.last_difference
    }
}

impl Default for Convergence {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_ZERO_AVERAGE_FLOOR)
    }
}

/// Summary of every run sharing one processor count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesSummary {
    pub runs: usize,
    pub min_wait: f64,
    pub max_wait: f64,
    pub mean_wait: f64,
}

/// Groups result rows by processor count, in ascending order.
pub fn summarize_rows<'a, I>(rows: I) -> BTreeMap<usize, SeriesSummary>
where
    I: IntoIterator<Item = &'a ResultRow>,
{
    let mut series: BTreeMap<usize, SeriesSummary> = BTreeMap::new();
    for row in rows {
        let entry = series.entry(row.processors).or_insert(SeriesSummary {
            runs: 0,
            min_wait: f64::INFINITY,
            max_wait: f64::NEG_INFINITY,
            mean_wait: 0.0,
        });
        entry.runs += 1;
        entry.min_wait = entry.min_wait.min(row.wait_time);
        entry.max_wait = entry.max_wait.max(row.wait_time);
        // Running mean.
        entry.mean_wait += (row.wait_time - entry.mean_wait) / entry.runs as f64;
    }
    series
}
