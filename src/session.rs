//! Sweep over processor and module counts for both request distributions.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::metrics::{summarize_rows, SeriesSummary};
use crate::request::Distribution;
use crate::results::{ResultLog, ResultRow};
use crate::rng::run_seed;
use crate::simulator::{Simulator, Termination};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Totals for one distribution's sweep.
#[derive(Clone, Debug, Default)]
pub struct SweepSummary {
    pub runs: usize,
    pub total_cycles: u64,
    /// Runs stopped by the cycle bound instead of converging.
    pub cycle_limited: usize,
    /// Keyed by processor count.
    pub series: BTreeMap<usize, SeriesSummary>,
}

/// Result of a full session.
#[derive(Clone, Debug, Default)]
pub struct SessionSummary {
    pub uniform: SweepSummary,
    pub gaussian: SweepSummary,
}

impl SessionSummary {
    pub fn get(&self, distribution: Distribution) -> &SweepSummary {
        match distribution {
            Distribution::Uniform => &self.uniform,
            Distribution::Gaussian => &self.gaussian,
        }
    }
}

/// Runs one independent simulation per sweep point and logs its converged average.
#[derive(Clone, Debug)]
pub struct SessionRunner {
    config: SessionConfig,
    seed: u64,
}

impl SessionRunner {
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Full uniform sweep into `uniform_log`, then full Gaussian sweep into `gaussian_log`.
    pub fn run(&self, uniform_log: &Path, gaussian_log: &Path) -> Result<SessionSummary> {
        let mut log = ResultLog::create(uniform_log)?;
        let uniform = self.sweep(Distribution::Uniform, &mut log)?;
        log.finish()?;

        let mut log = ResultLog::create(gaussian_log)?;
        let gaussian = self.sweep(Distribution::Gaussian, &mut log)?;
        log.finish()?;

        Ok(SessionSummary { uniform, gaussian })
    }

    /// Every (processors, modules) point for one distribution, in sweep order.
    pub fn sweep<W: Write>(
        &self,
        distribution: Distribution,
        log: &mut ResultLog<W>,
    ) -> Result<SweepSummary> {
        info!(
            %distribution,
            runs = self.config.runs_per_distribution(),
            log = %log.path().display(),
            "starting sweep"
        );
        let mut summary = SweepSummary::default();
        let mut rows = Vec::with_capacity(self.config.runs_per_distribution());

        for &processors in &self.config.processor_configs {
            info!(
                %distribution,
                processors,
                max_modules = self.config.max_modules,
                "sweeping processor configuration"
            );
            for modules in 1..=self.config.max_modules {
                let sim_config = self.config.simulator_config(distribution, processors, modules);
                let seed = run_seed(self.seed, distribution, processors, modules);
                let report = Simulator::with_seed(sim_config, seed)?.run();

                summary.runs += 1;
                summary.total_cycles += report.cycles;
                if report.termination == Termination::CycleLimit {
                    summary.cycle_limited += 1;
                }
                let row = ResultRow::from(&report);
                log.append(&row)?;
                rows.push(row);
            }
        }

        summary.series = summarize_rows(&rows);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::read_rows;
    use std::io::Cursor;

    fn small_config() -> SessionConfig {
        SessionConfig {
            processor_configs: vec![1, 2, 4],
            max_modules: 5,
            ..SessionConfig::default()
        }
    }

    fn sweep_to_rows(
        runner: &SessionRunner,
        distribution: Distribution,
    ) -> (SweepSummary, Vec<ResultRow>) {
        let mut log = ResultLog::new(Vec::new(), "mem").unwrap();
        let summary = runner.sweep(distribution, &mut log).unwrap();
        let bytes = log.finish().unwrap();
        (summary, read_rows(Cursor::new(bytes)).unwrap())
    }

    #[test]
    fn session_sweep_order() {
        let runner = SessionRunner::new(small_config(), 1).unwrap();
        assert_eq!(runner.config(), &small_config());
        assert_eq!(runner.config().runs_per_distribution(), 15);
        let (summary, rows) = sweep_to_rows(&runner, Distribution::Uniform);
        assert_eq!(summary.runs, 15);
        let order: Vec<(usize, usize)> = rows.iter().map(|r| (r.processors, r.modules)).collect();
        let expected: Vec<(usize, usize)> = [1, 2, 4]
            .iter()
            .flat_map(|&p| (1..=5).map(move |m| (p, m)))
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn session_single_processor_rows_are_zero() {
        let runner = SessionRunner::new(small_config(), 3).unwrap();
        for dist in Distribution::ALL {
            let (summary, rows) = sweep_to_rows(&runner, dist);
            assert!(rows.iter().filter(|r| r.processors == 1).all(|r| r.wait_time == 0.0));
            assert_eq!(summary.series[&1].max_wait, 0.0);
            assert_eq!(summary.series.len(), 3);
        }
    }

    #[test]
    fn session_is_reproducible() {
        let a = SessionRunner::new(small_config(), 42).unwrap();
        let b = SessionRunner::new(small_config(), 42).unwrap();
        for dist in Distribution::ALL {
            assert_eq!(sweep_to_rows(&a, dist).1, sweep_to_rows(&b, dist).1);
        }
    }

    #[test]
    fn session_cycle_limit_counted() {
        let config = SessionConfig {
            processor_configs: vec![2],
            max_modules: 1,
            max_cycles: Some(1),
            ..SessionConfig::default()
        };
        let runner = SessionRunner::new(config, 1).unwrap();
        let (summary, _) = sweep_to_rows(&runner, Distribution::Uniform);
        assert_eq!(summary.cycle_limited, 1);
        assert_eq!(summary.total_cycles, 1);
    }

    #[test]
    fn session_rejects_invalid_config() {
        let config = SessionConfig {
            processor_configs: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(SessionRunner::new(config, 1).is_err());
    }
}
