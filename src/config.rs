//! Sweep and per-run configuration, with optional TOML overrides.

use crate::error::{Result, SimError};
use crate::metrics::{DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_ZERO_AVERAGE_FLOOR};
use crate::request::Distribution;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Processor counts swept by default.
pub const DEFAULT_PROCESSOR_CONFIGS: [usize; 6] = [2, 4, 8, 16, 32, 64];

/// Largest module count swept by default.
pub const DEFAULT_MAX_MODULES: usize = 2048;

/// Gaussian standard deviation is `modules / DEFAULT_SIGMA_DIVISOR`.
pub const DEFAULT_SIGMA_DIVISOR: f64 = 3.0;

/// Parameters of a full sweep. Every field may be omitted from the TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub processor_configs: Vec<usize>,
    pub max_modules: usize,
    pub convergence_threshold: f64,
    pub zero_average_floor: f64,
    pub sigma_divisor: f64,
    /// Per-run safety bound. `None` runs until convergence.
    pub max_cycles: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            processor_configs: DEFAULT_PROCESSOR_CONFIGS.to_vec(),
            max_modules: DEFAULT_MAX_MODULES,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            zero_average_floor: DEFAULT_ZERO_AVERAGE_FLOOR,
            sigma_divisor: DEFAULT_SIGMA_DIVISOR,
            max_cycles: None,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.processor_configs.is_empty() {
            return Err(SimError::Config("processor_configs is empty".into()));
        }
        if self.processor_configs.contains(&0) {
            return Err(SimError::Config("processor count must be positive".into()));
        }
        if self.max_modules == 0 {
            return Err(SimError::Config("max_modules must be positive".into()));
        }
        check_positive("convergence_threshold", self.convergence_threshold)?;
        check_positive("zero_average_floor", self.zero_average_floor)?;
        check_positive("sigma_divisor", self.sigma_divisor)?;
        if self.max_cycles == Some(0) {
            return Err(SimError::Config("max_cycles must be positive".into()));
        }
        Ok(())
    }

    /// Per-run configuration for one point of the sweep.
    pub fn simulator_config(
        &self,
        distribution: Distribution,
        process_count: usize,
        module_count: usize,
    ) -> SimulatorConfig {
        SimulatorConfig {
            process_count,
            module_count,
            distribution,
            convergence_threshold: self.convergence_threshold,
            zero_average_floor: self.zero_average_floor,
            sigma_divisor: self.sigma_divisor,
            max_cycles: self.max_cycles,
        }
    }

    /// Number of runs per distribution.
    pub fn runs_per_distribution(&self) -> usize {
        self.processor_configs.len() * self.max_modules
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// Configuration of a single simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    pub process_count: usize,
    pub module_count: usize,
    pub distribution: Distribution,
    pub convergence_threshold: f64,
    pub zero_average_floor: f64,
    pub sigma_divisor: f64,
    pub max_cycles: Option<u64>,
}

impl SimulatorConfig {
    /// Default thresholds, unbounded cycles.
    pub fn new(process_count: usize, module_count: usize, distribution: Distribution) -> Self {
        SessionConfig::default().simulator_config(distribution, process_count, module_count)
    }

    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.process_count == 0 {
            return Err(SimError::Config("process_count must be positive".into()));
        }
        if self.module_count == 0 {
            return Err(SimError::Config("module_count must be positive".into()));
        }
        check_positive("convergence_threshold", self.convergence_threshold)?;
        check_positive("zero_average_floor", self.zero_average_floor)?;
        check_positive("sigma_divisor", self.sigma_divisor)?;
        if self.max_cycles == Some(0) {
            return Err(SimError::Config("max_cycles must be positive".into()));
        }
        Ok(())
    }
}
