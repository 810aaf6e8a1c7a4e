//! Memory request generator: uniform and Gaussian (locality of reference) module selection.

use crate::core::{ModuleId, ProcessId};
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

/// How processes pick the next module to access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Every module equally likely on every request.
    Uniform,
    /// Each process clusters its requests around a fixed module drawn at its first request.
    Gaussian,
}

impl Distribution {
    pub const ALL: [Distribution; 2] = [Distribution::Uniform, Distribution::Gaussian];
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Uniform => write!(f, "uniform"),
            Distribution::Gaussian => write!(f, "gaussian"),
        }
    }
}

/// Produces module requests for the processes of one run.
#[derive(Clone, Debug)]
pub struct RequestGenerator {
    distribution: Distribution,
    module_count: usize,
    sigma: f64,
    /// Per-process Gaussian centers, filled on each process's first request.
    means: Vec<Option<usize>>,
}

impl RequestGenerator {
    /// `sigma_divisor` sets the Gaussian spread to `module_count / sigma_divisor`.
    pub fn new(
        distribution: Distribution,
        process_count: usize,
        module_count: usize,
        sigma_divisor: f64,
    ) -> Self {
        Self {
            distribution,
            module_count,
            sigma: module_count as f64 / sigma_divisor,
            means: vec![None; process_count],
        }
    }

    /// Next module `process` wants. In Gaussian mode the first call for a
    /// process draws its mean uniformly, before the sample itself.
    pub fn next_request<R: Rng + ?Sized>(&mut self, process: ProcessId, rng: &mut R) -> ModuleId {
        match self.distribution {
            Distribution::Uniform => ModuleId(uniform_index(rng, self.module_count)),
            Distribution::Gaussian => {
                let mean = match self.means[process.0] {
                    Some(mean) => mean,
                    None => {
                        let mean = uniform_index(rng, self.module_count);
                        self.means[process.0] = Some(mean);
                        mean
                    }
                };
                let z = box_muller(rng, mean as f64, self.sigma);
                ModuleId(wrap_index(z, self.module_count))
            }
        }
    }

    /// Gaussian center for `process`, once it has issued a request.
    pub fn mean_of(&self, process: ProcessId) -> Option<usize> {
        self.means.get(process.0).copied().flatten()
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

/// Uniform index in `[0, bound)`. A single unbiased range draw.
pub fn uniform_index<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> usize {
    rng.gen_range(0..bound)
}

/// Normal sample via the Box-Muller transform.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    // (0, 1] keeps ln() finite.
    let x: f64 = 1.0 - rng.gen::<f64>();
    let y: f64 = rng.gen();
    mean + (-2.0 * x.ln()).sqrt() * (2.0 * PI * y).cos() * sigma
}

/// Truncates `z` toward zero, reduces it modulo `module_count` and takes the
/// absolute value, landing in `[0, module_count)`.
pub fn wrap_index(z: f64, module_count: usize) -> usize {
    let truncated = z as i64;
    (truncated % module_count as i64).unsigned_abs() as usize
}
