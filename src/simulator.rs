//! Discrete-cycle contention simulator: request arbitration, wait accounting, convergence.

use crate::config::SimulatorConfig;
use crate::core::{Cycle, ModuleId, Process, ProcessId};
use crate::error::Result;
use crate::memory::MemoryModule;
use crate::metrics::{average_wait_time, Convergence};
use crate::request::{Distribution, RequestGenerator};
use crate::rng::{seeded, SimRng};
use rand::Rng;
use tracing::{debug, warn};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Successive averages differ by less than the convergence threshold.
    Converged,
    /// The configured cycle bound was reached first.
    CycleLimit,
}

/// Outcome of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub processes: usize,
    pub modules: usize,
    pub distribution: Distribution,
    pub average_wait: f64,
    pub cycles: Cycle,
    pub termination: Termination,
}

/// N processes contending for M memory modules.
///
/// Owns every process, module and queue of the run; dropped when the run ends.
#[derive(Debug)]
pub struct Simulator<R = SimRng> {
    processes: Vec<Process>,
    modules: Vec<MemoryModule>,
    requests: RequestGenerator,
    rng: R,
    convergence: Convergence,
    max_cycles: Option<Cycle>,
    current_cycle: Cycle,
    current_average: f64,
}

impl Simulator<SimRng> {
    /// Simulator driven by a ChaCha8 generator seeded with `seed`.
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Result<Self> {
        Self::new(config, seeded(seed))
    }
}

impl<R: Rng> Simulator<R> {
    /// Sets up all modules free and unattached, then issues each process's
    /// first request.
    pub fn new(config: SimulatorConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let mut requests = RequestGenerator::new(
            config.distribution,
            config.process_count,
            config.module_count,
            config.sigma_divisor,
        );
        let processes = (0..config.process_count)
            .map(|i| {
                let id = ProcessId(i);
                let target = requests.next_request(id, &mut rng);
                Process::new(id, target)
            })
            .collect();
        let modules = (0..config.module_count).map(|_| MemoryModule::new()).collect();
        Ok(Self {
            processes,
            modules,
            requests,
            rng,
            convergence: Convergence::new(config.convergence_threshold, config.zero_average_floor),
            max_cycles: config.max_cycles,
            current_cycle: 0,
            current_average: 0.0,
        })
    }

    /// Runs one cycle and returns the running average wait time.
    pub fn step(&mut self) -> f64 {
        self.current_cycle += 1;

        // 1) Classify: grant access or wait.
        for process in self.processes.iter_mut() {
            let target = process.target;
            if self.modules[target.0].grants(process.id) {
                let next = self.requests.next_request(process.id, &mut self.rng);
                process.target = next;
                self.modules[next.0].attach(process.id);
            } else {
                process.wait_cycles += 1;
                self.modules[target.0].enqueue(process.id);
            }
        }

        // 2) Each module serves the head of its queue for the next cycle.
        for module in self.modules.iter_mut() {
            module.arbitrate();
        }

        self.current_average = average_wait_time(&self.processes, self.current_cycle);
        self.current_average
    }

    /// Steps until the average converges or the cycle bound is hit.
    pub fn run(&mut self) -> RunReport {
        let termination = loop {
            let average = self.step();
            if self.convergence.observe(average) {
                break Termination::Converged;
            }
            if self.max_cycles.is_some_and(|limit| self.current_cycle >= limit) {
                warn!(
                    processes = self.processes.len(),
                    modules = self.modules.len(),
                    cycles = self.current_cycle,
                    difference = self.convergence.last_difference(),
                    "run stopped at cycle limit before converging"
                );
                break Termination::CycleLimit;
            }
        };

        let report = RunReport {
            processes: self.processes.len(),
            modules: self.modules.len(),
            distribution: self.requests.distribution(),
            average_wait: self.current_average,
            cycles: self.current_cycle,
            termination,
        };
        debug!(
            processes = report.processes,
            modules = report.modules,
            distribution = %report.distribution,
            cycles = report.cycles,
            average_wait = report.average_wait,
            "run finished"
        );
        report
    }

    pub fn current_cycle(&self) -> Cycle {
        self.current_cycle
    }

    pub fn average_wait(&self) -> f64 {
        self.current_average
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn modules(&self) -> &[MemoryModule] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&MemoryModule> {
        self.modules.get(id.0)
    }

    pub fn requests(&self) -> &RequestGenerator {
        &self.requests
    }
}
