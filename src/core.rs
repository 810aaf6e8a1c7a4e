//! Core model: cycles, process and module identifiers, and the process record.

use std::fmt;

/// Global simulation cycle counter (discrete time).
pub type Cycle = u64;

/// Identifies a process (0..N).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

/// Identifies a memory module (0..M).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

/// A processor issuing memory requests.
#[derive(Clone, Debug)]
pub struct Process {
    pub id: ProcessId,
    /// Module this process is currently trying to access.
    pub target: ModuleId,
    /// Cycles spent waiting for a module since the run started.
    pub wait_cycles: u64,
    /// Fixed at the process index. Arbitration is strictly FIFO and never reads it.
    pub priority: usize,
}

impl Process {
    pub fn new(id: ProcessId, target: ModuleId) -> Self {
        Self {
            id,
            target,
            wait_cycles: 0,
            priority: id.0,
        }
    }

    /// Average wait per elapsed cycle for this process.
    pub fn wait_rate(&self, elapsed: Cycle) -> f64 {
        if elapsed == 0 {
            return 0.0;
        }
        self.wait_cycles as f64 / elapsed as f64
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_creation() {
        let p = Process::new(ProcessId(3), ModuleId(7));
        assert_eq!(p.priority, 3);
        assert_eq!(p.wait_cycles, 0);
        assert_eq!(p.target, ModuleId(7));
    }

    #[test]
    fn process_wait_rate() {
        let mut p = Process::new(ProcessId(0), ModuleId(0));
        assert_eq!(p.wait_rate(0), 0.0);
        p.wait_cycles = 3;
        assert!((p.wait_rate(4) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn identifiers_display() {
        assert_eq!(ProcessId(2).to_string(), "P2");
        assert_eq!(ModuleId(5).to_string(), "M5");
    }
}
