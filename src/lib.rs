//! Memory contention simulator: processes competing for shared memory modules
//! under FIFO arbitration, swept over processor/module counts and request distributions.

pub mod config;
pub mod core;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod queue;
pub mod request;
pub mod results;
pub mod rng;
pub mod session;
pub mod simulator;

pub use crate::config::{SessionConfig, SimulatorConfig};
pub use crate::error::{Result, SimError};
pub use crate::request::Distribution;
pub use crate::session::SessionRunner;
pub use crate::simulator::Simulator;
