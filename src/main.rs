//! Sweeps processor/module configurations under uniform and Gaussian request
//! distributions and writes one converged wait-time row per run.
//!
//! ```bash
//! # logs/uniformLogs.csv, logs/gaussianLogs.csv, seed 1
//! memory-contention-simulator
//! memory-contention-simulator u.csv g.csv 42 --max-modules 256 --processors 2,4
//! ```

use clap::Parser;
use memory_contention_simulator::config::SessionConfig;
use memory_contention_simulator::request::Distribution;
use memory_contention_simulator::session::{SessionRunner, SessionSummary};
use memory_contention_simulator::Result;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Memory contention simulator.
///
/// Deterministic for a given seed and configuration.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output log for uniform-distribution runs
    #[arg(default_value = "logs/uniformLogs.csv")]
    uniform_log: PathBuf,

    /// Output log for Gaussian-distribution runs
    #[arg(default_value = "logs/gaussianLogs.csv")]
    gaussian_log: PathBuf,

    /// Random seed
    #[arg(default_value_t = 1)]
    seed: u64,

    /// TOML file overriding sweep parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Largest module count to sweep
    #[arg(long)]
    max_modules: Option<usize>,

    /// Processor counts to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    processors: Option<Vec<usize>>,

    /// Stop any run that has not converged after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(max_modules) = args.max_modules {
        config.max_modules = max_modules;
    }
    if let Some(processors) = &args.processors {
        config.processor_configs = processors.clone();
    }
    if args.max_cycles.is_some() {
        config.max_cycles = args.max_cycles;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &SessionSummary) {
    for distribution in Distribution::ALL {
        let sweep = summary.get(distribution);
        println!("\n--- {} distribution ---", distribution);
        println!("  Runs:                {}", sweep.runs);
        println!("  Simulated cycles:    {}", sweep.total_cycles);
        if sweep.cycle_limited > 0 {
            println!("  Hit cycle limit:     {}", sweep.cycle_limited);
        }
        println!(
            "  {:>10} {:>12} {:>12} {:>12}",
            "processors", "min wait", "max wait", "mean wait"
        );
        for (processors, series) in &sweep.series {
            println!(
                "  {:>10} {:>12.6} {:>12.6} {:>12.6}",
                processors, series.min_wait, series.max_wait, series.mean_wait
            );
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        seed = args.seed,
        processors = ?config.processor_configs,
        max_modules = config.max_modules,
        max_cycles = ?config.max_cycles,
        uniform_log = %args.uniform_log.display(),
        gaussian_log = %args.gaussian_log.display(),
        "starting session"
    );

    let runner = SessionRunner::new(config, args.seed)?;
    let summary = runner.run(&args.uniform_log, &args.gaussian_log)?;

    println!("=== Memory Contention Simulation ===");
    print_summary(&summary);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,memory_contention_simulator=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!(error = %e, "session failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
