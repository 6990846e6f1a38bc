//! Corridor guard simulation.
//!
//! Runs a guard driven by a behavior graph for a fixed number of ticks: the
//! guard patrols waypoints, sweeps each one with two scans that meet at a
//! join, and drops everything to chase an intruder once one is in sight.
//!
//! # Examples
//!
//! ```bash
//! # Default run, transitions on stderr
//! cargo run -p guard-sim
//!
//! # One JSON snapshot per tick, no intruder
//! cargo run -p guard-sim -- --json --no-intruder > snapshots.jsonl
//! ```

mod config;
mod logging;
mod sim;
mod tree;
mod world;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use config::SimConfig;
use sim::Simulation;

/// Corridor guard simulation driven by a behavior graph
#[derive(Parser, Debug)]
#[command(name = "guard-sim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ticks to simulate [env: GUARD_SIM_TICKS]
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds per tick [env: GUARD_SIM_DELTA]
    #[arg(long)]
    delta: Option<f32>,

    /// Seed for randomized pauses [env: GUARD_SIM_SEED]
    #[arg(long)]
    seed: Option<u64>,

    /// Tick at which the intruder appears [env: GUARD_SIM_INTRUDER_TICK]
    #[arg(long, conflicts_with = "no_intruder")]
    intruder_tick: Option<u64>,

    /// Run without an intruder
    #[arg(long)]
    no_intruder: bool,

    /// Also write logs to this directory [env: GUARD_SIM_LOG_DIR]
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print one JSON snapshot per tick on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the environment.
    fn apply(self, config: &mut SimConfig) {
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(delta) = self.delta {
            config.delta = delta.max(0.0);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.no_intruder {
            config.intruder_tick = None;
        } else if let Some(tick) = self.intruder_tick {
            config.intruder_tick = Some(tick);
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = Some(dir);
        }
        config.json |= self.json;
    }
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = SimConfig::from_env();
    Cli::parse().apply(&mut config);

    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!(
        ticks = config.ticks,
        delta = config.delta,
        seed = config.seed,
        intruder_tick = ?config.intruder_tick,
        "Starting guard simulation"
    );

    let mut sim = Simulation::new(&config)?;
    tracing::debug!(nodes = sim.graph().len(), "Guard graph built");
    let snapshot = sim.start();
    if config.json {
        println!("{}", serde_json::to_string(snapshot)?);
    }

    for _ in 0..config.ticks {
        let snapshot = sim.step();
        if config.json {
            println!("{}", serde_json::to_string(snapshot)?);
        }
    }

    let summary = sim.finish();
    if config.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{summary}");
    }

    tracing::info!("Simulation complete");
    Ok(())
}
