//! Simulation configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Run parameters for one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Number of ticks to advance the graph.
    pub ticks: u64,
    /// Seconds per tick.
    pub delta: f32,
    /// Seed for randomized pauses.
    pub seed: u64,
    /// Tick at which the intruder enters the corridor, if ever.
    pub intruder_tick: Option<u64>,
    /// Directory for an additional log file.
    pub log_dir: Option<PathBuf>,
    /// Print one JSON snapshot per tick on stdout.
    pub json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta: 0.1,
            seed: 7,
            intruder_tick: Some(200),
            log_dir: None,
            json: false,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GUARD_SIM_TICKS` - Ticks to simulate (default: 600)
    /// - `GUARD_SIM_DELTA` - Seconds per tick (default: 0.1)
    /// - `GUARD_SIM_SEED` - Random seed (default: 7)
    /// - `GUARD_SIM_INTRUDER_TICK` - Intruder arrival tick, `none` to disable (default: 200)
    /// - `GUARD_SIM_LOG_DIR` - Also write logs to `guard-sim.log` in this directory
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u64>("GUARD_SIM_TICKS") {
            config.ticks = ticks;
        }

        if let Some(delta) = read_env::<f32>("GUARD_SIM_DELTA") {
            config.delta = delta.max(0.0);
        }

        if let Some(seed) = read_env::<u64>("GUARD_SIM_SEED") {
            config.seed = seed;
        }

        match env::var("GUARD_SIM_INTRUDER_TICK").ok().as_deref() {
            Some("none") => config.intruder_tick = None,
            Some(value) => {
                if let Ok(tick) = value.parse() {
                    config.intruder_tick = Some(tick);
                }
            }
            None => {}
        }

        config.log_dir = env::var("GUARD_SIM_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_an_intruder() {
        let config = SimConfig::default();
        assert_eq!(config.intruder_tick, Some(200));
        assert!(config.delta > 0.0);
        assert!(!config.json);
    }
}
