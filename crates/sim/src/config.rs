//! Simulation settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless run configuration.
///
/// Environment variables:
/// - `SIM_SEED` - session seed (default: 1)
/// - `SIM_DURATION_SECS` - simulated seconds (default: 300)
/// - `SIM_TICK_RATE` - fixed steps per simulated second (default: 60)
/// - `SIM_DATA_DIR` - content directory (default: built-in content)
/// - `SIM_SHIP` - ship id (default: `interceptor`)
/// - `SIM_SAVE_FILE` - meta progression save, JSON (optional)
/// - `SIM_EVENTS_FILE` - write every combat event as JSON lines (optional)
/// - `SIM_LOG_DIR` - also write logs to `<dir>/sim.log` (optional)
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub seed: u64,
    pub duration_secs: f64,
    pub tick_rate: u32,
    pub data_dir: Option<PathBuf>,
    pub ship: String,
    pub save_file: Option<PathBuf>,
    pub events_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            duration_secs: 300.0,
            tick_rate: 60,
            data_dir: None,
            ship: "interceptor".to_string(),
            save_file: None,
            events_file: None,
            log_dir: None,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }
        if let Some(duration) = read_env::<f64>("SIM_DURATION_SECS").filter(|d| d.is_finite()) {
            config.duration_secs = duration.max(0.0);
        }
        if let Some(rate) = read_env::<u32>("SIM_TICK_RATE") {
            config.tick_rate = rate.clamp(1, 1000);
        }
        if let Some(ship) = read_env::<String>("SIM_SHIP") {
            config.ship = ship;
        }
        config.data_dir = read_env::<PathBuf>("SIM_DATA_DIR");
        config.save_file = read_env::<PathBuf>("SIM_SAVE_FILE");
        config.events_file = read_env::<PathBuf>("SIM_EVENTS_FILE");
        config.log_dir = read_env::<PathBuf>("SIM_LOG_DIR");

        config
    }

    /// Seconds per fixed step.
    pub fn step(&self) -> f64 {
        1.0 / f64::from(self.tick_rate)
    }

    /// Number of fixed steps covering the configured duration.
    pub fn frames(&self) -> u64 {
        (self.duration_secs * f64::from(self.tick_rate)).round() as u64
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let value = env::var(key).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cover_duration() {
        let config = SimConfig {
            duration_secs: 2.5,
            tick_rate: 60,
            ..SimConfig::default()
        };
        assert_eq!(config.frames(), 150);
        assert!((config.step() - 1.0 / 60.0).abs() < 1e-12);
    }
}
