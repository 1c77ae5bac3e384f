//! Simulation settings read from the environment.

use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Settings for a batch of rollouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Seed for the board layout and every random choice (`SIM_SEED`)
    pub seed: u64,
    /// Number of players, 2-4 (`SIM_PLAYERS`)
    pub players: u8,
    /// Independent rollouts from the same setup (`SIM_ROLLOUTS`)
    pub rollouts: usize,
    /// Rounds per rollout (`SIM_ROUNDS`)
    pub rounds: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            players: 4,
            rollouts: 8,
            rounds: 10,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            seed: parse_var(&lookup, "SIM_SEED", defaults.seed)?,
            players: parse_var(&lookup, "SIM_PLAYERS", defaults.players)?,
            rollouts: parse_var(&lookup, "SIM_ROLLOUTS", defaults.rollouts)?,
            rounds: parse_var(&lookup, "SIM_ROUNDS", defaults.rounds)?,
        };

        if !(2..=4).contains(&config.players) {
            bail!("SIM_PLAYERS must be between 2 and 4, got {}", config.players);
        }
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SimConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = SimConfig::from_lookup(lookup_from(&[
            ("SIM_SEED", "7"),
            ("SIM_PLAYERS", " 3 "),
            ("SIM_ROUNDS", "25"),
        ]))
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.players, 3);
        assert_eq!(config.rounds, 25);
        assert_eq!(config.rollouts, 8);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(SimConfig::from_lookup(lookup_from(&[("SIM_SEED", "abc")])).is_err());
        assert!(SimConfig::from_lookup(lookup_from(&[("SIM_PLAYERS", "5")])).is_err());
        assert!(SimConfig::from_lookup(lookup_from(&[("SIM_PLAYERS", "1")])).is_err());
    }
}
