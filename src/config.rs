//! Runtime settings for the leaderboard service and live channel.
//!
//! Sources, highest priority first:
//! 1. Environment variables with the `LEADERBOARD_` prefix
//!    (`LEADERBOARD_TICK_INTERVAL_MS=5000`, `LEADERBOARD_RANKING=competition`)
//! 2. `leaderboard.toml` in the working directory, when present
//! 3. Built-in defaults

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, Result};
use crate::ranking::RankingPolicy;

const CONFIG_FILE: &str = "leaderboard.toml";

const fn default_tick_interval_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    /// Delay between two live snapshots of the same hackathon.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Artificial latency added to every in-memory store call.
    #[serde(default)]
    pub latency_ms: u64,

    #[serde(default)]
    pub ranking: RankingPolicy,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            latency_ms: 0,
            ranking: RankingPolicy::default(),
        }
    }
}

impl LeaderboardConfig {
    /// Load and validate configuration from all sources.
    pub fn load() -> Result<Self> {
        Self::figment().extract::<Self>()?.validated()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Toml::file(CONFIG_FILE));
        }
        figment.merge(Env::prefixed("LEADERBOARD_"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    fn validated(self) -> Result<Self> {
        if self.tick_interval_ms == 0 {
            return Err(LeaderboardError::InvalidConfig {
                field: "tick_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_defaults_are_correct() {
        let config = LeaderboardConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(10));
        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.ranking, RankingPolicy::Sequential);
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    tick_interval_ms = 2000
                    ranking = "competition"
                "#,
            )?;
            jail.set_env("LEADERBOARD_TICK_INTERVAL_MS", "500");

            let config = LeaderboardConfig::load().expect("config should load");
            assert_eq!(config.tick_interval_ms, 500);
            assert_eq!(config.ranking, RankingPolicy::Competition);
            assert_eq!(config.latency_ms, 0);
            Ok(())
        });
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("LEADERBOARD_TICK_INTERVAL_MS", "0");

            let err = LeaderboardConfig::load().unwrap_err();
            assert!(matches!(
                err,
                LeaderboardError::InvalidConfig {
                    field: "tick_interval_ms",
                    ..
                }
            ));
            Ok(())
        });
    }
}
