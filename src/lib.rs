//! Leaderboard ranking and live snapshot delivery for hackathon events.
//!
//! [`compute_leaderboard`] is the pure ranking step. [`LeaderboardService`]
//! reads a [`Directory`] and ranks on demand, and [`LiveChannel`] pushes fresh
//! snapshots to subscribers on a fixed interval. [`MemoryStore`] is the
//! in-memory data layer behind both.

pub use config::LeaderboardConfig;
pub use error::{LeaderboardError, Result};
pub use leaderboard::LeaderboardService;
pub use live::{LiveChannel, Subscription, SubscriptionState};
pub use model::*;
pub use ranking::{compute_leaderboard, rank_projects, RankingEngine, RankingPolicy};
pub use store::{Directory, MemoryStore};

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod live;
pub mod model;
pub mod ranking;
pub mod store;
