use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked row of a hackathon leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub project_id: u32,
    pub team_name: String,
    pub project_title: String,
    pub vote_count: u32,
}

/// A point-in-time leaderboard pushed to live subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub hackathon_id: u32,
    pub entries: Vec<LeaderboardEntry>,
    pub computed_at: DateTime<Utc>,
}
