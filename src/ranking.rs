use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use tracing::trace;

use crate::model::{LeaderboardEntry, Project, Team};

pub(crate) const UNKNOWN_TEAM: &str = "Unknown Team";

/// How equal vote counts are ranked.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RankingPolicy {
    /// Every row gets the next rank, ties keep discovery order (`1, 2, 3, 4`).
    #[default]
    Sequential,
    /// Ties share a rank and the next distinct count skips ahead (`1, 2, 2, 4`).
    Competition,
}

/// Stateless leaderboard calculator bound to a [`RankingPolicy`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RankingEngine {
    policy: RankingPolicy,
}

impl RankingEngine {
    pub fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    /// See [`compute_leaderboard`].
    pub fn compute(
        &self,
        hackathon_id: u32,
        teams: &[Team],
        projects: &[Project],
    ) -> Vec<LeaderboardEntry> {
        compute_leaderboard(hackathon_id, teams, projects, self.policy)
    }
}

/// Rank the approved projects of one hackathon by vote count.
///
/// Only projects owned by a team of `hackathon_id` are considered. Unknown
/// hackathons produce an empty leaderboard.
pub fn compute_leaderboard(
    hackathon_id: u32,
    teams: &[Team],
    projects: &[Project],
    policy: RankingPolicy,
) -> Vec<LeaderboardEntry> {
    let hackathon_teams = teams
        .iter()
        .filter(|team| team.hackathon_id == hackathon_id)
        .cloned()
        .collect_vec();
    let team_ids: HashSet<u32> = hackathon_teams.iter().map(|team| team.id).collect();

    let entries = rank_projects(
        projects
            .iter()
            .filter(|project| team_ids.contains(&project.team_id)),
        &hackathon_teams,
        policy,
    );
    trace!(hackathon_id, count = entries.len(), "computed leaderboard");
    entries
}

/// Rank an already scoped set of projects.
///
/// Unapproved projects are dropped. A project whose team is missing from
/// `teams` is listed under `"Unknown Team"`. The sort is stable, so equal
/// vote counts keep the order in which `projects` yielded them.
pub fn rank_projects<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    teams: &[Team],
    policy: RankingPolicy,
) -> Vec<LeaderboardEntry> {
    let team_names: HashMap<u32, &str> = teams
        .iter()
        .map(|team| (team.id, team.name.as_str()))
        .collect();

    let mut entries = projects
        .into_iter()
        .filter(|project| project.approved)
        .map(|project| LeaderboardEntry {
            rank: 0,
            project_id: project.id,
            team_name: team_names
                .get(&project.team_id)
                .copied()
                .unwrap_or(UNKNOWN_TEAM)
                .to_string(),
            project_title: project.title.clone(),
            vote_count: project.vote_count.unwrap_or(0),
        })
        .sorted_by(|a, b| b.vote_count.cmp(&a.vote_count))
        .collect_vec();

    assign_ranks(&mut entries, policy);
    entries
}

fn assign_ranks(entries: &mut [LeaderboardEntry], policy: RankingPolicy) {
    let mut previous: Option<(u32, u32)> = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        let position = index as u32 + 1;
        entry.rank = match (policy, previous) {
            (RankingPolicy::Competition, Some((votes, rank))) if votes == entry.vote_count => rank,
            _ => position,
        };
        previous = Some((entry.vote_count, entry.rank));
    }
}
