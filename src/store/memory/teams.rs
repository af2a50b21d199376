use std::collections::HashSet;

use tracing::{debug, instrument};

use super::MemoryStore;
use crate::error::{LeaderboardError, Result};
use crate::model::{NewTeam, Team, TeamDetails, TeamMember, TeamPatch};

impl MemoryStore {
    #[instrument(skip(self))]
    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.pause().await;
        Ok(self.read().teams.clone())
    }

    /// Fetch a team with its members resolved to users.
    ///
    /// Memberships pointing at unknown users are skipped.
    #[instrument(skip(self))]
    pub async fn team(&self, id: u32) -> Result<TeamDetails> {
        self.pause().await;
        let tables = self.read();
        let team = tables
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| LeaderboardError::not_found("team", id))?;
        let members = tables
            .members
            .iter()
            .filter(|m| m.team_id == id)
            .filter_map(|m| tables.users.iter().find(|u| u.id == m.user_id).cloned())
            .collect();
        Ok(TeamDetails { team, members })
    }

    #[instrument(skip(self))]
    pub async fn teams_by_hackathon(&self, hackathon_id: u32) -> Result<Vec<Team>> {
        self.pause().await;
        let teams: Vec<Team> = self
            .read()
            .teams
            .iter()
            .filter(|t| t.hackathon_id == hackathon_id)
            .cloned()
            .collect();
        debug!(count = teams.len(), hackathon_id, "listed hackathon teams");
        Ok(teams)
    }

    #[instrument(skip(self))]
    pub async fn teams_by_user(&self, user_id: u32) -> Result<Vec<Team>> {
        self.pause().await;
        let tables = self.read();
        let team_ids: HashSet<u32> = tables
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.team_id)
            .collect();
        Ok(tables
            .teams
            .iter()
            .filter(|t| team_ids.contains(&t.id))
            .cloned()
            .collect())
    }

    /// Register a team. The leader becomes its first member.
    #[instrument(skip(self, new), fields(name = %new.name, hackathon_id = new.hackathon_id))]
    pub async fn create_team(&self, new: NewTeam) -> Result<Team> {
        self.pause().await;
        let mut tables = self.write();
        let team = Team {
            id: tables.team_ids.next(),
            name: new.name,
            hackathon_id: new.hackathon_id,
            leader_id: new.leader_id,
            join_code: new.join_code,
            hackathon_name: new.hackathon_name,
            project_submitted: false,
        };
        let member = TeamMember {
            id: tables.member_ids.next(),
            user_id: team.leader_id,
            team_id: team.id,
        };
        tables.teams.push(team.clone());
        tables.members.push(member);
        debug!(id = team.id, "created team");
        Ok(team)
    }

    /// Add `user_id` to the team identified by `join_code`.
    #[instrument(skip(self))]
    pub async fn join_team(&self, user_id: u32, join_code: &str) -> Result<Team> {
        self.pause().await;
        let mut tables = self.write();
        let team = tables
            .teams
            .iter()
            .find(|t| t.join_code == join_code)
            .cloned()
            .ok_or_else(|| LeaderboardError::JoinCodeNotFound(join_code.to_string()))?;

        if tables
            .members
            .iter()
            .any(|m| m.team_id == team.id && m.user_id == user_id)
        {
            return Err(LeaderboardError::AlreadyMember {
                user_id,
                team_id: team.id,
            });
        }

        let member = TeamMember {
            id: tables.member_ids.next(),
            user_id,
            team_id: team.id,
        };
        tables.members.push(member);
        debug!(user_id, team_id = team.id, "user joined team");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn update_team(&self, id: u32, patch: TeamPatch) -> Result<Team> {
        self.pause().await;
        let mut tables = self.write();
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LeaderboardError::not_found("team", id))?;
        team.apply(patch);
        Ok(team.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_team_details_resolve_members() {
        let store = MemoryStore::seeded();

        let details = store.team(1).await.unwrap();

        assert_eq!(details.team.name, "Code Wizards");
        assert_eq!(
            details.members.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![3, 6]
        );
    }

    #[tokio::test]
    async fn test_teams_by_hackathon_and_user() {
        let store = MemoryStore::seeded();

        assert_eq!(store.teams_by_hackathon(1).await.unwrap().len(), 2);
        assert!(store.teams_by_hackathon(3).await.unwrap().is_empty());

        let participant_teams = store.teams_by_user(3).await.unwrap();
        assert_eq!(
            participant_teams.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn test_create_team_adds_leader() {
        let store = MemoryStore::seeded();

        let team = store
            .create_team(NewTeam {
                name: "Borrow Checkers".to_string(),
                hackathon_id: 2,
                leader_id: 7,
                join_code: "BC000".to_string(),
                hackathon_name: None,
            })
            .await
            .unwrap();

        assert_eq!(team.id, 4);
        assert!(!team.project_submitted);
        let details = store.team(team.id).await.unwrap();
        assert_eq!(details.members.len(), 1);
        assert_eq!(details.members[0].id, 7);
    }

    #[tokio::test]
    async fn test_join_team_rules() {
        let store = MemoryStore::seeded();

        let team = store.join_team(4, "CW123").await.unwrap();
        assert_eq!(team.id, 1);
        assert_eq!(store.team(1).await.unwrap().members.len(), 3);

        assert!(matches!(
            store.join_team(4, "CW123").await,
            Err(LeaderboardError::AlreadyMember {
                user_id: 4,
                team_id: 1
            })
        ));
        assert!(matches!(
            store.join_team(4, "NOPE").await,
            Err(LeaderboardError::JoinCodeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_team() {
        let store = MemoryStore::seeded();

        let team = store
            .update_team(
                2,
                TeamPatch {
                    name: Some("Data Diggers".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(team.name, "Data Diggers");
        assert_eq!(team.join_code, "DM456");
        assert!(store.update_team(9, TeamPatch::default()).await.is_err());
    }
}
