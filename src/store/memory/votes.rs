use tracing::{debug, instrument};

use super::MemoryStore;
use crate::error::{LeaderboardError, Result};
use crate::model::Vote;

impl MemoryStore {
    #[instrument(skip(self))]
    pub async fn votes_by_project(&self, project_id: u32) -> Result<Vec<Vote>> {
        self.pause().await;
        Ok(self
            .read()
            .votes
            .iter()
            .filter(|v| v.project_id == project_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn votes_by_user(&self, voter_id: u32) -> Result<Vec<Vote>> {
        self.pause().await;
        Ok(self
            .read()
            .votes
            .iter()
            .filter(|v| v.voter_id == voter_id)
            .cloned()
            .collect())
    }

    /// Record a vote and bump the project's count.
    ///
    /// A voter may vote for a given project only once.
    #[instrument(skip(self))]
    pub async fn vote(&self, voter_id: u32, project_id: u32) -> Result<Vote> {
        self.pause().await;
        let mut tables = self.write();
        if tables
            .votes
            .iter()
            .any(|v| v.voter_id == voter_id && v.project_id == project_id)
        {
            return Err(LeaderboardError::AlreadyVoted {
                voter_id,
                project_id,
            });
        }

        let vote = Vote {
            id: tables.vote_ids.next(),
            voter_id,
            project_id,
        };
        tables.votes.push(vote.clone());
        if let Some(project) = tables.projects.iter_mut().find(|p| p.id == project_id) {
            project.vote_count = Some(project.vote_count.unwrap_or(0) + 1);
        }
        debug!(id = vote.id, "recorded vote");
        Ok(vote)
    }

    /// Withdraw a vote. Does nothing when the voter never voted for the project.
    #[instrument(skip(self))]
    pub async fn remove_vote(&self, voter_id: u32, project_id: u32) -> Result<()> {
        self.pause().await;
        let mut tables = self.write();
        let Some(index) = tables
            .votes
            .iter()
            .position(|v| v.voter_id == voter_id && v.project_id == project_id)
        else {
            return Ok(());
        };

        tables.votes.remove(index);
        if let Some(project) = tables.projects.iter_mut().find(|p| p.id == project_id) {
            project.vote_count = project.vote_count.map(|count| count.saturating_sub(1));
        }
        debug!("removed vote");
        Ok(())
    }
}
