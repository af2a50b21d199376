use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::LeaderboardEntry;
use crate::ranking::RankingEngine;
use crate::store::Directory;

/// One-shot leaderboard reads on top of a [`Directory`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hackathon_leaderboard::Result<()> {
/// use std::sync::Arc;
/// use hackathon_leaderboard::{LeaderboardService, MemoryStore, RankingEngine};
///
/// let service = LeaderboardService::new(Arc::new(MemoryStore::seeded()), RankingEngine::default());
/// let board = service.snapshot(1).await?;
/// println!("{} ranked projects", board.len());
/// # Ok(())
/// # }
/// ```
pub struct LeaderboardService<D> {
    directory: Arc<D>,
    engine: RankingEngine,
}

impl<D> Clone for LeaderboardService<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            engine: self.engine,
        }
    }
}

impl<D: Directory> LeaderboardService<D> {
    pub fn new(directory: Arc<D>, engine: RankingEngine) -> Self {
        Self { directory, engine }
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    pub fn engine(&self) -> RankingEngine {
        self.engine
    }

    /// Compute the current leaderboard of a hackathon.
    ///
    /// Approved projects that arrive without a vote count are looked up in
    /// the directory's vote-count source. Directory faults are returned to
    /// the caller.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, hackathon_id: u32) -> Result<Vec<LeaderboardEntry>> {
        let teams = self.directory.teams_by_hackathon(hackathon_id).await?;
        let mut projects = self.directory.projects_by_hackathon(hackathon_id).await?;

        for project in projects
            .iter_mut()
            .filter(|p| p.approved && p.vote_count.is_none())
        {
            project.vote_count = Some(self.directory.vote_count(project.id).await?);
        }

        let entries = self.engine.compute(hackathon_id, &teams, &projects);
        debug!(count = entries.len(), hackathon_id, "computed leaderboard snapshot");
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::LeaderboardError;
    use crate::model::{Project, Team};
    use crate::ranking::tests::{project, team};
    use crate::ranking::RankingPolicy;
    use crate::store::MemoryStore;

    /// Directory over fixed data that can be told to fail.
    #[derive(Default)]
    pub(crate) struct FixtureDirectory {
        pub teams: Vec<Team>,
        pub projects: Vec<Project>,
        pub failing: AtomicBool,
        pub vote_lookups: AtomicUsize,
    }

    impl FixtureDirectory {
        pub(crate) fn alpha_beta() -> Self {
            Self {
                teams: vec![team(1, "Alpha", 1), team(2, "Beta", 1)],
                projects: vec![
                    project(1, 1, "Widget", true, Some(5)),
                    project(2, 2, "Gadget", true, Some(9)),
                    project(3, 2, "Secret", false, Some(100)),
                ],
                ..Default::default()
            }
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(LeaderboardError::Unavailable("fixture offline".to_string()));
            }
            Ok(())
        }
    }

    impl Directory for FixtureDirectory {
        async fn teams_by_hackathon(&self, hackathon_id: u32) -> Result<Vec<Team>> {
            self.check()?;
            Ok(self
                .teams
                .iter()
                .filter(|t| t.hackathon_id == hackathon_id)
                .cloned()
                .collect())
        }

        async fn projects_by_hackathon(&self, _hackathon_id: u32) -> Result<Vec<Project>> {
            self.check()?;
            Ok(self.projects.clone())
        }

        async fn vote_count(&self, project_id: u32) -> Result<u32> {
            self.check()?;
            self.vote_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(project_id * 10)
        }
    }

    #[tokio::test]
    async fn test_snapshot_ranks_approved_projects() {
        let service = LeaderboardService::new(
            Arc::new(FixtureDirectory::alpha_beta()),
            RankingEngine::default(),
        );

        let board = service.snapshot(1).await.unwrap();

        assert_eq!(
            board
                .iter()
                .map(|e| (e.rank, e.project_id, e.team_name.as_str(), e.vote_count))
                .collect::<Vec<_>>(),
            vec![(1, 2, "Beta", 9), (2, 1, "Alpha", 5)]
        );
    }

    #[tokio::test]
    async fn test_snapshot_propagates_directory_faults() {
        let directory = FixtureDirectory::alpha_beta();
        directory.failing.store(true, Ordering::SeqCst);
        let service = LeaderboardService::new(Arc::new(directory), RankingEngine::default());

        assert!(matches!(
            service.snapshot(1).await,
            Err(LeaderboardError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_counts_come_from_vote_source() {
        let directory = FixtureDirectory {
            teams: vec![team(1, "Alpha", 1), team(2, "Beta", 1)],
            projects: vec![
                project(1, 1, "Widget", true, None),
                project(2, 2, "Gadget", true, Some(15)),
                project(3, 2, "Draft", false, None),
            ],
            ..Default::default()
        };
        let service = LeaderboardService::new(Arc::new(directory), RankingEngine::default());

        let board = service.snapshot(1).await.unwrap();

        assert_eq!(
            board.iter().map(|e| (e.project_id, e.vote_count)).collect::<Vec<_>>(),
            vec![(2, 15), (1, 10)]
        );
        assert_eq!(service.directory().vote_lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_snapshot_sees_store_writes() {
        let store = Arc::new(MemoryStore::seeded());
        let service = LeaderboardService::new(
            Arc::clone(&store),
            RankingEngine::new(RankingPolicy::Sequential),
        );

        assert_eq!(
            service.snapshot(1).await.unwrap().len(),
            1,
            "SmartCity is not approved yet"
        );

        store.approve_project(3, true).await.unwrap();
        for voter in 10..30 {
            store.vote(voter, 3).await.unwrap();
        }

        let board = service.snapshot(1).await.unwrap();
        assert_eq!(board[0].project_title, "SmartCity");
        assert_eq!(board[0].team_name, "Data Miners");
        assert_eq!(board[0].vote_count, 20);
        assert_eq!(board[1].project_title, "EcoTracker");
        assert!(service.snapshot(99).await.unwrap().is_empty());
    }
}
