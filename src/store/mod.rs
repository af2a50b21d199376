use std::future::Future;

use crate::error::Result;
use crate::model::{Project, Team};

pub mod memory;

pub use memory::MemoryStore;

/// Read access to the team/project directory and the vote-count source.
///
/// The ranking service and the live channel only ever read through this
/// trait. Implementations are shared across tasks, so their futures must be
/// `Send`.
pub trait Directory: Send + Sync + 'static {
    /// All teams registered under a hackathon.
    fn teams_by_hackathon(
        &self,
        hackathon_id: u32,
    ) -> impl Future<Output = Result<Vec<Team>>> + Send;

    /// All projects of a hackathon's teams, approved or not.
    fn projects_by_hackathon(
        &self,
        hackathon_id: u32,
    ) -> impl Future<Output = Result<Vec<Project>>> + Send;

    /// Current accepted vote count of a project.
    fn vote_count(&self, project_id: u32) -> impl Future<Output = Result<u32>> + Send;
}
