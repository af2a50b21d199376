use std::collections::HashSet;

use tracing::{debug, instrument};

use super::MemoryStore;
use crate::error::{LeaderboardError, Result};
use crate::model::{NewProject, Project, ProjectPatch};

impl MemoryStore {
    #[instrument(skip(self))]
    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.pause().await;
        Ok(self.read().projects.clone())
    }

    #[instrument(skip(self))]
    pub async fn project(&self, id: u32) -> Result<Project> {
        self.pause().await;
        self.read()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| LeaderboardError::not_found("project", id))
    }

    /// The project a team submitted, if any.
    #[instrument(skip(self))]
    pub async fn project_by_team(&self, team_id: u32) -> Result<Option<Project>> {
        self.pause().await;
        Ok(self
            .read()
            .projects
            .iter()
            .find(|p| p.team_id == team_id)
            .cloned())
    }

    /// Projects of every team registered under the hackathon, approved or not.
    #[instrument(skip(self))]
    pub async fn projects_by_hackathon(&self, hackathon_id: u32) -> Result<Vec<Project>> {
        self.pause().await;
        let tables = self.read();
        let team_ids: HashSet<u32> = tables
            .teams
            .iter()
            .filter(|t| t.hackathon_id == hackathon_id)
            .map(|t| t.id)
            .collect();
        let projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| team_ids.contains(&p.team_id))
            .cloned()
            .collect();
        debug!(count = projects.len(), hackathon_id, "listed hackathon projects");
        Ok(projects)
    }

    /// Submit a project. It starts unapproved with no votes and marks the
    /// owning team as having submitted.
    #[instrument(skip(self, new), fields(team_id = new.team_id, title = %new.title))]
    pub async fn create_project(&self, new: NewProject) -> Result<Project> {
        self.pause().await;
        let mut tables = self.write();
        let project = Project {
            id: tables.project_ids.next(),
            team_id: new.team_id,
            title: new.title,
            description: new.description,
            repo_link: new.repo_link,
            demo_link: new.demo_link,
            approved: false,
            team_name: new.team_name,
            vote_count: Some(0),
        };
        if let Some(team) = tables.teams.iter_mut().find(|t| t.id == project.team_id) {
            team.project_submitted = true;
        }
        tables.projects.push(project.clone());
        debug!(id = project.id, "created project");
        Ok(project)
    }

    #[instrument(skip(self))]
    pub async fn update_project(&self, id: u32, patch: ProjectPatch) -> Result<Project> {
        self.pause().await;
        let mut tables = self.write();
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LeaderboardError::not_found("project", id))?;
        project.apply(patch);
        Ok(project.clone())
    }

    /// Set the approval flag. Only approved projects reach the leaderboard.
    #[instrument(skip(self))]
    pub async fn approve_project(&self, id: u32, approved: bool) -> Result<Project> {
        self.pause().await;
        let mut tables = self.write();
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LeaderboardError::not_found("project", id))?;
        project.approved = approved;
        debug!(id, approved, "changed project approval");
        Ok(project.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(team_id: u32) -> NewProject {
        NewProject {
            team_id,
            title: "Pipeline".to_string(),
            description: "Data pipelines for everyone".to_string(),
            repo_link: "https://github.com/dataminers/pipeline".to_string(),
            demo_link: String::new(),
            team_name: None,
        }
    }

    #[tokio::test]
    async fn test_projects_by_hackathon_include_unapproved() {
        let store = MemoryStore::seeded();

        let projects = store.projects_by_hackathon(1).await.unwrap();

        assert_eq!(
            projects.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(projects.iter().any(|p| !p.approved));
    }

    #[tokio::test]
    async fn test_create_project_marks_team() {
        let store = MemoryStore::new();
        let team = store
            .create_team(crate::model::NewTeam {
                name: "Solo".to_string(),
                hackathon_id: 1,
                leader_id: 1,
                join_code: "SOLO1".to_string(),
                hackathon_name: None,
            })
            .await
            .unwrap();

        let project = store.create_project(draft(team.id)).await.unwrap();

        assert!(!project.approved);
        assert_eq!(project.vote_count, Some(0));
        assert!(store.team(team.id).await.unwrap().team.project_submitted);
        assert_eq!(
            store.project_by_team(team.id).await.unwrap().map(|p| p.id),
            Some(project.id)
        );
    }

    #[tokio::test]
    async fn test_approve_and_update() {
        let store = MemoryStore::seeded();

        let approved = store.approve_project(3, true).await.unwrap();
        assert!(approved.approved);

        let renamed = store
            .update_project(
                3,
                ProjectPatch {
                    title: Some("SmarterCity".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "SmarterCity");
        assert!(renamed.approved);
        assert_eq!(store.project(3).await.unwrap().title, "SmarterCity");
    }

    #[tokio::test]
    async fn test_missing_project() {
        let store = MemoryStore::seeded();

        assert!(store.project(10).await.is_err());
        assert!(store.approve_project(10, true).await.is_err());
        assert_eq!(store.project_by_team(2).await.unwrap().map(|p| p.id), Some(3));
        assert!(store.project_by_team(10).await.unwrap().is_none());
    }
}
