use serde::{Deserialize, Serialize};

/// A team's submitted work item.
///
/// `vote_count` is derived from accepted votes and is only changed by the
/// voting operations of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub team_id: u32,
    pub title: String,
    pub description: String,
    pub repo_link: String,
    pub demo_link: String,
    pub approved: bool,
    pub team_name: Option<String>,
    #[serde(default)]
    pub vote_count: Option<u32>,
}

/// Fields a team provides when submitting a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub team_id: u32,
    pub title: String,
    pub description: String,
    pub repo_link: String,
    pub demo_link: String,
    pub team_name: Option<String>,
}

/// Partial update for a project's descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
}

impl Project {
    pub(crate) fn apply(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(repo_link) = patch.repo_link {
            self.repo_link = repo_link;
        }
        if let Some(demo_link) = patch.demo_link {
            self.demo_link = demo_link;
        }
    }
}
