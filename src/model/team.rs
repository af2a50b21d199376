use serde::{Deserialize, Serialize};

use super::user::User;

/// A named group of participants registered under one hackathon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub hackathon_id: u32,
    pub leader_id: u32,
    pub join_code: String,
    pub hackathon_name: Option<String>,
    pub project_submitted: bool,
}

/// A team together with its resolved members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetails {
    pub team: Team,
    pub members: Vec<User>,
}

/// Membership link between a user and a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u32,
    pub user_id: u32,
    pub team_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub hackathon_id: u32,
    pub leader_id: u32,
    pub join_code: String,
    pub hackathon_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub join_code: Option<String>,
    pub leader_id: Option<u32>,
}

impl Team {
    pub(crate) fn apply(&mut self, patch: TeamPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(join_code) = patch.join_code {
            self.join_code = join_code;
        }
        if let Some(leader_id) = patch.leader_id {
            self.leader_id = leader_id;
        }
    }
}
