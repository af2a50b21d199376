use serde::{Deserialize, Serialize};

/// A single voter's endorsement of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: u32,
    pub voter_id: u32,
    pub project_id: u32,
}
