/// All errors that can occur while reading or mutating hackathon data.
#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// An id-addressed entity does not exist in the store.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// No team carries the given join code.
    #[error("no team found with join code {0}")]
    JoinCodeNotFound(String),

    /// The user is already on the team they tried to join.
    #[error("user {user_id} is already a member of team {team_id}")]
    AlreadyMember { user_id: u32, team_id: u32 },

    /// The voter has already voted for this project.
    #[error("user {voter_id} has already voted for project {project_id}")]
    AlreadyVoted { voter_id: u32, project_id: u32 },

    /// The data source is momentarily unable to answer.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The live channel is not connected.
    #[error("live channel is not connected")]
    Disconnected,

    /// Configuration could not be extracted from its sources.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A configuration field holds a value the crate cannot run with.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl From<figment::Error> for LeaderboardError {
    fn from(err: figment::Error) -> Self {
        LeaderboardError::Config(Box::new(err))
    }
}

impl LeaderboardError {
    pub(crate) fn not_found(entity: &'static str, id: u32) -> Self {
        LeaderboardError::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
