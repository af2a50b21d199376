mod hackathon;
mod leaderboard;
mod project;
mod team;
mod user;
mod vote;

pub use hackathon::*;
pub use leaderboard::*;
pub use project::*;
pub use team::*;
pub use user::*;
pub use vote::*;
