//! In-memory stand-in for the hackathon backend.
//!
//! Every collection lives behind one [`RwLock`]. Operations first await the
//! configured latency and then take the lock, so no guard is ever held
//! across an await point.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{LeaderboardError, Result};
use crate::model::{Hackathon, Project, Team, TeamMember, User, UserRole, Vote};
use crate::store::Directory;

mod hackathons;
mod projects;
mod teams;
mod users;
mod votes;

/// Monotonic id allocator for one collection.
#[derive(Debug, Default)]
struct Sequence(u32);

impl Sequence {
    fn starting_after(last: u32) -> Self {
        Self(last)
    }

    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct Tables {
    hackathons: Vec<Hackathon>,
    teams: Vec<Team>,
    members: Vec<TeamMember>,
    projects: Vec<Project>,
    votes: Vec<Vote>,
    users: Vec<User>,
    hackathon_ids: Sequence,
    team_ids: Sequence,
    member_ids: Sequence,
    project_ids: Sequence,
    vote_ids: Sequence,
    user_ids: Sequence,
}

/// Shared, mutable, process-wide data store.
///
/// Wrap it in an [`Arc`](std::sync::Arc) to hand it to a
/// [`LeaderboardService`](crate::LeaderboardService) or
/// [`LiveChannel`](crate::LiveChannel) while keeping write access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    latency: Duration,
}

impl MemoryStore {
    /// An empty store that answers without delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the demo dataset.
    pub fn seeded() -> Self {
        Self {
            tables: RwLock::new(seed()),
            latency: Duration::ZERO,
        }
    }

    /// Delay every operation by `latency` to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Directory for MemoryStore {
    async fn teams_by_hackathon(&self, hackathon_id: u32) -> Result<Vec<Team>> {
        MemoryStore::teams_by_hackathon(self, hackathon_id).await
    }

    async fn projects_by_hackathon(&self, hackathon_id: u32) -> Result<Vec<Project>> {
        MemoryStore::projects_by_hackathon(self, hackathon_id).await
    }

    #[instrument(skip(self))]
    async fn vote_count(&self, project_id: u32) -> Result<u32> {
        self.pause().await;
        self.read()
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.vote_count.unwrap_or(0))
            .ok_or_else(|| LeaderboardError::not_found("project", project_id))
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed() -> Tables {
    let hackathons = vec![
        Hackathon {
            id: 1,
            name: "Innovation Challenge 2025".to_string(),
            description: "Build solutions for sustainable development".to_string(),
            date: date(2025, 6, 15),
            location: "Virtual Event".to_string(),
            organiser_id: 2,
            organiser_name: Some("Organiser User".to_string()),
            is_active: true,
        },
        Hackathon {
            id: 2,
            name: "Tech for Good Hackathon".to_string(),
            description: "Creating technology solutions for social impact".to_string(),
            date: date(2025, 7, 20),
            location: "San Francisco, CA".to_string(),
            organiser_id: 2,
            organiser_name: Some("Organiser User".to_string()),
            is_active: true,
        },
        Hackathon {
            id: 3,
            name: "AI Innovations Hackathon".to_string(),
            description: "Exploring the frontiers of artificial intelligence".to_string(),
            date: date(2025, 8, 10),
            location: "Boston, MA".to_string(),
            organiser_id: 5,
            organiser_name: Some("Other Organiser".to_string()),
            is_active: false,
        },
    ];

    let team = |id: u32, name: &str, hackathon_id: u32, leader_id: u32, code: &str, submitted: bool| {
        Team {
            id,
            name: name.to_string(),
            hackathon_id,
            leader_id,
            join_code: code.to_string(),
            hackathon_name: hackathons
                .iter()
                .find(|h| h.id == hackathon_id)
                .map(|h| h.name.clone()),
            project_submitted: submitted,
        }
    };
    let teams = vec![
        team(1, "Code Wizards", 1, 3, "CW123", true),
        team(2, "Data Miners", 1, 4, "DM456", false),
        team(3, "Quantum Coders", 2, 3, "QC789", true),
    ];

    let user = |id: u32, name: &str, email: &str, role: UserRole| User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
    };
    let users = vec![
        user(1, "Admin User", "admin@example.com", UserRole::Admin),
        user(2, "Organiser User", "organiser@example.com", UserRole::Organiser),
        user(3, "Participant User", "participant@example.com", UserRole::Participant),
        user(4, "Jane Smith", "jane@example.com", UserRole::Participant),
        user(5, "Other Organiser", "organiser2@example.com", UserRole::Organiser),
        user(6, "Alice Johnson", "alice@example.com", UserRole::Participant),
        user(7, "Bob Williams", "bob@example.com", UserRole::Participant),
    ];

    let project = |id: u32,
                   team_id: u32,
                   title: &str,
                   description: &str,
                   slug: &str,
                   approved: bool,
                   votes: u32| {
        Project {
            id,
            team_id,
            title: title.to_string(),
            description: description.to_string(),
            repo_link: format!("https://github.com/{slug}"),
            demo_link: format!("https://{}-demo.vercel.app", title.to_lowercase()),
            approved,
            team_name: teams.iter().find(|t| t.id == team_id).map(|t| t.name.clone()),
            vote_count: Some(votes),
        }
    };
    let projects = vec![
        project(
            1,
            1,
            "EcoTracker",
            "An app that helps track and reduce carbon footprint",
            "codewizards/ecotracker",
            true,
            15,
        ),
        project(
            2,
            3,
            "MedAssist",
            "AI-powered medical assistance platform",
            "quantumcoders/medassist",
            true,
            12,
        ),
        project(
            3,
            2,
            "SmartCity",
            "IoT solution for urban management",
            "dataminers/smartcity",
            false,
            0,
        ),
    ];

    let votes = [(1, 3, 2), (2, 4, 1), (3, 6, 1), (4, 7, 2)]
        .into_iter()
        .map(|(id, voter_id, project_id)| Vote {
            id,
            voter_id,
            project_id,
        })
        .collect::<Vec<_>>();

    let members = [(1, 3, 1), (2, 4, 2), (3, 6, 1), (4, 7, 2), (5, 3, 3)]
        .into_iter()
        .map(|(id, user_id, team_id)| TeamMember {
            id,
            user_id,
            team_id,
        })
        .collect::<Vec<_>>();

    Tables {
        hackathon_ids: Sequence::starting_after(hackathons.len() as u32),
        team_ids: Sequence::starting_after(teams.len() as u32),
        member_ids: Sequence::starting_after(members.len() as u32),
        project_ids: Sequence::starting_after(projects.len() as u32),
        vote_ids: Sequence::starting_after(votes.len() as u32),
        user_ids: Sequence::starting_after(users.len() as u32),
        hackathons,
        teams,
        members,
        projects,
        votes,
        users,
    }
}
