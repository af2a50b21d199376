use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A timed competitive event containing teams and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hackathon {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub organiser_id: u32,
    pub organiser_name: Option<String>,
    pub is_active: bool,
}

/// Fields required to register a new hackathon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHackathon {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub organiser_id: u32,
    pub organiser_name: Option<String>,
    pub is_active: bool,
}

/// Partial update for a hackathon. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HackathonPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

impl Hackathon {
    pub(crate) fn from_new(id: u32, new: NewHackathon) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            date: new.date,
            location: new.location,
            organiser_id: new.organiser_id,
            organiser_name: new.organiser_name,
            is_active: new.is_active,
        }
    }

    pub(crate) fn apply(&mut self, patch: HackathonPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}
