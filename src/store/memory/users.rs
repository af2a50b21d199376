use tracing::{debug, instrument};

use super::MemoryStore;
use crate::error::{LeaderboardError, Result};
use crate::model::{NewUser, User, UserPatch, UserRole};

impl MemoryStore {
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>> {
        self.pause().await;
        Ok(self.read().users.clone())
    }

    #[instrument(skip(self))]
    pub async fn user(&self, id: u32) -> Result<User> {
        self.pause().await;
        self.read()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| LeaderboardError::not_found("user", id))
    }

    #[instrument(skip(self))]
    pub async fn users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.pause().await;
        Ok(self
            .read()
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        self.pause().await;
        let mut tables = self.write();
        let user = User {
            id: tables.user_ids.next(),
            name: new.name,
            email: new.email,
            role: new.role,
        };
        tables.users.push(user.clone());
        debug!(id = user.id, role = %user.role, "created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: u32, patch: UserPatch) -> Result<User> {
        self.pause().await;
        let mut tables = self.write();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| LeaderboardError::not_found("user", id))?;
        user.apply(patch);
        Ok(user.clone())
    }
}
