use tracing::{debug, instrument};

use super::MemoryStore;
use crate::error::{LeaderboardError, Result};
use crate::model::{Hackathon, HackathonPatch, NewHackathon};

impl MemoryStore {
    #[instrument(skip(self))]
    pub async fn hackathons(&self) -> Result<Vec<Hackathon>> {
        self.pause().await;
        Ok(self.read().hackathons.clone())
    }

    #[instrument(skip(self))]
    pub async fn hackathon(&self, id: u32) -> Result<Hackathon> {
        self.pause().await;
        self.read()
            .hackathons
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(|| LeaderboardError::not_found("hackathon", id))
    }

    #[instrument(skip(self))]
    pub async fn hackathons_by_organiser(&self, organiser_id: u32) -> Result<Vec<Hackathon>> {
        self.pause().await;
        Ok(self
            .read()
            .hackathons
            .iter()
            .filter(|h| h.organiser_id == organiser_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create_hackathon(&self, new: NewHackathon) -> Result<Hackathon> {
        self.pause().await;
        let mut tables = self.write();
        let id = tables.hackathon_ids.next();
        let hackathon = Hackathon::from_new(id, new);
        tables.hackathons.push(hackathon.clone());
        debug!(id, "created hackathon");
        Ok(hackathon)
    }

    #[instrument(skip(self))]
    pub async fn update_hackathon(&self, id: u32, patch: HackathonPatch) -> Result<Hackathon> {
        self.pause().await;
        let mut tables = self.write();
        let hackathon = tables
            .hackathons
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| LeaderboardError::not_found("hackathon", id))?;
        hackathon.apply(patch);
        Ok(hackathon.clone())
    }

    #[instrument(skip(self))]
    pub async fn delete_hackathon(&self, id: u32) -> Result<()> {
        self.pause().await;
        let mut tables = self.write();
        let index = tables
            .hackathons
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| LeaderboardError::not_found("hackathon", id))?;
        tables.hackathons.remove(index);
        debug!(id, "deleted hackathon");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn draft() -> NewHackathon {
        NewHackathon {
            name: "Rust Sprint".to_string(),
            description: "Ship something in a weekend".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            location: "Berlin".to_string(),
            organiser_id: 5,
            organiser_name: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = MemoryStore::seeded();

        let created = store.create_hackathon(draft()).await.unwrap();
        assert_eq!(created.id, 4);

        let fetched = store.hackathon(4).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(store.hackathons_by_organiser(5).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::seeded();

        store.delete_hackathon(3).await.unwrap();
        let created = store.create_hackathon(draft()).await.unwrap();

        assert_eq!(created.id, 4);
        assert_eq!(store.hackathons().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_applies_only_set_fields() {
        let store = MemoryStore::seeded();

        let updated = store
            .update_hackathon(
                1,
                HackathonPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.name, "Innovation Challenge 2025");
    }

    #[tokio::test]
    async fn test_missing_hackathon() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.hackathon(1).await,
            Err(LeaderboardError::NotFound { entity: "hackathon", id: 1 })
        ));
        assert!(store.delete_hackathon(1).await.is_err());
        assert!(store
            .update_hackathon(1, HackathonPatch::default())
            .await
            .is_err());
    }
}
