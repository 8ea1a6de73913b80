use std::path::PathBuf;

use tracing::info;

use super::{university_id_of, RoadmapDocument, Roadmaps, UserRecord};
use crate::errors::ServiceError;
use crate::keygen::{generate_unique_key, KEY_LENGTH};
use crate::storage::{JsonMapStore, LoadOutcome, PersistOptions};

/// All users and their roadmaps, persisted to a single JSON file.
pub struct RoadmapStore {
    users: JsonMapStore<String, UserRecord>,
}

impl RoadmapStore {
    /// Load the store from `path`; see [`JsonMapStore::open`] for how a
    /// missing or corrupt file is handled.
    pub async fn open<P: Into<PathBuf>>(path: P, options: PersistOptions) -> Self {
        Self { users: JsonMapStore::open(path, options).await }
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.users.load_outcome()
    }

    pub async fn user_count(&self) -> usize {
        self.users.len().await
    }

    /// Create an empty user record under a fresh key.
    pub async fn create_user(&self) -> Result<String, ServiceError> {
        let key = self
            .users
            .update(|users| {
                let key = generate_unique_key(KEY_LENGTH, |k| users.contains_key(k));
                users.insert(key.clone(), UserRecord::default());
                Ok(key)
            })
            .await?;
        info!(event = "user_created", "created user record");
        Ok(key)
    }

    pub async fn all_roadmaps(&self, key: &str) -> Result<Roadmaps, ServiceError> {
        self.users
            .read(|users| users.get(key).map(|u| u.roadmaps.clone()))
            .await
            .ok_or_else(ServiceError::user_not_found)
    }

    pub async fn roadmap(&self, key: &str, university_id: &str) -> Result<RoadmapDocument, ServiceError> {
        self.users
            .read(|users| {
                let user = users.get(key).ok_or_else(ServiceError::user_not_found)?;
                user.roadmaps
                    .get(university_id)
                    .cloned()
                    .ok_or_else(ServiceError::roadmap_not_found)
            })
            .await
    }

    /// Insert or overwrite the document under its own `university_id`.
    /// Returns the id it was stored under.
    ///
    /// `None` means the request carried no usable JSON body. The user is
    /// checked first, so an unknown key is reported before a bad body.
    pub async fn upsert_roadmap(&self, key: &str, document: Option<RoadmapDocument>) -> Result<String, ServiceError> {
        let university_id = self
            .users
            .update(|users| {
                let user = users.get_mut(key).ok_or_else(ServiceError::user_not_found)?;
                let document = document.ok_or_else(ServiceError::not_json)?;
                let university_id = university_id_of(&document)?;
                user.roadmaps.insert(university_id.clone(), document);
                Ok(university_id)
            })
            .await?;
        info!(event = "roadmap_upserted", %university_id, "roadmap stored");
        Ok(university_id)
    }

    pub async fn delete_roadmap(&self, key: &str, university_id: &str) -> Result<(), ServiceError> {
        self.users
            .update(|users| {
                let user = users.get_mut(key).ok_or_else(ServiceError::user_not_found)?;
                user.roadmaps
                    .remove(university_id)
                    .map(|_| ())
                    .ok_or_else(ServiceError::roadmap_not_found)
            })
            .await?;
        info!(event = "roadmap_deleted", %university_id, "roadmap removed");
        Ok(())
    }
}
