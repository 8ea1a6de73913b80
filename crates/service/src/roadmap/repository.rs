use async_trait::async_trait;

use super::{RoadmapDocument, RoadmapStore, Roadmaps};
use crate::errors::ServiceError;

/// Trait abstraction over the roadmap store, so handlers depend on the
/// operations rather than the file-backed implementation.
#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    async fn create_user(&self) -> Result<String, ServiceError>;
    async fn all_roadmaps(&self, key: &str) -> Result<Roadmaps, ServiceError>;
    async fn roadmap(&self, key: &str, university_id: &str) -> Result<RoadmapDocument, ServiceError>;
    async fn upsert_roadmap(&self, key: &str, document: Option<RoadmapDocument>) -> Result<String, ServiceError>;
    async fn delete_roadmap(&self, key: &str, university_id: &str) -> Result<(), ServiceError>;
    async fn user_count(&self) -> usize;
}

#[async_trait]
impl RoadmapRepository for RoadmapStore {
    async fn create_user(&self) -> Result<String, ServiceError> { self.create_user().await }
    async fn all_roadmaps(&self, key: &str) -> Result<Roadmaps, ServiceError> { self.all_roadmaps(key).await }
    async fn roadmap(&self, key: &str, university_id: &str) -> Result<RoadmapDocument, ServiceError> {
        self.roadmap(key, university_id).await
    }
    async fn upsert_roadmap(&self, key: &str, document: Option<RoadmapDocument>) -> Result<String, ServiceError> {
        self.upsert_roadmap(key, document).await
    }
    async fn delete_roadmap(&self, key: &str, university_id: &str) -> Result<(), ServiceError> {
        self.delete_roadmap(key, university_id).await
    }
    async fn user_count(&self) -> usize { self.user_count().await }
}
