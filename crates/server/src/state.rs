use std::sync::Arc;

use service::roadmap::RoadmapRepository;

/// Shared handler state; the store handles its own synchronization.
#[derive(Clone)]
pub struct ServerState {
    pub roadmaps: Arc<dyn RoadmapRepository>,
}

impl ServerState {
    pub fn new(roadmaps: Arc<dyn RoadmapRepository>) -> Self {
        Self { roadmaps }
    }
}
