use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service::roadmap::{RoadmapDocument, Roadmaps, UNIVERSITY_ID_FIELD};
use tracing::debug;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct RoadmapAck {
    pub message: &'static str,
    pub university_id: Value,
}

/// GET /api/roadmap/:user_key
pub async fn list_roadmaps(
    State(state): State<ServerState>,
    Path(user_key): Path<String>,
) -> Result<Json<Roadmaps>, ApiError> {
    Ok(Json(state.roadmaps.all_roadmaps(&user_key).await?))
}

/// GET /api/roadmap/:user_key/:university_id
pub async fn get_roadmap(
    State(state): State<ServerState>,
    Path((user_key, university_id)): Path<(String, String)>,
) -> Result<Json<RoadmapDocument>, ApiError> {
    Ok(Json(state.roadmaps.roadmap(&user_key, &university_id).await?))
}

/// PUT /api/roadmap/:user_key
///
/// A body that is not JSON is handed to the store as `None`; the store
/// looks up the user first, so an unknown key wins over a malformed body.
pub async fn update_roadmap(
    State(state): State<ServerState>,
    Path(user_key): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RoadmapAck>, ApiError> {
    let document = match body {
        Ok(Json(document)) => Some(document),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "rejected request body");
            None
        }
    };
    // echo the id as the client sent it, e.g. a number stays a number
    let echoed = document
        .as_ref()
        .and_then(|d| d.get(UNIVERSITY_ID_FIELD))
        .cloned()
        .unwrap_or(Value::Null);
    state.roadmaps.upsert_roadmap(&user_key, document).await?;
    Ok(Json(RoadmapAck { message: "Roadmap updated successfully.", university_id: echoed }))
}

/// DELETE /api/roadmap/:user_key/:university_id
pub async fn delete_roadmap(
    State(state): State<ServerState>,
    Path((user_key, university_id)): Path<(String, String)>,
) -> Result<Json<RoadmapAck>, ApiError> {
    state.roadmaps.delete_roadmap(&user_key, &university_id).await?;
    Ok(Json(RoadmapAck {
        message: "Roadmap deleted successfully.",
        university_id: Value::String(university_id),
    }))
}
