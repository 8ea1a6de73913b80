use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub message: &'static str,
    pub key: String,
}

/// POST /api/user
pub async fn create_user(
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    let key = state.roadmaps.create_user().await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUser { message: "User created successfully.", key }),
    ))
}
