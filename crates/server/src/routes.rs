pub mod roadmaps;
pub mod users;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::state::ServerState;

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health::healthy(state.roadmaps.user_count().await))
}

async fn fallback() -> ApiError {
    ApiError::not_found("Not found")
}

/// Build the full application router with CORS and request tracing.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/user", post(users::create_user))
        .route(
            "/api/roadmap/:user_key",
            get(roadmaps::list_roadmaps).put(roadmaps::update_roadmap),
        )
        .route(
            "/api/roadmap/:user_key/:university_id",
            get(roadmaps::get_roadmap).delete(roadmaps::delete_roadmap),
        )
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
