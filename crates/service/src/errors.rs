use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn user_not_found() -> Self { Self::NotFound("User not found".into()) }

    pub fn roadmap_not_found() -> Self { Self::NotFound("Roadmap not found for this university".into()) }

    pub fn not_json() -> Self { Self::BadRequest("Request must be JSON".into()) }

    pub fn missing_university_id() -> Self {
        Self::BadRequest("Missing 'university_id' field in request body".into())
    }
}
