//! Per-user roadmap documents keyed by university id.

pub mod repository;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub use repository::RoadmapRepository;
pub use store::RoadmapStore;

/// Arbitrary client payload; only `university_id` is inspected.
pub type RoadmapDocument = Value;

/// University id -> document.
pub type Roadmaps = BTreeMap<String, RoadmapDocument>;

pub const UNIVERSITY_ID_FIELD: &str = "university_id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub roadmaps: Roadmaps,
    /// Fields other than `roadmaps` found in the file, written back as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map key for a document. Strings are used as-is and numbers are
/// stringified, matching how they appear as JSON object keys on disk.
pub fn university_id_of(document: &Value) -> Result<String, ServiceError> {
    let id = document
        .as_object()
        .and_then(|obj| obj.get(UNIVERSITY_ID_FIELD))
        .ok_or_else(ServiceError::missing_university_id)?;
    match id {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(ServiceError::missing_university_id()),
        _ => Err(ServiceError::BadRequest("'university_id' must be a string or number".into())),
    }
}
