use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    pub users: usize,
}

impl Health {
    pub fn healthy(users: usize) -> Self {
        Self { status: "healthy".into(), users }
    }
}
