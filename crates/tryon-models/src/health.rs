//! Service health payload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub supported_poses: Vec<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" || self.status == "ok"
    }
}
