//! Try-on request records as returned by the service.
//!
//! Both records are owned by the service; the dashboard only holds read-only
//! snapshots of them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::status::TryOnStatus;
use crate::timestamp;

/// Identifier assigned by the service at creation.
pub type RequestId = i64;

/// Response of `POST /tryon/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TryOnRequestSummary {
    pub request_id: RequestId,
    pub status: TryOnStatus,
    #[serde(default)]
    pub result_image_url: Option<String>,
    pub message: String,
    #[serde(with = "timestamp::lenient")]
    #[schemars(with = "DateTime<Utc>")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

/// Response of `GET /tryon/{id}`, also the element type of `GET /tryon/`.
///
/// `result_image_path` and `processing_time` are only meaningful once the
/// request has completed, `error_message` only once it has failed. Prefer the
/// status-aware accessors over reading the raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TryOnRequestDetail {
    pub id: RequestId,
    pub user_image_path: String,
    pub garment_image_path: String,
    #[serde(default)]
    pub result_image_path: Option<String>,
    /// Kept as sent by the service, which stores it as free text.
    pub pose: String,
    pub status: TryOnStatus,
    #[serde(with = "timestamp::lenient")]
    #[schemars(with = "DateTime<Utc>")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp::lenient")]
    #[schemars(with = "DateTime<Utc>")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

impl TryOnRequestDetail {
    /// Check if the request is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Result image path, only for completed requests.
    pub fn result_image_path(&self) -> Option<&str> {
        self.result_image_path
            .as_deref()
            .filter(|p| self.status.is_completed() && !p.is_empty())
    }

    /// Processing time in seconds, only for completed requests.
    pub fn processing_time(&self) -> Option<f64> {
        self.processing_time.filter(|_| self.status.is_completed())
    }

    /// Service-provided failure reason, only for failed requests.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .filter(|m| self.status.is_failed() && !m.is_empty())
    }
}
