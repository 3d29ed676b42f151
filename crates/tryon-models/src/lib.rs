//! Shared data models for the virtual try-on dashboard.
//!
//! This crate provides Serde-serializable types for:
//! - Try-on requests as returned by the service (summary and detail)
//! - Pose selection
//! - Request status, including unrecognized values
//! - Result rendering helpers (image URL resolution, time formatting)

pub mod health;
pub mod pose;
pub mod request;
pub mod status;
pub mod timestamp;
pub mod utils;

// Re-export common types
pub use health::HealthResponse;
pub use pose::{Pose, PoseParseError};
pub use request::{RequestId, TryOnRequestDetail, TryOnRequestSummary};
pub use status::TryOnStatus;
pub use utils::{format_processing_time, resolve_result_url};
