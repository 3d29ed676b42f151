//! Dashboard configuration.

use std::time::Duration;

use tryon_client::ClientConfig;
use tryon_models::Pose;

use crate::poller::DEFAULT_POLL_INTERVAL;

/// Largest image the service accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content types the service accepts for uploads.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Service endpoints
    pub client: ClientConfig,
    /// Delay between status checks while a request is not terminal
    pub poll_interval: Duration,
    /// Per-image upload limit enforced before submitting
    pub max_upload_bytes: usize,
    /// Pose preselected in the form
    pub default_pose: Pose,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_pose: Pose::Front,
        }
    }
}

impl DashboardConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            client: ClientConfig::from_env(),
            poll_interval: std::env::var("TRYON_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            max_upload_bytes: std::env::var("TRYON_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            default_pose: std::env::var("TRYON_DEFAULT_POSE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }
}
