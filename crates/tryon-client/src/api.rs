//! The try-on service contract.

use async_trait::async_trait;
use tryon_models::{HealthResponse, Pose, RequestId, TryOnRequestDetail, TryOnRequestSummary};

use crate::error::ClientResult;
use crate::types::{ImageUpload, ListParams};

/// Operations offered by the try-on service.
///
/// Each call is a single request/response exchange: no retries, no caching.
#[async_trait]
pub trait TryOnApi: Send + Sync {
    /// Submit a person image and a garment image for try-on.
    async fn create(
        &self,
        person: ImageUpload,
        garment: ImageUpload,
        pose: Pose,
    ) -> ClientResult<TryOnRequestSummary>;

    /// Fetch the current state of one request.
    async fn get_by_id(&self, id: RequestId) -> ClientResult<TryOnRequestDetail>;

    /// List requests, newest first.
    async fn list(&self, params: ListParams) -> ClientResult<Vec<TryOnRequestDetail>>;

    /// Probe the service.
    async fn health(&self) -> ClientResult<HealthResponse>;
}
