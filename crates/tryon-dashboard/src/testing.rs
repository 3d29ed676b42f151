//! Test doubles for the try-on service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;

use tryon_client::{ClientError, ClientResult, ImageUpload, ListParams, TryOnApi};
use tryon_models::{
    HealthResponse, Pose, RequestId, TryOnRequestDetail, TryOnRequestSummary, TryOnStatus,
};

mockall::mock! {
    pub Api {}

    #[async_trait]
    impl TryOnApi for Api {
        async fn create(
            &self,
            person: ImageUpload,
            garment: ImageUpload,
            pose: Pose,
        ) -> ClientResult<TryOnRequestSummary>;
        async fn get_by_id(&self, id: RequestId) -> ClientResult<TryOnRequestDetail>;
        async fn list(&self, params: ListParams) -> ClientResult<Vec<TryOnRequestDetail>>;
        async fn health(&self) -> ClientResult<HealthResponse>;
    }
}

pub fn summary(id: RequestId) -> TryOnRequestSummary {
    TryOnRequestSummary {
        request_id: id,
        status: TryOnStatus::Pending,
        result_image_url: None,
        message: "Try-on request created successfully. Processing in background.".to_string(),
        created_at: Utc::now(),
        processing_time: None,
    }
}

pub fn detail(id: RequestId, status: &str) -> TryOnRequestDetail {
    let status = TryOnStatus::from(status);
    let completed = status.is_completed();
    let failed = status.is_failed();
    TryOnRequestDetail {
        id,
        user_image_path: format!("uploads/persons/person_{id}.jpg"),
        garment_image_path: format!("uploads/garments/garment_{id}.jpg"),
        result_image_path: completed.then(|| format!("results/{id}.png")),
        pose: "front".to_string(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        error_message: failed.then(|| "Garment could not be segmented".to_string()),
        processing_time: completed.then_some(3.14),
    }
}

/// One scripted answer to `get_by_id`.
#[derive(Debug, Clone)]
pub enum Step {
    /// Respond with a detail record in this status
    Status(&'static str),
    /// Fail with this HTTP status
    HttpError(u16),
    /// Respond with this status after a delay
    Slow(&'static str, Duration),
}

/// Fake service answering `get_by_id` from a per-request script.
///
/// Once a script runs out its last step repeats. Every call is recorded.
#[derive(Default)]
pub struct ScriptedApi {
    scripts: Mutex<HashMap<RequestId, Vec<Step>>>,
    calls: Mutex<Vec<(RequestId, Instant)>>,
    creates: Mutex<usize>,
    create_delay: Option<Duration>,
}

impl ScriptedApi {
    pub const CREATED_ID: RequestId = 7;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(self, id: RequestId, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(id, steps.into_iter().rev().collect());
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Ids passed to `get_by_id`, in call order.
    pub fn calls(&self) -> Vec<RequestId> {
        self.calls.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    /// When each `get_by_id` call was made, in call order.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn calls_for(&self, id: RequestId) -> usize {
        self.calls().iter().filter(|c| **c == id).count()
    }

    pub fn create_calls(&self) -> usize {
        *self.creates.lock().unwrap()
    }

    fn next_step(&self, id: RequestId) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts.entry(id).or_default();
        match script.len() {
            0 => Step::HttpError(404),
            1 => script[0].clone(),
            _ => script.pop().unwrap(),
        }
    }
}

#[async_trait]
impl TryOnApi for ScriptedApi {
    async fn create(
        &self,
        _person: ImageUpload,
        _garment: ImageUpload,
        _pose: Pose,
    ) -> ClientResult<TryOnRequestSummary> {
        *self.creates.lock().unwrap() += 1;
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(summary(Self::CREATED_ID))
    }

    async fn get_by_id(&self, id: RequestId) -> ClientResult<TryOnRequestDetail> {
        self.calls.lock().unwrap().push((id, Instant::now()));
        match self.next_step(id) {
            Step::Status(status) => Ok(detail(id, status)),
            Step::HttpError(code) => Err(ClientError::from_response(
                code,
                r#"{"detail": "Try-on request not found"}"#,
            )),
            Step::Slow(status, delay) => {
                tokio::time::sleep(delay).await;
                Ok(detail(id, status))
            }
        }
    }

    async fn list(&self, params: ListParams) -> ClientResult<Vec<TryOnRequestDetail>> {
        Ok((0..params.limit as RequestId)
            .map(|i| detail(params.skip as RequestId + i + 1, "completed"))
            .collect())
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            supported_poses: Pose::ALL.iter().map(|p| p.to_string()).collect(),
        })
    }
}
