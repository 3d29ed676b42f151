//! Try-on service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use tryon_models::{HealthResponse, Pose, RequestId, TryOnRequestDetail, TryOnRequestSummary};

use crate::api::TryOnApi;
use crate::error::{ClientError, ClientResult};
use crate::types::{ImageUpload, ListParams};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_STATIC_URL: &str = "http://localhost:8000/";

/// Configuration for the try-on client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, including the version prefix
    pub base_url: String,
    /// Host serving result images
    pub static_base_url: String,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            static_base_url: DEFAULT_STATIC_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("TRYON_API_URL")
                .or_else(|_| std::env::var("NEXT_PUBLIC_API_URL"))
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            static_base_url: std::env::var("TRYON_STATIC_URL")
                .unwrap_or_else(|_| DEFAULT_STATIC_URL.to_string()),
            timeout: std::env::var("TRYON_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Replace the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parsed static host for resolving result images.
    pub fn static_base(&self) -> ClientResult<Url> {
        Ok(Url::parse(&self.static_base_url)?)
    }
}

/// Client for the try-on service.
#[derive(Debug, Clone)]
pub struct TryOnClient {
    http: Client,
    base_url: String,
}

impl TryOnClient {
    /// Create a new client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        // Validate early so a bad URL fails before the first request
        Url::parse(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Try-on service returned {}: {}", status, body);
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("could not decode response body: {}", e))
        })
    }

    fn image_part(upload: ImageUpload) -> ClientResult<Part> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        Ok(part)
    }
}

#[async_trait]
impl TryOnApi for TryOnClient {
    async fn create(
        &self,
        person: ImageUpload,
        garment: ImageUpload,
        pose: Pose,
    ) -> ClientResult<TryOnRequestSummary> {
        let url = self.url("/tryon/");
        debug!(
            person = %person.file_name,
            garment = %garment.file_name,
            pose = %pose,
            "Sending try-on request to {}", url
        );

        let form = Form::new()
            .part("person_image", Self::image_part(person)?)
            .part("garment_image", Self::image_part(garment)?)
            .text("pose", pose.as_str());

        let response = self.http.post(&url).multipart(form).send().await?;
        Self::decode(response).await
    }

    async fn get_by_id(&self, id: RequestId) -> ClientResult<TryOnRequestDetail> {
        let url = self.url(&format!("/tryon/{}", id));
        debug!(request_id = id, "Fetching try-on request from {}", url);

        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn list(&self, params: ListParams) -> ClientResult<Vec<TryOnRequestDetail>> {
        let url = self.url("/tryon/");
        debug!(skip = params.skip, limit = params.limit, "Listing try-on requests from {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("skip", params.skip), ("limit", params.limit)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        let url = self.url("/health");
        debug!("Checking try-on service health at {}", url);

        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }
}
