//! The dashboard session: one form, at most one displayed request.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use url::Url;

use tryon_client::TryOnApi;
use tryon_models::RequestId;

use crate::config::DashboardConfig;
use crate::error::{DashboardResult, SubmitError};
use crate::poller::{PollHandle, ResultPoller};
use crate::render::render_state;
use crate::upload::{UploadController, UploadForm};

/// Owns the upload controller and the poll cycle of the displayed request.
///
/// Showing a different request cancels the current cycle before the new one
/// starts, so only one cycle is ever live.
pub struct Dashboard<A: TryOnApi + ?Sized + 'static> {
    api: Arc<A>,
    uploader: UploadController<A>,
    poll_interval: Duration,
    static_base: Url,
    current: Option<PollHandle>,
}

impl<A: TryOnApi + ?Sized + 'static> Dashboard<A> {
    pub fn new(api: Arc<A>, config: &DashboardConfig) -> DashboardResult<Self> {
        let static_base = config.client.static_base()?;
        Ok(Self {
            uploader: UploadController::new(api.clone(), config.max_upload_bytes),
            api,
            poll_interval: config.poll_interval,
            static_base,
            current: None,
        })
    }

    pub fn uploader(&self) -> &UploadController<A> {
        &self.uploader
    }

    pub fn static_base(&self) -> &Url {
        &self.static_base
    }

    /// Submit the form and start displaying the created request.
    pub async fn submit(&mut self, form: &UploadForm) -> Result<RequestId, SubmitError> {
        let request_id = self.uploader.submit(form).await?;
        self.show(request_id);
        Ok(request_id)
    }

    /// Display `request_id`, replacing whatever was displayed before.
    pub fn show(&mut self, request_id: RequestId) -> &PollHandle {
        if let Some(previous) = self.current.take() {
            info!(
                previous = previous.request_id(),
                next = request_id,
                "Switching displayed try-on request"
            );
            previous.cancel();
        }

        self.current
            .insert(ResultPoller::spawn(self.api.clone(), request_id, self.poll_interval))
    }

    /// Stop displaying any request.
    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
    }

    pub fn current(&self) -> Option<&PollHandle> {
        self.current.as_ref()
    }

    /// Result panel for the displayed request, if any.
    pub fn render_current(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|handle| render_state(&handle.state(), &self.static_base))
    }
}
