//! Upload form and submission.
//!
//! [`UploadForm`] holds what the user has picked so far. [`UploadController`]
//! validates it and turns it into a single create call, tracking a busy flag
//! so a second submission cannot start while one is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use tryon_client::{ImageUpload, TryOnApi};
use tryon_models::{Pose, RequestId};

use crate::config::ALLOWED_IMAGE_TYPES;
use crate::error::{SubmitError, ValidationError};

/// The person/garment/pose selection.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    person: Option<ImageUpload>,
    garment: Option<ImageUpload>,
    pose: Pose,
}

impl UploadForm {
    pub fn new(pose: Pose) -> Self {
        Self {
            person: None,
            garment: None,
            pose,
        }
    }

    pub fn with_person(mut self, image: ImageUpload) -> Self {
        self.person = Some(image);
        self
    }

    pub fn with_garment(mut self, image: ImageUpload) -> Self {
        self.garment = Some(image);
        self
    }

    pub fn person(&self) -> Option<&ImageUpload> {
        self.person.as_ref()
    }

    pub fn garment(&self) -> Option<&ImageUpload> {
        self.garment.as_ref()
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Whether the submit action should be enabled.
    pub fn is_complete(&self) -> bool {
        self.person.is_some() && self.garment.is_some()
    }
}

/// Clears the busy flag when dropped, whatever path the submission took.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submits upload forms to the try-on service.
pub struct UploadController<A: TryOnApi + ?Sized> {
    api: Arc<A>,
    max_upload_bytes: usize,
    busy: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl<A: TryOnApi + ?Sized> UploadController<A> {
    pub fn new(api: Arc<A>, max_upload_bytes: usize) -> Self {
        Self {
            api,
            max_upload_bytes,
            busy: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// True while a create call is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Message from the most recent failed submission, cleared on the next attempt.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_last_error(&self, message: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }

    /// Check the form without touching the network.
    pub fn validate(&self, form: &UploadForm) -> Result<(), ValidationError> {
        let (person, garment) = match (form.person(), form.garment()) {
            (Some(p), Some(g)) => (p, g),
            _ => return Err(ValidationError::MissingImages),
        };

        for (field, image) in [("person", person), ("garment", garment)] {
            if image.is_empty() {
                return Err(ValidationError::EmptyImage { field });
            }
            if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
                return Err(ValidationError::UnsupportedType {
                    field,
                    content_type: image.content_type.clone(),
                });
            }
            if image.len() > self.max_upload_bytes {
                return Err(ValidationError::TooLarge {
                    field,
                    size: image.len(),
                    max: self.max_upload_bytes,
                });
            }
        }

        Ok(())
    }

    /// Validate and submit the form, returning the new request's id.
    ///
    /// An invalid form is rejected before the busy flag is consulted, so it
    /// reports the validation message even while another submission is in
    /// flight. The form is left untouched so a failed submission can be retried.
    pub async fn submit(&self, form: &UploadForm) -> Result<RequestId, SubmitError> {
        if let Err(e) = self.validate(form) {
            let err = SubmitError::from(e);
            self.set_last_error(Some(err.user_message()));
            return Err(err);
        }

        let _busy = BusyGuard::acquire(&self.busy).ok_or(SubmitError::Busy)?;

        let result = self.create(form).await;
        match &result {
            Ok(_) => self.set_last_error(None),
            Err(e) => self.set_last_error(Some(e.user_message())),
        }
        result
    }

    async fn create(&self, form: &UploadForm) -> Result<RequestId, SubmitError> {
        let (person, garment) = match (form.person(), form.garment()) {
            (Some(p), Some(g)) => (p.clone(), g.clone()),
            _ => return Err(ValidationError::MissingImages.into()),
        };

        match self.api.create(person, garment, form.pose()).await {
            Ok(summary) => {
                info!(
                    request_id = summary.request_id,
                    status = %summary.status,
                    "Try-on request created: {}", summary.message
                );
                Ok(summary.request_id)
            }
            Err(e) => {
                warn!("Failed to create try-on request: {}", e);
                Err(SubmitError::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{summary, MockApi};
    use tryon_client::ClientError;

    fn jpeg(name: &str) -> ImageUpload {
        ImageUpload::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn full_form(pose: Pose) -> UploadForm {
        UploadForm::new(pose)
            .with_person(jpeg("me.jpg"))
            .with_garment(jpeg("shirt.jpg"))
    }

    fn controller(api: MockApi) -> UploadController<MockApi> {
        UploadController::new(Arc::new(api), 1024)
    }

    #[tokio::test]
    async fn test_missing_images_never_calls_service() {
        let mut api = MockApi::new();
        api.expect_create().never();
        let controller = controller(api);

        let only_person = UploadForm::default().with_person(jpeg("me.jpg"));
        let only_garment = UploadForm::default().with_garment(jpeg("shirt.jpg"));

        for form in [UploadForm::default(), only_person, only_garment] {
            let err = controller.submit(&form).await.unwrap_err();
            assert!(matches!(
                err,
                SubmitError::Validation(ValidationError::MissingImages)
            ));
            assert_eq!(
                controller.last_error().as_deref(),
                Some("Please upload both person and garment images")
            );
            assert!(!controller.is_busy());
        }
    }

    #[tokio::test]
    async fn test_valid_form_issues_exactly_one_create() {
        let mut api = MockApi::new();
        api.expect_create()
            .times(1)
            .withf(|person, garment, pose| {
                person.file_name == "me.jpg"
                    && garment.file_name == "shirt.jpg"
                    && *pose == Pose::Side
            })
            .returning(|_, _, _| Ok(summary(42)));
        let controller = controller(api);

        let id = controller.submit(&full_form(Pose::Side)).await.unwrap();

        assert_eq!(id, 42);
        assert!(controller.last_error().is_none());
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_detail_and_clears_busy() {
        let mut api = MockApi::new();
        api.expect_create().times(1).returning(|_, _, _| {
            Err(ClientError::from_response(
                400,
                r#"{"detail": "Invalid garment image"}"#,
            ))
        });
        let controller = controller(api);
        let form = full_form(Pose::Front);

        let err = controller.submit(&form).await.unwrap_err();

        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(controller.last_error().as_deref(), Some("Invalid garment image"));
        assert!(!controller.is_busy());
        // The selection survives for a retry
        assert!(form.is_complete());
    }

    #[tokio::test]
    async fn test_transport_failure_without_detail_uses_generic_message() {
        let mut api = MockApi::new();
        api.expect_create()
            .returning(|_, _, _| Err(ClientError::from_response(500, "")));
        let controller = controller(api);

        controller.submit(&full_form(Pose::Front)).await.unwrap_err();
        assert_eq!(
            controller.last_error().as_deref(),
            Some("Request failed with status 500")
        );
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_oversized_images() {
        let mut api = MockApi::new();
        api.expect_create().never();
        let controller = controller(api);

        let gif = UploadForm::default()
            .with_person(ImageUpload::new("me.gif", vec![1, 2, 3]).with_content_type("image/gif"))
            .with_garment(jpeg("shirt.jpg"));
        assert!(matches!(
            controller.submit(&gif).await,
            Err(SubmitError::Validation(ValidationError::UnsupportedType { field: "person", .. }))
        ));

        let huge = UploadForm::default()
            .with_person(jpeg("me.jpg"))
            .with_garment(ImageUpload::new("shirt.png", vec![0; 2048]));
        assert!(matches!(
            controller.submit(&huge).await,
            Err(SubmitError::Validation(ValidationError::TooLarge { field: "garment", size: 2048, max: 1024 }))
        ));

        let empty = UploadForm::default()
            .with_person(ImageUpload::new("me.jpg", Vec::new()))
            .with_garment(jpeg("shirt.jpg"));
        assert!(matches!(
            controller.submit(&empty).await,
            Err(SubmitError::Validation(ValidationError::EmptyImage { field: "person" }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_while_busy_is_rejected() {
        use crate::testing::ScriptedApi;
        use std::time::Duration;

        let api = Arc::new(ScriptedApi::new().with_create_delay(Duration::from_millis(50)));
        let controller = Arc::new(UploadController::new(api.clone(), 1024));
        let form = full_form(Pose::Front);

        let first = {
            let controller = controller.clone();
            let form = form.clone();
            tokio::spawn(async move { controller.submit(&form).await })
        };
        tokio::task::yield_now().await;
        assert!(controller.is_busy());

        let second = controller.submit(&form).await;
        assert!(matches!(second, Err(SubmitError::Busy)));

        let id = first.await.unwrap().unwrap();
        assert_eq!(id, ScriptedApi::CREATED_ID);
        assert_eq!(api.create_calls(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_while_busy_reports_validation() {
        use crate::testing::ScriptedApi;
        use std::time::Duration;

        let api = Arc::new(ScriptedApi::new().with_create_delay(Duration::from_millis(50)));
        let controller = Arc::new(UploadController::new(api.clone(), 1024));

        let first = {
            let controller = controller.clone();
            let form = full_form(Pose::Front);
            tokio::spawn(async move { controller.submit(&form).await })
        };
        tokio::task::yield_now().await;
        assert!(controller.is_busy());

        let err = controller.submit(&UploadForm::default()).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Validation(ValidationError::MissingImages)
        ));
        assert_eq!(
            controller.last_error().as_deref(),
            Some("Please upload both person and garment images")
        );
        // The in-flight submission still owns the flag
        assert!(controller.is_busy());

        first.await.unwrap().unwrap();
        assert_eq!(api.create_calls(), 1);
        assert!(controller.last_error().is_none());
    }
}
