//! Dashboard error types.

use thiserror::Error;
use tryon_client::ClientError;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Input problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload both person and garment images")]
    MissingImages,

    #[error("The {field} image is empty")]
    EmptyImage { field: &'static str },

    #[error("Invalid {field} image type: {content_type}")]
    UnsupportedType {
        field: &'static str,
        content_type: String,
    },

    #[error("The {field} image is too large ({size} bytes, limit {max} bytes)")]
    TooLarge {
        field: &'static str,
        size: usize,
        max: usize,
    },
}

/// Why a form submission did not produce a request.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Failed to create try-on request: {0}")]
    Transport(#[from] ClientError),
}

impl SubmitError {
    /// Message shown inline under the form.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(e) => e.to_string(),
            SubmitError::Busy => self.to_string(),
            SubmitError::Transport(e) => e.user_message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}
