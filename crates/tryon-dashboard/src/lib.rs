//! Virtual try-on dashboard.
//!
//! This crate provides:
//! - Upload form validation and submission
//! - Result polling with cancellation on request change
//! - The dashboard session tying the two together
//! - Plain-text rendering for the `tryon` CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod render;
pub mod session;
pub mod upload;

#[cfg(test)]
mod testing;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult, SubmitError, ValidationError};
pub use poller::{PollHandle, PollState, ResultPoller};
pub use session::Dashboard;
pub use upload::{UploadController, UploadForm};
