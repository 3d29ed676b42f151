//! Client for the virtual try-on service.
//!
//! This crate wraps the three request endpoints (create, get, list) plus the
//! health check behind the [`TryOnApi`] trait. [`TryOnClient`] is the reqwest
//! implementation; tests and the dashboard can substitute their own.

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::TryOnApi;
pub use client::{ClientConfig, TryOnClient};
pub use error::{ClientError, ClientResult};
pub use types::{ImageUpload, ListParams};
