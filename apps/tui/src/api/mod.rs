//! HTTP access to the scoring API.

mod client;

pub use client::{ApiClient, ApiError, UploadResponse};
