mod client;
mod models;

pub use client::{ApiError, BackendClient, Result};
pub use models::{ApiConfig, CookieStatus, DownloadResponse, TrackMetadata, UploadResponse};
