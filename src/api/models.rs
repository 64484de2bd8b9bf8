use serde::{Deserialize, Serialize};

/// Response from `GET /cookies`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieStatus {
    pub has_cookies: bool,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `POST /cookies`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Success response from `POST /download`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadResponse {
    /// Stream path for the finished file, relative to the backend.
    pub file: String,
    #[serde(default)]
    pub metadata: TrackMetadata,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub video_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Error body the backend attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: String,
}

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let base_url = std::env::var("FLAC_BACKEND_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3001".to_string());
        Self { base_url }
    }
}
