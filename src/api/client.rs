use futures::Stream;
use futures::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::models::{ApiConfig, CookieStatus, DownloadResponse, ErrorResponse, UploadResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The backend rejected the operation. The text is surfaced verbatim so
    /// downstream classification sees what the server actually said.
    #[error("{0}")]
    Backend(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct BackendClient {
    config: ApiConfig,
    http: Client,
}

impl BackendClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Asks the backend whether a usable cookie file is already on disk.
    pub async fn check_cookies(&self) -> Result<CookieStatus> {
        let url = format!("{}/cookies", self.config.base_url);
        let response = self.http.get(&url).send().await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Uploads a cookie file as the multipart `file` field of `POST /cookies`.
    pub async fn upload_cookies(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse> {
        let url = format!("{}/cookies", self.config.base_url);

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if !status.is_success() || !body.success {
            let text = body
                .error
                .or(body.message)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| format!("Upload failed with status {}", status));
            return Err(ApiError::Backend(text));
        }

        debug!("cookie upload accepted: {:?}", body.path);
        Ok(body)
    }

    /// Runs the blocking extraction endpoint. The backend answers once the
    /// job settles, either with the finished file's stream path or with the
    /// raw yt-dlp error text.
    pub async fn download_audio(&self, video_url: &str) -> Result<DownloadResponse> {
        let url = format!("{}/download", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "url": video_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let text = serde_json::from_str::<ErrorResponse>(&body)
                .map(|parsed| parsed.error)
                .ok()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| format!("Download failed with status {}", status));
            return Err(ApiError::Backend(text));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Streams the finished file from the backend.
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        stream_path: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let url = if stream_path.starts_with("http") {
            stream_path.to_string()
        } else {
            format!("{}{}", self.config.base_url, stream_path)
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Backend(format!("Stream request failed: {}", e)))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}
