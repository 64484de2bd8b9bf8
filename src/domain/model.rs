#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub title: String,
    pub stream_url: String,
    pub suggested_filename: String,
}

/// Lifecycle of a single cookie-upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Validating,
    Uploading,
    Success,
    Error,
}

/// A settled download rejection, kept around while the failure dialog is up.
///
/// `is_auth_related` is computed once when the failure is constructed and
/// never re-evaluated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    pub raw_message: String,
    pub video_title: String,
    pub is_auth_related: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Extracting,
    AwaitingSavePath,
    Saving,
    Completed,
    Failed,
}

impl DownloadPhase {
    /// A new download may only start once the previous one has settled.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Extracting | Self::AwaitingSavePath | Self::Saving)
    }
}
