use std::path::PathBuf;
use std::time::Duration;

use crate::domain::UploadStatus;

/// How long a successful attempt stays on screen before clearing itself.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

const WRONG_EXTENSION_MESSAGE: &str = "Please select a .txt file";
const UPLOADING_MESSAGE: &str = "Uploading cookies...";
const DEFAULT_SUCCESS_MESSAGE: &str = "Cookies uploaded successfully!";
const DEFAULT_FAILURE_MESSAGE: &str = "Failed to upload cookies";

/// What the caller should do after handing a picked file to
/// [`CookieSubmission::select_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// File accepted. The caller performs exactly one upload for it.
    Upload(UploadRequest),
    /// Rejected before any I/O; status and message already say why.
    Rejected,
    /// An attempt is still in flight; the selection was ignored.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub file_name: String,
}

/// Token for the delayed return to `Idle` after a success. Carries the
/// attempt generation so a reset scheduled for an old attempt cannot clobber
/// a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReset {
    pub generation: u64,
    pub delay: Duration,
}

/// Drives one cookie-file upload attempt from selection to outcome.
///
/// Holds no state beyond the current attempt. Retrying after a failure is
/// the caller's job; this component never re-submits on its own.
#[derive(Debug, Default)]
pub struct CookieSubmission {
    status: UploadStatus,
    message: String,
    file: Option<PathBuf>,
    generation: u64,
}

impl CookieSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    /// Name of the file held by the current attempt, if any.
    pub fn selected_file_name(&self) -> Option<String> {
        self.file
            .as_deref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Starts a new attempt for `path`.
    ///
    /// Selections made while an upload is in flight are ignored. A file
    /// whose name does not end in `.txt` is rejected locally, before any
    /// I/O happens. Accepting a file supersedes any pending delayed reset
    /// from a previous attempt.
    pub fn select_file(&mut self, path: PathBuf) -> SelectOutcome {
        if self.is_uploading() {
            return SelectOutcome::Busy;
        }

        self.generation += 1;
        self.status = UploadStatus::Validating;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !file_name.ends_with(".txt") {
            self.status = UploadStatus::Error;
            self.message = WRONG_EXTENSION_MESSAGE.to_string();
            self.file = None;
            return SelectOutcome::Rejected;
        }

        self.status = UploadStatus::Uploading;
        self.message = UPLOADING_MESSAGE.to_string();
        self.file = Some(path.clone());

        SelectOutcome::Upload(UploadRequest { path, file_name })
    }

    /// Records a successful upload and hands back the delayed-reset token
    /// the caller must schedule.
    pub fn upload_succeeded(&mut self, server_message: Option<String>) -> ScheduledReset {
        self.status = UploadStatus::Success;
        self.message = server_message
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());

        ScheduledReset {
            generation: self.generation,
            delay: RESET_DELAY,
        }
    }

    pub fn upload_failed(&mut self, error_text: &str) {
        self.status = UploadStatus::Error;
        self.message = if error_text.is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            error_text.to_string()
        };
    }

    /// Completes a [`ScheduledReset`]. A token from a superseded attempt is
    /// a no-op.
    pub fn reset(&mut self, token: ScheduledReset) {
        if token.generation != self.generation || self.status != UploadStatus::Success {
            return;
        }
        self.status = UploadStatus::Idle;
        self.message.clear();
        self.file = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(submission: &mut CookieSubmission, name: &str) -> ScheduledReset {
        match submission.select_file(PathBuf::from(name)) {
            SelectOutcome::Upload(_) => {}
            other => panic!("expected acceptance, got {:?}", other),
        }
        submission.upload_succeeded(None)
    }

    #[test]
    fn test_rejects_non_txt_before_any_io() {
        let mut submission = CookieSubmission::new();
        let outcome = submission.select_file(PathBuf::from("cookies.json"));

        // No UploadRequest means no network call can happen.
        assert_eq!(outcome, SelectOutcome::Rejected);
        assert_eq!(submission.status(), UploadStatus::Error);
        assert_eq!(submission.message(), "Please select a .txt file");
    }

    #[test]
    fn test_rejects_extensionless_name() {
        let mut submission = CookieSubmission::new();
        assert_eq!(
            submission.select_file(PathBuf::from("cookies")),
            SelectOutcome::Rejected
        );
    }

    #[test]
    fn test_accepted_file_yields_one_upload_request() {
        let mut submission = CookieSubmission::new();
        let outcome = submission.select_file(PathBuf::from("youtube_cookies.txt"));

        match outcome {
            SelectOutcome::Upload(request) => {
                assert_eq!(request.file_name, "youtube_cookies.txt");
            }
            other => panic!("expected upload request, got {:?}", other),
        }
        assert_eq!(submission.status(), UploadStatus::Uploading);
        assert_eq!(submission.message(), "Uploading cookies...");
    }

    #[test]
    fn test_selection_ignored_while_uploading() {
        let mut submission = CookieSubmission::new();
        submission.select_file(PathBuf::from("a.txt"));

        assert_eq!(
            submission.select_file(PathBuf::from("b.txt")),
            SelectOutcome::Busy
        );
        assert_eq!(submission.status(), UploadStatus::Uploading);
    }

    #[test]
    fn test_success_uses_server_message_when_present() {
        let mut submission = CookieSubmission::new();
        submission.select_file(PathBuf::from("a.txt"));
        submission.upload_succeeded(Some("Cookies file uploaded successfully".to_string()));

        assert_eq!(submission.status(), UploadStatus::Success);
        assert_eq!(submission.message(), "Cookies file uploaded successfully");
    }

    #[test]
    fn test_success_falls_back_to_default_message() {
        let mut submission = CookieSubmission::new();
        submission.select_file(PathBuf::from("a.txt"));
        submission.upload_succeeded(Some(String::new()));

        assert_eq!(submission.message(), "Cookies uploaded successfully!");
    }

    #[test]
    fn test_failure_keeps_error_text() {
        let mut submission = CookieSubmission::new();
        submission.select_file(PathBuf::from("a.txt"));
        submission.upload_failed("Only .txt files are allowed");

        assert_eq!(submission.status(), UploadStatus::Error);
        assert_eq!(submission.message(), "Only .txt files are allowed");
    }

    #[test]
    fn test_failure_without_text_gets_generic_message() {
        let mut submission = CookieSubmission::new();
        submission.select_file(PathBuf::from("a.txt"));
        submission.upload_failed("");

        assert_eq!(submission.message(), "Failed to upload cookies");
    }

    #[test]
    fn test_reset_returns_to_idle_and_drops_file() {
        let mut submission = CookieSubmission::new();
        let token = accepted(&mut submission, "a.txt");
        assert_eq!(token.delay, Duration::from_secs(3));

        submission.reset(token);

        assert_eq!(submission.status(), UploadStatus::Idle);
        assert_eq!(submission.message(), "");
        assert!(submission.file.is_none());
    }

    #[test]
    fn test_stale_reset_does_not_clobber_newer_attempt() {
        let mut submission = CookieSubmission::new();
        let stale = accepted(&mut submission, "old.txt");

        // A new attempt starts before the old reset fires.
        let fresh = accepted(&mut submission, "new.txt");
        submission.reset(stale);

        assert_eq!(submission.status(), UploadStatus::Success);

        submission.reset(fresh);
        assert_eq!(submission.status(), UploadStatus::Idle);
    }
}
