use tracing::debug;

use crate::application::classifier::{FailureClassifier, SubstringClassifier};
use crate::domain::DownloadFailure;

const FALLBACK_VIDEO_TITLE: &str = "This video";

/// What the caller must do after asking for a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    /// Credentials are known to be absent. Surface the cookie form instead
    /// of making a round trip that is guaranteed to fail.
    ShowCookieForm,
    /// Perform the backend download call for this URL.
    Fetch(String),
}

/// Sequences the end-to-end recovery flow: credential presence, the failure
/// dialog, the cookie form inside it, and the retry handshake.
///
/// Invariant: the cookie form is only visible while a failure is held or
/// after the user (or a missing-credentials check) explicitly asked for it.
pub struct RecoveryFlow<C = SubstringClassifier> {
    classifier: C,
    has_cookies: bool,
    failure: Option<DownloadFailure>,
    cookie_form_visible: bool,
    pending_url: Option<String>,
}

impl RecoveryFlow<SubstringClassifier> {
    pub fn new() -> Self {
        Self::with_classifier(SubstringClassifier)
    }
}

impl Default for RecoveryFlow<SubstringClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FailureClassifier> RecoveryFlow<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            classifier,
            has_cookies: false,
            failure: None,
            cookie_form_visible: false,
            pending_url: None,
        }
    }

    /// Seeds credential presence from the backend's startup query. Until
    /// the answer arrives, credentials are treated as absent.
    pub fn seed_credentials(&mut self, has_cookies: bool) {
        self.has_cookies = has_cookies;
    }

    pub fn has_cookies(&self) -> bool {
        self.has_cookies
    }

    pub fn failure(&self) -> Option<&DownloadFailure> {
        self.failure.as_ref()
    }

    pub fn cookie_form_visible(&self) -> bool {
        self.cookie_form_visible
    }

    /// Entry point for a download request. The URL is remembered so a later
    /// retry or cookie-upload success can re-run the same request.
    pub fn request_download(&mut self, url: String) -> DownloadAction {
        self.pending_url = Some(url.clone());
        if !self.has_cookies {
            self.cookie_form_visible = true;
            return DownloadAction::ShowCookieForm;
        }
        DownloadAction::Fetch(url)
    }

    pub fn download_succeeded(&mut self) {
        self.pending_url = None;
    }

    /// Records a rejected download. Auth-classified failures open the
    /// cookie form right away and mark the stored cookies stale, so the
    /// next request goes straight to the form instead of failing again.
    pub fn download_failed(&mut self, raw_message: String, video_title: Option<String>) {
        let is_auth_related = self.classifier.is_auth_failure(&raw_message);
        debug!(auth = is_auth_related, "download rejected: {}", raw_message);

        if is_auth_related {
            self.has_cookies = false;
        }
        self.cookie_form_visible = is_auth_related;
        self.failure = Some(DownloadFailure {
            raw_message,
            video_title: video_title.unwrap_or_else(|| FALLBACK_VIDEO_TITLE.to_string()),
            is_auth_related,
        });
    }

    /// The user asked for the cookie form outside of any failure.
    pub fn request_cookie_form(&mut self) {
        self.cookie_form_visible = true;
    }

    /// Manual retry of the last requested URL. Clears the current failure
    /// first. No backoff, no retry counting; one attempt per user action.
    pub fn retry(&mut self) -> Option<DownloadAction> {
        let url = self.pending_url.clone()?;
        self.failure = None;
        self.cookie_form_visible = false;
        Some(self.request_download(url))
    }

    /// Explicit dismissal: drop the failure without retrying. Safe to call
    /// repeatedly.
    pub fn dismiss(&mut self) {
        self.failure = None;
        self.cookie_form_visible = false;
        self.pending_url = None;
    }

    /// A cookie upload went through. Credentials are now present; the
    /// dialog closes, and the caller gets the pending URL back (if the
    /// form was reached from a download attempt) to re-run it.
    pub fn cookie_upload_succeeded(&mut self) -> Option<String> {
        self.has_cookies = true;
        self.failure = None;
        self.cookie_form_visible = false;
        self.pending_url.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cookies_short_circuits_to_form() {
        let mut flow = RecoveryFlow::new();

        let action = flow.request_download("https://x/video".to_string());

        assert_eq!(action, DownloadAction::ShowCookieForm);
        assert!(flow.cookie_form_visible());
        assert!(flow.failure().is_none());
    }

    #[test]
    fn test_present_cookies_fetch_directly() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);

        let action = flow.request_download("https://x/video".to_string());

        assert_eq!(action, DownloadAction::Fetch("https://x/video".to_string()));
        assert!(!flow.cookie_form_visible());
    }

    #[test]
    fn test_auth_failure_opens_form_and_marks_cookies_stale() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());

        flow.download_failed("401: cookies invalid".to_string(), None);

        let failure = flow.failure().expect("failure recorded");
        assert!(failure.is_auth_related);
        assert_eq!(failure.video_title, "This video");
        assert!(flow.cookie_form_visible());
        assert!(!flow.has_cookies());
    }

    #[test]
    fn test_unrelated_failure_keeps_cookies_and_form_hidden() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());

        flow.download_failed("Network timeout".to_string(), Some("Some track".to_string()));

        let failure = flow.failure().expect("failure recorded");
        assert!(!failure.is_auth_related);
        assert_eq!(failure.video_title, "Some track");
        assert!(!flow.cookie_form_visible());
        assert!(flow.has_cookies());
    }

    #[test]
    fn test_retry_clears_failure_and_reuses_url() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());
        flow.download_failed("Network timeout".to_string(), None);

        let action = flow.retry();

        assert_eq!(
            action,
            Some(DownloadAction::Fetch("https://x/video".to_string()))
        );
        assert!(flow.failure().is_none());
    }

    #[test]
    fn test_retry_without_prior_request_is_none() {
        let mut flow = RecoveryFlow::new();
        assert_eq!(flow.retry(), None);
    }

    #[test]
    fn test_dismiss_twice_is_a_no_op() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());
        flow.download_failed("Network timeout".to_string(), None);

        flow.dismiss();
        flow.dismiss();

        assert!(flow.failure().is_none());
        assert!(!flow.cookie_form_visible());
        assert_eq!(flow.retry(), None);
    }

    #[test]
    fn test_cookie_success_resolves_and_hands_back_pending_url() {
        let mut flow = RecoveryFlow::new();
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());
        flow.download_failed("Sign in to confirm you're not a bot".to_string(), None);

        let pending = flow.cookie_upload_succeeded();

        assert_eq!(pending, Some("https://x/video".to_string()));
        assert!(flow.has_cookies());
        assert!(flow.failure().is_none());
        assert!(!flow.cookie_form_visible());

        // The re-run now goes to the network.
        let action = flow.request_download("https://x/video".to_string());
        assert_eq!(action, DownloadAction::Fetch("https://x/video".to_string()));
    }

    #[test]
    fn test_cookie_success_from_explicit_form_has_no_url_to_rerun() {
        let mut flow = RecoveryFlow::new();
        flow.request_cookie_form();

        assert_eq!(flow.cookie_upload_succeeded(), None);
        assert!(flow.has_cookies());
    }

    #[test]
    fn test_cookies_survive_unrelated_failures() {
        let mut flow = RecoveryFlow::new();
        flow.request_download("https://x/video".to_string());
        flow.cookie_upload_succeeded();

        flow.request_download("https://x/video".to_string());
        flow.download_failed("Network timeout".to_string(), None);
        flow.dismiss();

        assert!(flow.has_cookies());
    }

    #[test]
    fn test_classification_happens_once_at_construction() {
        struct FlipFlop(std::cell::Cell<bool>);
        impl FailureClassifier for FlipFlop {
            fn is_auth_failure(&self, _text: &str) -> bool {
                let value = self.0.get();
                self.0.set(!value);
                value
            }
        }

        let mut flow = RecoveryFlow::with_classifier(FlipFlop(std::cell::Cell::new(true)));
        flow.seed_credentials(true);
        flow.request_download("https://x/video".to_string());
        flow.download_failed("whatever".to_string(), None);

        // The stored verdict stays what it was at failure time.
        assert!(flow.failure().expect("failure recorded").is_auth_related);
        assert!(flow.failure().expect("failure recorded").is_auth_related);
    }
}
