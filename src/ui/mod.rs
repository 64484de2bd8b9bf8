use iced::{
    widget::{button, column, progress_bar, row, text, text_input, Space},
    Element, Length,
};

use crate::application::{CookieSubmission, RecoveryFlow};
use crate::domain::{DownloadPhase, UploadStatus};

/// Main view state
pub struct DownloadView {
    pub youtube_url: String,
    pub status_message: String,
    pub phase: DownloadPhase,
    pub progress: f32,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            youtube_url: String::new(),
            status_message: "Paste a YouTube link to download FLAC".to_string(),
            phase: DownloadPhase::Idle,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    DownloadPressed,
    ShowCookieFormPressed,
    ChooseCookieFilePressed,
    RetryPressed,
    DismissPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        if let DownloadMessage::UrlChanged(url) = message {
            self.youtube_url = url;
        }
        // Everything else is handled by the app.
    }

    pub fn view<'a>(
        &'a self,
        recovery: &'a RecoveryFlow,
        cookies: &'a CookieSubmission,
    ) -> Element<'a, DownloadMessage> {
        let mut download_button = button("Download FLAC").padding([10, 20]);
        if !self.phase.is_busy() {
            download_button = download_button.on_press(DownloadMessage::DownloadPressed);
        }

        let mut content = column![
            text("FLAC Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("YouTube link:").size(16),
            text_input("Paste a video URL...", &self.youtube_url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            text(&self.status_message).size(14),
            Space::new().height(Length::Fixed(20.0)),
            download_button,
        ]
        .padding(20)
        .spacing(10);

        if self.phase == DownloadPhase::Saving {
            content = content.push(progress_bar(0.0..=1.0, self.progress));
        }

        // Cookies can be provided up front, without waiting for a failure.
        if !recovery.has_cookies() && !recovery.cookie_form_visible() && recovery.failure().is_none()
        {
            content = content.push(
                button("Upload Cookies")
                    .on_press(DownloadMessage::ShowCookieFormPressed)
                    .padding([6, 12]),
            );
        }

        if let Some(failure) = recovery.failure() {
            content = content.push(Space::new().height(Length::Fixed(20.0)));
            content = content.push(Self::failure_panel(
                &failure.video_title,
                &failure.raw_message,
                failure.is_auth_related,
                recovery.cookie_form_visible(),
            ));
        }

        if recovery.cookie_form_visible() {
            content = content.push(Space::new().height(Length::Fixed(10.0)));
            content = content.push(Self::cookie_panel(cookies));
        }

        content.into()
    }

    fn failure_panel<'a>(
        video_title: &'a str,
        error_text: &'a str,
        is_auth_related: bool,
        cookie_form_visible: bool,
    ) -> Element<'a, DownloadMessage> {
        let mut panel = column![
            text("Download Failed").size(20),
            text(video_title).size(14),
            Space::new().height(Length::Fixed(6.0)),
            text(error_text).size(14),
        ]
        .spacing(4);

        if is_auth_related {
            panel = panel.push(
                text("YouTube requires authentication to download. You can provide your cookies to continue.")
                    .size(13),
            );
        }

        if !cookie_form_visible {
            panel = panel.push(
                button("Upload YouTube Cookies")
                    .on_press(DownloadMessage::ShowCookieFormPressed)
                    .padding([6, 12]),
            );
        }

        panel = panel.push(
            row![
                button("Dismiss")
                    .on_press(DownloadMessage::DismissPressed)
                    .padding([6, 12]),
                button("Retry Download")
                    .on_press(DownloadMessage::RetryPressed)
                    .padding([6, 12]),
            ]
            .spacing(10),
        );

        panel.into()
    }

    fn cookie_panel(cookies: &CookieSubmission) -> Element<'_, DownloadMessage> {
        let label = if cookies.is_uploading() {
            "Uploading..."
        } else {
            "Click to upload cookies file"
        };

        let mut choose_button = button(label).padding([10, 20]);
        if !cookies.is_uploading() {
            choose_button = choose_button.on_press(DownloadMessage::ChooseCookieFilePressed);
        }

        let mut panel = column![
            text("YouTube Authentication").size(18),
            text("To download, provide your YouTube cookies for authentication.").size(13),
            text("(.txt format only)").size(12),
            choose_button,
        ]
        .spacing(6);

        if let Some(file_name) = cookies.selected_file_name() {
            panel = panel.push(text(file_name).size(12));
        }

        if cookies.status() != UploadStatus::Idle && !cookies.message().is_empty() {
            panel = panel.push(text(cookies.message()).size(13));
        }

        panel.into()
    }
}
