use std::path::PathBuf;

use futures::StreamExt;
use iced::Task;
use tracing::{debug, warn};

use crate::api::{ApiConfig, BackendClient};
use crate::application::{
    CookieSubmission, DownloadAction, DownloadCoordinator, RecoveryFlow, SaveEvent, ScheduledReset,
    SelectOutcome,
};
use crate::domain::{DownloadPhase, DownloadPlan};
use crate::ui::{DownloadMessage, DownloadView};

pub struct DownloadApp {
    view: DownloadView,
    client: BackendClient,
    coordinator: DownloadCoordinator,
    recovery: RecoveryFlow,
    cookies: CookieSubmission,
}

/// Builds the app state and fires the one-time credential query.
pub fn boot() -> (DownloadApp, Task<Message>) {
    let client = BackendClient::new(ApiConfig::default());
    let coordinator = DownloadCoordinator::new(client.clone());

    let app = DownloadApp {
        view: DownloadView::default(),
        client: client.clone(),
        coordinator,
        recovery: RecoveryFlow::new(),
        cookies: CookieSubmission::new(),
    };

    let task = Task::perform(
        async move {
            client
                .check_cookies()
                .await
                .map(|status| status.has_cookies)
                .map_err(|e| e.to_string())
        },
        Message::CookieStatusReceived,
    );

    (app, task)
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Startup answer to "does the backend already hold cookies?"
    CookieStatusReceived(Result<bool, String>),
    /// Outcome of the backend extraction request
    PlanReceived(Result<DownloadPlan, String>),
    /// (Selected path, stream URL)
    SavePathSelected(Option<PathBuf>, String),
    /// Save progress (0.0 to 1.0)
    SaveProgress(f32),
    /// Final result after streaming and saving
    SaveCompleted(Result<PathBuf, String>),
    CookieFileSelected(Option<PathBuf>),
    /// Server message on success, error text on failure
    CookieUploadFinished(Result<Option<String>, String>),
    /// The delayed upload-status reset came due
    UploadStatusResetDue(ScheduledReset),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => {
                    if app.view.youtube_url.is_empty() || app.view.phase.is_busy() {
                        return Task::none();
                    }
                    if crate::utils::extract_video_id(&app.view.youtube_url).is_none() {
                        app.view.status_message = "Invalid YouTube URL or video ID".to_string();
                        return Task::none();
                    }
                    let url = app.view.youtube_url.clone();
                    return begin_download(app, url);
                }
                DownloadMessage::ShowCookieFormPressed => {
                    app.recovery.request_cookie_form();
                }
                DownloadMessage::ChooseCookieFilePressed => {
                    if app.cookies.is_uploading() {
                        return Task::none();
                    }
                    return Task::perform(
                        async move {
                            rfd::AsyncFileDialog::new()
                                .add_filter("Cookies file", &["txt"])
                                .pick_file()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::CookieFileSelected,
                    );
                }
                DownloadMessage::RetryPressed => {
                    if let Some(action) = app.recovery.retry() {
                        app.view.phase = DownloadPhase::Idle;
                        return run_action(app, action);
                    }
                }
                DownloadMessage::DismissPressed => {
                    app.recovery.dismiss();
                    if app.view.phase == DownloadPhase::Failed {
                        app.view.phase = DownloadPhase::Idle;
                    }
                }
                DownloadMessage::UrlChanged(_) => {}
            }
        }
        Message::CookieStatusReceived(result) => match result {
            Ok(has_cookies) => {
                debug!(has_cookies, "credential status received");
                app.recovery.seed_credentials(has_cookies);
            }
            Err(e) => {
                // Leave credentials marked absent; the flow will ask for
                // cookies before the first download attempt.
                warn!("cookie status check failed: {}", e);
            }
        },
        Message::PlanReceived(result) => match result {
            Ok(plan) => {
                app.view.phase = DownloadPhase::AwaitingSavePath;
                app.view.status_message = "Please select save location...".to_string();

                let coordinator = app.coordinator.clone();
                let stream_url = plan.stream_url.clone();
                return Task::perform(
                    async move {
                        let path = coordinator.choose_save_path(plan.suggested_filename).await;
                        (path, stream_url)
                    },
                    |(path, stream_url)| Message::SavePathSelected(path, stream_url),
                );
            }
            Err(error_text) => {
                app.view.phase = DownloadPhase::Failed;
                app.view.status_message = "Download failed".to_string();
                app.recovery.download_failed(error_text, None);
            }
        },
        Message::SavePathSelected(path_opt, stream_url) => match path_opt {
            Some(path) => {
                app.view.phase = DownloadPhase::Saving;
                app.view.status_message = format!("Saving to: {}", path.display());

                return Task::stream(app.coordinator.save_stream(stream_url, path).map(
                    |event| match event {
                        SaveEvent::Progress(progress) => Message::SaveProgress(progress),
                        SaveEvent::Completed(path) => Message::SaveCompleted(Ok(path)),
                        SaveEvent::Failed(error) => Message::SaveCompleted(Err(error.to_string())),
                    },
                ));
            }
            None => {
                app.view.phase = DownloadPhase::Idle;
                app.view.status_message = "Download cancelled".to_string();
            }
        },
        Message::SaveProgress(progress) => {
            app.view.progress = progress;
            if progress >= 1.0 {
                app.view.status_message = "Download complete, finalizing...".to_string();
            } else {
                app.view.status_message = format!("Downloading: {:.1}%", progress * 100.0);
            }
        }
        Message::SaveCompleted(result) => {
            app.view.progress = 0.0;
            match result {
                Ok(path) => {
                    app.view.phase = DownloadPhase::Completed;
                    app.view.status_message = format!("Saved: {}", path.display());
                    app.recovery.download_succeeded();
                }
                Err(error_text) => {
                    app.view.phase = DownloadPhase::Failed;
                    app.view.status_message = "Download failed".to_string();
                    app.recovery.download_failed(error_text, None);
                }
            }
        }
        Message::CookieFileSelected(path_opt) => {
            let Some(path) = path_opt else {
                return Task::none();
            };

            match app.cookies.select_file(path) {
                SelectOutcome::Upload(request) => {
                    let client = app.client.clone();
                    return Task::perform(
                        async move {
                            let contents = tokio::fs::read(&request.path)
                                .await
                                .map_err(|e| format!("Failed to read file: {}", e))?;
                            client
                                .upload_cookies(&request.file_name, contents)
                                .await
                                .map(|response| response.message)
                                .map_err(|e| e.to_string())
                        },
                        Message::CookieUploadFinished,
                    );
                }
                // Rejection already set the status and message; nothing to run.
                SelectOutcome::Rejected | SelectOutcome::Busy => {}
            }
        }
        Message::CookieUploadFinished(result) => match result {
            Ok(server_message) => {
                debug!("cookie upload succeeded");
                let token = app.cookies.upload_succeeded(server_message);
                let reset = Task::perform(
                    async move {
                        tokio::time::sleep(token.delay).await;
                        token
                    },
                    Message::UploadStatusResetDue,
                );

                // Credentials are in place now; re-run the download that
                // brought the user here, if there was one.
                let rerun = match app.recovery.cookie_upload_succeeded() {
                    Some(url) => begin_download(app, url),
                    None => Task::none(),
                };

                return Task::batch([reset, rerun]);
            }
            Err(error_text) => {
                warn!("cookie upload failed: {}", error_text);
                app.cookies.upload_failed(&error_text);
            }
        },
        Message::UploadStatusResetDue(token) => {
            app.cookies.reset(token);
        }
    }
    Task::none()
}

fn begin_download(app: &mut DownloadApp, url: String) -> Task<Message> {
    let action = app.recovery.request_download(url);
    run_action(app, action)
}

fn run_action(app: &mut DownloadApp, action: DownloadAction) -> Task<Message> {
    match action {
        DownloadAction::ShowCookieForm => {
            app.view.status_message =
                "YouTube authentication required. Upload your cookies to continue.".to_string();
            Task::none()
        }
        DownloadAction::Fetch(url) => {
            app.view.phase = DownloadPhase::Extracting;
            app.view.status_message = "Requesting audio extraction...".to_string();

            let coordinator = app.coordinator.clone();
            Task::perform(
                async move {
                    coordinator
                        .prepare_download(url)
                        .await
                        .map_err(|e| e.to_string())
                },
                Message::PlanReceived,
            )
        }
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view
        .view(&app.recovery, &app.cookies)
        .map(Message::UiMessage)
}
