use std::path::PathBuf;

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::{
    api::BackendClient,
    domain::{AppError, DownloadPlan},
    utils::{extract_video_id, sanitize_filename},
};

#[derive(Debug, Clone)]
pub enum SaveEvent {
    Progress(f32),
    Completed(PathBuf),
    Failed(AppError),
}

/// Runs the extraction request against the backend and saves the finished
/// file to disk. Recovery decisions live elsewhere; this only moves bytes.
#[derive(Clone)]
pub struct DownloadCoordinator {
    client: BackendClient,
}

impl DownloadCoordinator {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Asks the backend to extract audio for `video_url`. Blocks (as a
    /// future) until the backend's job settles one way or the other.
    pub async fn prepare_download(&self, video_url: String) -> Result<DownloadPlan, AppError> {
        if extract_video_id(&video_url).is_none() {
            return Err(AppError::InvalidInput);
        }

        let response = self
            .client
            .download_audio(&video_url)
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        let title = if response.metadata.title.is_empty() {
            response.video_id.clone()
        } else {
            response.metadata.title.clone()
        };

        let suggested_filename = format!("{}.flac", sanitize_filename(&title));

        Ok(DownloadPlan {
            title,
            stream_url: response.file,
            suggested_filename,
        })
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(&suggested_filename)
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// Streams the finished file from the backend into `path`, emitting
    /// progress along the way.
    pub fn save_stream(&self, stream_url: String, path: PathBuf) -> BoxStream<'static, SaveEvent> {
        let client = self.client.clone();

        futures::stream::unfold(
            SaveState::Connect {
                client,
                stream_url,
                path,
            },
            |state| async move {
                match state {
                    SaveState::Connect {
                        client,
                        stream_url,
                        path,
                    } => {
                        let file = match tokio::fs::File::create(&path).await {
                            Ok(file) => file,
                            Err(e) => {
                                return Some((
                                    SaveEvent::Failed(AppError::Io(format!(
                                        "Failed to create file: {}",
                                        e
                                    ))),
                                    SaveState::Done,
                                ));
                            }
                        };

                        match client.download_file_stream(&stream_url).await {
                            Ok((total, stream)) => Some((
                                SaveEvent::Progress(0.0),
                                SaveState::Writing {
                                    file,
                                    stream: stream.boxed(),
                                    written: 0,
                                    total,
                                    path,
                                },
                            )),
                            Err(e) => Some((
                                SaveEvent::Failed(AppError::Backend(e.to_string())),
                                SaveState::Done,
                            )),
                        }
                    }
                    SaveState::Writing {
                        mut file,
                        mut stream,
                        mut written,
                        total,
                        path,
                    } => match stream.next().await {
                        Some(Ok(chunk)) => {
                            if let Err(e) = file.write_all(&chunk).await {
                                return Some((
                                    SaveEvent::Failed(AppError::Io(format!("Write error: {}", e))),
                                    SaveState::Done,
                                ));
                            }

                            written += chunk.len() as u64;
                            let progress = match total {
                                Some(total) if total > 0 => written as f32 / total as f32,
                                _ => 0.0,
                            };

                            Some((
                                SaveEvent::Progress(progress),
                                SaveState::Writing {
                                    file,
                                    stream,
                                    written,
                                    total,
                                    path,
                                },
                            ))
                        }
                        Some(Err(e)) => Some((
                            SaveEvent::Failed(AppError::Backend(e.to_string())),
                            SaveState::Done,
                        )),
                        None => {
                            if let Err(e) = file.sync_all().await {
                                return Some((
                                    SaveEvent::Failed(AppError::Io(format!(
                                        "Failed to sync file: {}",
                                        e
                                    ))),
                                    SaveState::Done,
                                ));
                            }

                            Some((SaveEvent::Completed(path), SaveState::Done))
                        }
                    },
                    SaveState::Done => None,
                }
            },
        )
        .boxed()
    }
}

enum SaveState {
    Connect {
        client: BackendClient,
        stream_url: String,
        path: PathBuf,
    },
    Writing {
        file: tokio::fs::File,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
        written: u64,
        total: Option<u64>,
        path: PathBuf,
    },
    Done,
}
