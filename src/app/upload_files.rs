use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::sync::Arc;

use eframe::egui;
use rfd::FileDialog;
use tokio::runtime::Handle;

use super::state::{UploadEvent, UploadOutcome, UploadState};
use crate::upload::{collect_folder, ProgressCallback, UploadFile, UploadFilesService};

/// File picker plus one upload per selected file.
pub struct UploadFiles {
    pub(super) state: UploadState,
    service: UploadFilesService,
    runtime: Handle,
    sender: Sender<UploadEvent>,
    receiver: Receiver<UploadEvent>,
}

impl UploadFiles {
    pub fn new(service: UploadFilesService, runtime: Handle) -> Self {
        let (sender, receiver) = std_mpsc::channel();
        Self {
            state: UploadState::default(),
            service,
            runtime,
            sender,
            receiver,
        }
    }

    pub fn check_health(&self, ctx: &egui::Context) {
        let service = self.service.clone();
        let sender = self.sender.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = service.check_health().await.map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!("Upload endpoint health check failed: {}", e);
            }
            sender.send(UploadEvent::Health(result)).unwrap_or_default();
            ctx.request_repaint();
        });
    }

    pub fn select_files(&mut self) {
        if let Some(paths) = FileDialog::new().pick_files() {
            self.add_files(paths);
        }
    }

    pub fn select_folder(&mut self) {
        if let Some(folder) = FileDialog::new().pick_folder() {
            let files = collect_folder(&folder);
            tracing::info!("Found {} files in {}", files.len(), folder.display());
            self.add_files(files);
        }
    }

    pub fn add_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if !self.state.selected.contains(&path) {
                self.state.selected.push(path);
            }
        }
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    pub fn can_upload(&self) -> bool {
        !self.state.selected.is_empty() && !self.state.is_uploading()
    }

    /// Issues one independent upload per selected file.
    pub fn start_upload(&mut self, ctx: &egui::Context) {
        if self.state.selected.is_empty() {
            self.state.message = Some("Please select files to upload".to_string());
            return;
        }

        self.state.begin();
        tracing::info!("Uploading {} files", self.state.selected.len());

        for (index, path) in self.state.selected.iter().cloned().enumerate() {
            let service = self.service.clone();
            let sender = self.sender.clone();
            let ctx = ctx.clone();

            self.runtime.spawn(async move {
                let outcome = upload_one(&service, index, &path, &sender, &ctx).await;
                if let Err(e) = &outcome {
                    tracing::error!("Could not upload {}: {}", path.display(), e);
                }
                sender
                    .send(UploadEvent::Finished { index, outcome })
                    .unwrap_or_default();
                ctx.request_repaint();
            });
        }
    }

    pub fn update_state(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            self.state.apply(event);
        }
    }
}

async fn upload_one(
    service: &UploadFilesService,
    index: usize,
    path: &Path,
    sender: &Sender<UploadEvent>,
    ctx: &egui::Context,
) -> Result<UploadOutcome, String> {
    let file = UploadFile::from_path(path).await.map_err(|e| e.to_string())?;
    let name = file.name.clone();
    sender
        .send(UploadEvent::Started {
            index,
            size: file.size(),
        })
        .unwrap_or_default();

    let progress_sender = sender.clone();
    let repaint = ctx.clone();
    let on_progress: ProgressCallback = Arc::new(move |progress| {
        progress_sender
            .send(UploadEvent::Progress { index, progress })
            .unwrap_or_default();
        repaint.request_repaint();
    });

    let response = service
        .upload(file, Some(on_progress))
        .await
        .map_err(|e| e.to_string())?;

    let message = response
        .ack()
        .map(|ack| ack.message)
        .unwrap_or_else(|_| format!("Uploaded the file successfully: {}", name));

    Ok(UploadOutcome {
        message,
        locations: response.locations(),
    })
}
