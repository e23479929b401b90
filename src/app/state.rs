use crate::upload::{FileStatus, Healthcheck, Progress, UploadStatus};
use std::path::PathBuf;

/// What a finished upload left behind for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub message: String,
    pub locations: Vec<String>,
}

/// Messages sent from upload tasks to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Started {
        index: usize,
        size: u64,
    },
    Progress {
        index: usize,
        progress: Progress,
    },
    Finished {
        index: usize,
        outcome: Result<UploadOutcome, String>,
    },
    Health(Result<Healthcheck, String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EndpointHealth {
    #[default]
    Unknown,
    Online(Healthcheck),
    Offline(String),
}

#[derive(Debug, Default)]
pub struct UploadState {
    pub selected: Vec<PathBuf>,
    pub files: Vec<FileStatus>,
    pub locations: Vec<String>,
    pub message: Option<String>,
    pub health: EndpointHealth,
}

impl UploadState {
    /// Resets results and marks every selected file as pending.
    pub fn begin(&mut self) {
        self.locations.clear();
        self.message = None;
        self.files = self
            .selected
            .iter()
            .map(|path| FileStatus {
                name: path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
                size: 0,
                status: UploadStatus::Pending,
            })
            .collect();
    }

    pub fn clear(&mut self) {
        let health = std::mem::take(&mut self.health);
        *self = UploadState {
            health,
            ..UploadState::default()
        };
    }

    pub fn apply(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Health(result) => {
                self.health = match result {
                    Ok(check) => EndpointHealth::Online(check),
                    Err(e) => EndpointHealth::Offline(e),
                };
            }
            UploadEvent::Started { index, size } => {
                if let Some(file) = self.files.get_mut(index) {
                    file.size = size;
                }
            }
            UploadEvent::Progress { index, progress } => {
                let Some(file) = self.files.get_mut(index) else {
                    return;
                };
                let advance = match &file.status {
                    UploadStatus::Pending => true,
                    UploadStatus::Uploading(current) => progress.loaded >= current.loaded,
                    _ => false,
                };
                if advance {
                    file.status = UploadStatus::Uploading(progress);
                }
            }
            UploadEvent::Finished { index, outcome } => {
                let Some(file) = self.files.get_mut(index) else {
                    return;
                };
                file.status = match outcome {
                    Ok(outcome) => {
                        self.locations.extend(outcome.locations);
                        UploadStatus::Success(outcome.message)
                    }
                    Err(e) => UploadStatus::Error(e),
                };

                if !self.is_uploading() {
                    let (_, failed) = self.counts();
                    self.message = Some(if failed == 0 {
                        format!("Uploaded {} file(s)", self.files.len())
                    } else {
                        format!(
                            "{} of {} file(s) failed. Check details for more information.",
                            failed,
                            self.files.len()
                        )
                    });
                }
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.files.iter().any(|f| {
            matches!(
                f.status,
                UploadStatus::Pending | UploadStatus::Uploading(_)
            )
        })
    }

    /// `(successful, failed)` among finished uploads.
    pub fn counts(&self) -> (usize, usize) {
        self.files
            .iter()
            .fold((0, 0), |(ok, failed), f| match f.status {
                UploadStatus::Success(_) => (ok + 1, failed),
                UploadStatus::Error(_) => (ok, failed + 1),
                _ => (ok, failed),
            })
    }

    /// Share of all selected bytes sent so far. Finished files count as done.
    pub fn get_progress_percentage(&self) -> f32 {
        let (loaded, total) = self.files.iter().fold((0u64, 0u64), |(loaded, total), f| {
            match &f.status {
                UploadStatus::Uploading(p) => (loaded + p.loaded, total + p.total),
                UploadStatus::Success(_) | UploadStatus::Error(_) => {
                    (loaded + f.size, total + f.size)
                }
                UploadStatus::Pending => (loaded, total + f.size),
            }
        });

        if self.files.is_empty() {
            0.0
        } else if total == 0 {
            if self.is_uploading() {
                0.0
            } else {
                1.0
            }
        } else {
            loaded as f32 / total as f32
        }
    }

    pub fn get_status_text(&self) -> String {
        let (successful, failed) = self.counts();
        format!(
            "Progress: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
            successful + failed,
            self.files.len(),
            successful,
            failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(names: &[&str]) -> UploadState {
        let mut state = UploadState {
            selected: names.iter().map(PathBuf::from).collect(),
            ..UploadState::default()
        };
        state.begin();
        state
    }

    fn progress(loaded: u64, total: u64) -> UploadEvent {
        UploadEvent::Progress {
            index: 0,
            progress: Progress { loaded, total },
        }
    }

    #[test]
    fn begin_marks_every_file_pending() {
        let state = state_with(&["/photos/a.jpg", "/photos/b.jpg"]);
        assert_eq!(state.files.len(), 2);
        assert_eq!(state.files[1].name, "b.jpg");
        assert!(state.is_uploading());
        assert_eq!(state.get_progress_percentage(), 0.0);
    }

    #[test]
    fn progress_never_moves_backwards() {
        let mut state = state_with(&["a.jpg"]);
        state.apply(UploadEvent::Started { index: 0, size: 100 });
        state.apply(progress(60, 100));
        state.apply(progress(30, 100));

        assert_eq!(
            state.files[0].status,
            UploadStatus::Uploading(Progress {
                loaded: 60,
                total: 100
            })
        );
        assert!((state.get_progress_percentage() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn late_progress_does_not_reopen_finished_file() {
        let mut state = state_with(&["a.jpg"]);
        state.apply(UploadEvent::Finished {
            index: 0,
            outcome: Err("request failed".to_string()),
        });
        state.apply(progress(10, 100));

        assert_eq!(
            state.files[0].status,
            UploadStatus::Error("request failed".to_string())
        );
        assert!(!state.is_uploading());
    }

    #[test]
    fn finishing_all_files_sets_summary_and_locations() {
        let mut state = state_with(&["a.jpg", "b.jpg"]);
        state.apply(UploadEvent::Finished {
            index: 1,
            outcome: Ok(UploadOutcome {
                message: "Successfully uploaded files".to_string(),
                locations: vec!["http://pi/photos/b.jpg".to_string()],
            }),
        });
        assert!(state.message.is_none());

        state.apply(UploadEvent::Finished {
            index: 0,
            outcome: Err("upload failed with status: 500 Internal Server Error".to_string()),
        });

        assert_eq!(state.counts(), (1, 1));
        assert_eq!(state.locations, vec!["http://pi/photos/b.jpg"]);
        assert_eq!(
            state.message.as_deref(),
            Some("1 of 2 file(s) failed. Check details for more information.")
        );
        assert_eq!(
            state.get_status_text(),
            "Progress: 2/2 files | ✅ Success: 1 | ❌ Failed: 1"
        );
    }

    #[test]
    fn events_for_unknown_files_are_ignored() {
        let mut state = state_with(&["a.jpg"]);
        state.apply(UploadEvent::Started { index: 5, size: 10 });
        state.apply(UploadEvent::Finished {
            index: 5,
            outcome: Err("x".to_string()),
        });
        assert_eq!(state.files[0].status, UploadStatus::Pending);
    }

    #[test]
    fn clear_keeps_endpoint_health() {
        let mut state = state_with(&["a.jpg"]);
        state.apply(UploadEvent::Health(Err("connection refused".to_string())));
        state.clear();

        assert!(state.files.is_empty());
        assert!(state.selected.is_empty());
        assert_eq!(
            state.health,
            EndpointHealth::Offline("connection refused".to_string())
        );
    }
}
