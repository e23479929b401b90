mod files;
mod service;
mod types;

pub use files::collect_folder;
pub use service::{
    PendingUpload, ProgressCallback, UploadFilesService, HEALTHCHECK_PATH, PHOTOS_PATH,
    UPLOAD_FIELD,
};
pub use types::{
    FileStatus, Healthcheck, PhotosAck, Progress, UploadFile, UploadResponse, UploadStatus,
};
