pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod upload;
pub mod utils;

pub use crate::config::ClientConfig;
pub use crate::error::{Result, UploadError};
pub use crate::http::HttpClient;
pub use crate::upload::{
    PendingUpload, Progress, ProgressCallback, UploadFile, UploadFilesService,
};
