use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the client, the upload service and its configuration.
///
/// Nothing is recovered locally: every variant reaches whoever awaited the
/// upload.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid upload endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status. `body` holds whatever it
    /// sent back, decoded lossily.
    #[error("upload failed with status: {status}{}", server_reason(body))]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task driving the request panicked or was aborted.
    #[error("upload task failed: {0}")]
    Task(String),
}

fn server_reason(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", body)
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;

impl UploadError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UploadError::Status { status, .. } => Some(*status),
            UploadError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_code_and_message() {
        let err = UploadError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "Error saving photo".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            err.to_string(),
            "upload failed with status: 500 Internal Server Error (Error saving photo)"
        );
    }

    #[test]
    fn status_error_without_body_shows_only_code() {
        let err = UploadError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "  \n".to_string(),
        };
        assert_eq!(err.to_string(), "upload failed with status: 502 Bad Gateway");
    }

    #[test]
    fn io_error_names_the_file() {
        let err = UploadError::Io {
            path: PathBuf::from("/tmp/missing.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.jpg"));
        assert_eq!(err.status(), None);
    }
}
