use std::path::Path;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, UploadError};
use crate::utils::mime::detect_mime_type;

/// A single file held in memory, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Reads the whole file. The MIME type is derived from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            name,
            bytes,
            mime: detect_mime_type(path).map(str::to_string),
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Bytes of the file payload handed to the transport so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub loaded: u64,
    pub total: u64,
}

impl Progress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.loaded as f64 / self.total as f64).min(1.0) as f32
        }
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// The server's answer, passed through untouched.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Acknowledgement body returned by the photo server for `POST /photos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotosAck {
    pub message: String,
    /// The photo server sends `null` when no part carried a photo.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /healthcheck`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Healthcheck {
    pub app_name: String,
    pub version: String,
}

impl UploadResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn ack(&self) -> Result<PhotosAck> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// One `Location` per stored photo.
    pub fn locations(&self) -> Vec<String> {
        self.headers
            .get_all(LOCATION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Uploading(Progress),
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileStatus {
    pub name: String,
    pub size: u64,
    pub status: UploadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn progress_fraction_handles_empty_files() {
        let empty = Progress { loaded: 0, total: 0 };
        assert_eq!(empty.fraction(), 0.0);
        assert!(empty.is_complete());

        let half = Progress {
            loaded: 1_048_576,
            total: 2_097_152,
        };
        assert_eq!(half.percent(), 50);
        assert!(!half.is_complete());
    }

    #[test]
    fn response_views_leave_body_alone() {
        let mut headers = HeaderMap::new();
        headers.append(LOCATION, HeaderValue::from_static("http://pi/photos/a.jpg"));
        headers.append(LOCATION, HeaderValue::from_static("http://pi/photos/b.jpg"));
        let body = br#"{"message":"Successfully uploaded files","files":["a.jpg"]}"#.to_vec();
        let response = UploadResponse {
            status: StatusCode::OK,
            headers,
            body: body.clone(),
        };

        let ack = response.ack().unwrap();
        assert_eq!(ack.message, "Successfully uploaded files");
        assert_eq!(ack.files, vec!["a.jpg".to_string()]);
        assert_eq!(
            response.locations(),
            vec!["http://pi/photos/a.jpg", "http://pi/photos/b.jpg"]
        );
        assert_eq!(response.body, body);
    }

    #[test]
    fn ack_accepts_null_or_missing_file_list() {
        for body in [
            r#"{"message":"Successfully uploaded files","files":null}"#,
            r#"{"message":"Successfully uploaded files"}"#,
        ] {
            let response = UploadResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: body.as_bytes().to_vec(),
            };
            let ack = response.ack().unwrap();
            assert_eq!(ack.message, "Successfully uploaded files");
            assert!(ack.files.is_empty());
        }
    }

    #[test]
    fn ack_rejects_non_json_body() {
        let response = UploadResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: b"ok".to_vec(),
        };
        assert!(matches!(response.ack(), Err(UploadError::Decode(_))));
        assert_eq!(response.text(), "ok");
    }

    #[test]
    fn healthcheck_uses_camel_case() {
        let h: Healthcheck =
            serde_json::from_str(r#"{"appName":"photopi-api","version":"1.2.0"}"#).unwrap();
        assert_eq!(h.app_name, "photopi-api");
        assert_eq!(h.version, "1.2.0");
    }

    #[tokio::test]
    async fn from_path_reads_name_bytes_and_mime() {
        let path = std::env::temp_dir().join(format!("pi-photos-{}.jpg", std::process::id()));
        tokio::fs::write(&path, b"\xFF\xD8\xFFjpeg").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, path.file_name().unwrap().to_string_lossy());
        assert_eq!(file.bytes, b"\xFF\xD8\xFFjpeg");
        assert_eq!(file.mime.as_deref(), Some("image/jpeg"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn from_path_reports_missing_file() {
        let err = UploadFile::from_path(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }
}
