use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::task::JoinHandle;

use crate::error::{Result, UploadError};
use crate::http::HttpClient;
use crate::upload::types::{Healthcheck, Progress, UploadFile, UploadResponse};

/// Form field the photo server reads images from.
pub const UPLOAD_FIELD: &str = "uploadImages";
pub const PHOTOS_PATH: &str = "/photos";
pub const HEALTHCHECK_PATH: &str = "/healthcheck";

/// Size of the slices the payload is streamed in; one progress report each.
const CHUNK_SIZE: usize = 64 * 1024;

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct UploadFilesService {
    http: HttpClient,
}

impl UploadFilesService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Sends `file` as the only part of a multipart POST to `/photos`.
    ///
    /// The request starts right away on the current tokio runtime; the
    /// returned [`PendingUpload`] resolves once the server has answered.
    /// Must be called from within a runtime context.
    pub fn upload(&self, file: UploadFile, on_progress: Option<ProgressCallback>) -> PendingUpload {
        let file_name = file.name.clone();
        let size = file.size();
        let http = self.http.clone();

        let handle = tokio::spawn(async move { send_photo(&http, file, on_progress).await });

        let pending = PendingUpload {
            file_name,
            size,
            handle,
        };
        tracing::debug!("Upload pending: {:?}", pending);
        pending
    }

    pub async fn check_health(&self) -> Result<Healthcheck> {
        let response = self
            .http
            .get(HEALTHCHECK_PATH)?
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

async fn send_photo(
    http: &HttpClient,
    file: UploadFile,
    on_progress: Option<ProgressCallback>,
) -> Result<UploadResponse> {
    let UploadFile { name, bytes, mime } = file;
    let total = bytes.len() as u64;

    let payload = Bytes::from(bytes);
    let mut part = Part::stream_with_length(progress_body(payload, on_progress), total)
        .file_name(name.clone());
    if let Some(mime) = mime {
        part = part.mime_str(&mime)?;
    }
    let form = Form::new().part(UPLOAD_FIELD, part);

    // The multipart body replaces the default JSON content type.
    let response = http.post(PHOTOS_PATH)?.multipart(form).send().await?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    if !status.is_success() {
        let body = String::from_utf8_lossy(&body).into_owned();
        tracing::warn!("Upload of '{}' rejected with {}: {}", name, status, body);
        return Err(UploadError::Status { status, body });
    }

    tracing::info!("Uploaded '{}' ({} bytes): {}", name, total, status);
    Ok(UploadResponse {
        status,
        headers,
        body,
    })
}

/// Splits `payload` into views of at most `CHUNK_SIZE` bytes sharing its buffer.
fn payload_chunks(payload: Bytes) -> impl Iterator<Item = Bytes> {
    let len = payload.len();
    (0..len)
        .step_by(CHUNK_SIZE)
        .map(move |start| payload.slice(start..(start + CHUNK_SIZE).min(len)))
}

/// Streams `payload` in chunks, reporting the running total as each chunk is
/// pulled by the transport.
fn progress_body(payload: Bytes, on_progress: Option<ProgressCallback>) -> Body {
    let total = payload.len() as u64;

    let mut loaded = 0u64;
    let chunks = stream::iter(payload_chunks(payload)).map(move |chunk| {
        loaded += chunk.len() as u64;
        if let Some(callback) = &on_progress {
            callback(Progress { loaded, total });
        }
        Ok::<_, std::io::Error>(chunk)
    });

    Body::wrap_stream(chunks)
}

/// An upload in flight. Await it for the server's response.
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct PendingUpload {
    file_name: String,
    size: u64,
    handle: JoinHandle<Result<UploadResponse>>,
}

impl PendingUpload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for PendingUpload {
    type Output = Result<UploadResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(Err(UploadError::Task(e.to_string()))),
        }
    }
}
