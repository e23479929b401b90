use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};

use crate::config::ClientConfig;
use crate::error::{Result, UploadError};

/// HTTP client bound to the upload endpoint.
///
/// Every request carries `Content-Type: application/json` unless the request
/// sets its own. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: Url,
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        tracing::info!("HTTP client bound to {}", config.upload_endpoint);
        Ok(Self {
            base_url: config.upload_endpoint.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base URL, keeping any path the base already has.
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| UploadError::InvalidEndpoint {
            url: joined,
            reason: e.to_string(),
        })
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.post(self.url(path)?))
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.get(self.url(path)?))
    }
}
