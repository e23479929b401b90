use config::{Config, Environment};
use reqwest::Url;
use serde::Deserialize;

use crate::error::{Result, UploadError};

/// Prefix of the environment variables the uploader reads.
pub const ENV_PREFIX: &str = "PI_PHOTOS";

/// Full name of the variable holding the upload endpoint.
pub const ENDPOINT_VAR: &str = "PI_PHOTOS_UPLOAD_ENDPOINT";

#[derive(Debug, Deserialize)]
struct RawConfig {
    upload_endpoint: Option<String>,
}

/// Settings the HTTP client is built from.
///
/// Construct it with [`ClientConfig::new`] to point at a known endpoint, or
/// with [`ClientConfig::from_env`] at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub upload_endpoint: Url,
}

impl ClientConfig {
    pub fn new(upload_endpoint: &str) -> Result<Self> {
        let url = Url::parse(upload_endpoint).map_err(|e| UploadError::InvalidEndpoint {
            url: upload_endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UploadError::InvalidEndpoint {
                url: upload_endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(Self {
            upload_endpoint: url,
        })
    }

    /// Reads `PI_PHOTOS_UPLOAD_ENDPOINT` from the process environment.
    ///
    /// A missing or malformed value is an error; there is no relative-path
    /// fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_source(Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn from_source(source: Environment) -> Result<Self> {
        let raw: RawConfig = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        let endpoint = raw
            .upload_endpoint
            .ok_or_else(|| UploadError::InvalidEndpoint {
                url: String::new(),
                reason: format!("{} is not set", ENDPOINT_VAR),
            })?;

        tracing::debug!("Upload endpoint from environment: {}", endpoint);
        Self::new(endpoint.trim())
    }
}
