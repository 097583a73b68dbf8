//! Configuration for email-preview

use reqwest::Url;

use crate::error::{PreviewError, Result};

/// Environment variable consulted for the generation endpoint.
pub const ENDPOINT_ENV: &str = "EMAIL_PREVIEW_ENDPOINT";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute URL the prompt is posted to
    pub endpoint: Url,
}

impl Config {
    /// Build a configuration from an endpoint string.
    ///
    /// Only absolute `http` and `https` URLs are accepted.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| PreviewError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        match endpoint.scheme() {
            "http" | "https" => Ok(Self { endpoint }),
            other => Err(PreviewError::Config(format!(
                "Unsupported endpoint scheme '{}', expected http or https",
                other
            ))),
        }
    }

    /// Root of the endpoint's origin, where the backend answers health probes.
    pub fn status_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}
