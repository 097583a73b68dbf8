//! HTTP client for the generation backend.

use reqwest::Url;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PreviewError, Result};
use crate::{BackendStatus, GeneratedEmail, PromptRequest};

/// Talks to the backend collaborator that turns prompts into HTML.
#[derive(Debug, Clone)]
pub struct BackendClient {
    endpoint: Url,
    status_url: Url,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            status_url: config.status_url(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post `prompt` and return the `html` field of the answer.
    pub async fn generate(&self, prompt: String) -> Result<String> {
        debug!(
            "Posting prompt ({} chars) to {}",
            prompt.chars().count(),
            self.endpoint
        );

        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&PromptRequest { prompt })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = error_message(res).await;
            warn!("Backend returned error {}: {}", status, message);
            return Err(PreviewError::ServerError { status, message });
        }

        let body = res.bytes().await?;
        let email: GeneratedEmail = serde_json::from_slice(&body)?;
        debug!("Received {} bytes of html", email.html.len());
        Ok(email.html)
    }

    /// Probe the root route of the backend.
    pub async fn status(&self) -> Result<BackendStatus> {
        debug!("Probing backend at {}", self.status_url);

        let res = self.client.get(self.status_url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(PreviewError::ServerError {
                status,
                message: error_message(res).await,
            });
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Message of an error response. A body that cannot be read yields the
/// status reason instead.
async fn error_message(res: reqwest::Response) -> String {
    let reason = res.status().canonical_reason().unwrap_or_default();
    match res.bytes().await {
        Ok(body) => server_message(&body),
        Err(e) => {
            debug!("Could not read error body: {}", e);
            reason.to_string()
        }
    }
}

/// Pull a readable message out of an error body.
///
/// The backend answers failures with `{"error": "..."}`; anything else is
/// passed through as text.
fn server_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return error.to_string();
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}
