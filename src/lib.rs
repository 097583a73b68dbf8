//! Turns a prompt into previewed HTML by way of a remote generation backend.
//!
//! The [`EmailPreviewRequester`] reads a prompt from a [`PromptSource`], posts
//! it to the configured endpoint and writes the returned `html` into a
//! [`PreviewSurface`].

use serde::{Deserialize, Serialize};

pub mod client;
pub mod config;
pub mod error;
pub mod requester;
pub mod surface;

pub use client::BackendClient;
pub use config::Config;
pub use error::{PreviewError, Result};
pub use requester::{EmailPreviewRequester, OrderingPolicy, PreviewOutcome};
pub use surface::{
    FilePreview, FilePrompt, MemoryPreview, PreviewSurface, PromptSource, SharedPrompt,
    StdoutPreview,
};

/// Body of the outbound generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Body of a successful generation response. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub html: String,
}

/// Answer of the backend's root route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl BackendStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
