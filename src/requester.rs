//! One prompt in, one preview out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::client::BackendClient;
use crate::error::Result;
use crate::surface::{PreviewSurface, PromptSource};

/// How responses of overlapping invocations are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every response is written; whichever resolves last stays on screen.
    #[default]
    LastResponseWins,
    /// A response is written only if no later-issued request has already
    /// been written.
    LatestRequestWins,
}

/// What happened to the preview at the end of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Applied,
    /// A newer request had already updated the preview.
    Superseded,
}

/// Reads a prompt, asks the backend for HTML and shows it on the preview.
pub struct EmailPreviewRequester<S, P> {
    client: BackendClient,
    prompt: S,
    preview: P,
    policy: OrderingPolicy,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl<S, P> EmailPreviewRequester<S, P>
where
    S: PromptSource,
    P: PreviewSurface,
{
    pub fn new(client: BackendClient, prompt: S, preview: P) -> Self {
        Self {
            client,
            prompt,
            preview,
            policy: OrderingPolicy::default(),
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    pub fn with_ordering(mut self, policy: OrderingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn prompt_source(&self) -> &S {
        &self.prompt
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// Run one request/response cycle.
    ///
    /// The prompt is read when the call starts. On any error the preview
    /// keeps its previous content.
    pub async fn generate_email(&self) -> Result<PreviewOutcome> {
        let prompt = self.prompt.read_prompt()?;
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Request #{} started", seq);

        let html = self.client.generate(prompt).await?;

        self.apply(seq, &html)
    }

    fn apply(&self, seq: u64, html: &str) -> Result<PreviewOutcome> {
        match self.policy {
            OrderingPolicy::LastResponseWins => {
                self.preview.set_srcdoc(html)?;
            }
            OrderingPolicy::LatestRequestWins => {
                let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
                if seq <= *applied {
                    info!(
                        "Discarding response #{}, preview already shows #{}",
                        seq, *applied
                    );
                    return Ok(PreviewOutcome::Superseded);
                }
                self.preview.set_srcdoc(html)?;
                *applied = seq;
            }
        }

        info!("Request #{} applied to preview ({} bytes)", seq, html.len());
        Ok(PreviewOutcome::Applied)
    }
}
