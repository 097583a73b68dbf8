//! Where prompts come from and where generated HTML goes.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Provides the current prompt text each time a request starts.
pub trait PromptSource: Send + Sync {
    fn read_prompt(&self) -> Result<String>;
}

/// Receives generated HTML as its complete new document.
pub trait PreviewSurface: Send + Sync {
    fn set_srcdoc(&self, html: &str) -> Result<()>;
}

impl PromptSource for String {
    fn read_prompt(&self) -> Result<String> {
        Ok(self.clone())
    }
}

/// An editable prompt shared between clones, like a text field.
#[derive(Debug, Clone, Default)]
pub struct SharedPrompt {
    value: Arc<Mutex<String>>,
}

impl SharedPrompt {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(value.into())),
        }
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

impl PromptSource for SharedPrompt {
    fn read_prompt(&self) -> Result<String> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Reads the prompt from a file, fresh on every request.
#[derive(Debug, Clone)]
pub struct FilePrompt {
    path: PathBuf,
}

impl FilePrompt {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PromptSource for FilePrompt {
    fn read_prompt(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// In-memory preview document. Clones observe the same document.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreview {
    doc: Arc<Mutex<Option<String>>>,
}

impl MemoryPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview holding `html` before any request has been made.
    pub fn with_content(html: impl Into<String>) -> Self {
        Self {
            doc: Arc::new(Mutex::new(Some(html.into()))),
        }
    }

    /// Current document, `None` until the first write.
    pub fn content(&self) -> Option<String> {
        self.doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PreviewSurface for MemoryPreview {
    fn set_srcdoc(&self, html: &str) -> Result<()> {
        *self.doc.lock().unwrap_or_else(PoisonError::into_inner) = Some(html.to_string());
        Ok(())
    }
}

/// Replaces the content of a file with each preview.
///
/// The document is written to a temporary file next to the target and then
/// renamed over it, so a failed write keeps the previous preview.
#[derive(Debug, Clone)]
pub struct FilePreview {
    path: PathBuf,
}

impl FilePreview {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreviewSurface for FilePreview {
    fn set_srcdoc(&self, html: &str) -> Result<()> {
        replace_file(&self.path, |file| file.write_all(html.as_bytes()))?;
        debug!("Wrote preview to {}", self.path.display());
        Ok(())
    }
}

/// Write a sibling temp file with `write`, then move it over `path`.
fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(&mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Prints each preview to stdout, byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPreview;

impl PreviewSurface for StdoutPreview {
    fn set_srcdoc(&self, html: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(html.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
