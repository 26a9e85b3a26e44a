use async_trait::async_trait;
use std::sync::Arc;

use crate::error::BackendError;

/// Tells the backend what kind of document a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentHint {
    /// The batch is every line of one Markdown document, in order.
    Markdown,
}

impl ContentHint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
        }
    }
}

/// Position of the current file in a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    /// Zero-based index of the file.
    pub index: usize,
    /// Number of files in the run.
    pub total: usize,
}

/// One call to the translation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    pub source_language: String,
    pub target_language: String,
    pub position: Option<FilePosition>,
    pub content_hint: Option<ContentHint>,
}

impl BatchRequest {
    pub fn new(texts: Vec<String>, source_language: &str, target_language: &str) -> Self {
        Self {
            texts,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            position: None,
            content_hint: None,
        }
    }

    #[must_use]
    pub const fn with_position(mut self, position: Option<FilePosition>) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub const fn with_hint(mut self, hint: Option<ContentHint>) -> Self {
        self.content_hint = hint;
        self
    }
}

/// A translation service.
///
/// Implementations return one translation per input text, in input order.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        (**self).translate_batch(request).await
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Box<B> {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        (**self).translate_batch(request).await
    }
}
