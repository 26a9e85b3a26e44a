//! Translates tokenized lines fragment by fragment.
//!
//! Every line and every fragment of a line is dispatched at once on the
//! current task; results are collected by position, so completion order does
//! not matter. A semaphore caps how many backend calls are in flight.

use futures_util::future::try_join_all;
use log::debug;
use tokio::sync::Semaphore;

use super::backend::{Backend, BatchRequest, FilePosition};
use crate::error::BackendError;
use crate::markdown::{Segment, split_edges, split_segments};

pub struct SegmentTranslator<'a> {
    backend: &'a dyn Backend,
    source_language: &'a str,
    target_language: &'a str,
    position: Option<FilePosition>,
    limiter: Option<Semaphore>,
}

impl<'a> SegmentTranslator<'a> {
    /// `max_concurrency` of `0` means no cap on in-flight calls.
    pub fn new(
        backend: &'a dyn Backend,
        source_language: &'a str,
        target_language: &'a str,
        max_concurrency: usize,
    ) -> Self {
        Self {
            backend,
            source_language,
            target_language,
            position: None,
            limiter: (max_concurrency > 0).then(|| Semaphore::new(max_concurrency)),
        }
    }

    #[must_use]
    pub const fn with_position(mut self, position: Option<FilePosition>) -> Self {
        self.position = position;
        self
    }

    /// Translates all lines; the output has one entry per input line.
    pub async fn translate_lines(&self, lines: &[String]) -> Result<Vec<String>, BackendError> {
        debug!(
            "Translating {} lines into {}",
            lines.len(),
            self.target_language
        );
        try_join_all(lines.iter().map(|line| self.translate_line(line))).await
    }

    /// Translates the text fragments of one line, leaving placeholders in place.
    pub async fn translate_line(&self, line: &str) -> Result<String, BackendError> {
        let parts = try_join_all(
            split_segments(line)
                .into_iter()
                .map(|segment| self.translate_segment(segment)),
        )
        .await?;
        Ok(parts.concat())
    }

    async fn translate_segment(&self, segment: Segment<'_>) -> Result<String, BackendError> {
        match segment {
            Segment::Placeholder(token) => Ok(token.to_string()),
            Segment::Text(text) => {
                let (leading, content, trailing) = split_edges(text);
                if content.is_empty() {
                    return Ok(text.to_string());
                }
                let translated = self.call(content).await?;
                Ok(format!("{leading}{translated}{trailing}"))
            }
        }
    }

    async fn call(&self, text: &str) -> Result<String, BackendError> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter.acquire().await.map_err(|e| {
                    BackendError::Request(format!("Concurrency limiter closed: {e}"))
                })?,
            ),
            None => None,
        };

        let request = BatchRequest::new(
            vec![text.to_string()],
            self.source_language,
            self.target_language,
        )
        .with_position(self.position);

        let mut translations = self.backend.translate_batch(&request).await?;
        if translations.len() != 1 {
            return Err(BackendError::CountMismatch {
                expected: 1,
                received: translations.len(),
            });
        }
        Ok(translations.swap_remove(0))
    }
}
