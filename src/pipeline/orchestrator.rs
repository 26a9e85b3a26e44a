//! Drives the Markdown pipeline over target languages and input files.
//!
//! Languages of one document run one after another with a fixed pause in
//! between, and so do the files of a batch. A failing language is recorded
//! and the loop moves on; it never touches the other languages' results.

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::sleep;

use super::naming::output_name;
use super::options::{LanguageSelection, Throttle, TranslationOptions};
use crate::error::{BackendError, ConfigurationError};
use crate::markdown::{remove_chars, restore, split_lines, tokenize};
use crate::translation::{
    Backend, BatchRequest, ContentHint, FilePosition, RetryingBackend, SegmentTranslator,
    display_name,
};

/// One input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// `None` for stdin.
    pub path: Option<PathBuf>,
    pub text: String,
}

impl Document {
    pub fn new(path: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path,
            text: text.into(),
        }
    }
}

/// Receives finished translations as named files.
pub trait ArtifactSink {
    /// `source` is the input file the artifact was translated from.
    fn emit(&mut self, source: Option<&Path>, name: &str, content: &str) -> Result<()>;
}

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, String)>,
}

impl ArtifactSink for MemorySink {
    fn emit(&mut self, _source: Option<&Path>, name: &str, content: &str) -> Result<()> {
        self.artifacts.push((name.to_string(), content.to_string()));
        Ok(())
    }
}

/// Completed files out of the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }
}

/// Observer for run progress. All methods default to doing nothing.
pub trait ProgressSink {
    fn language_started(&self, _language: &str) {}
    /// `error` is set when the language failed.
    fn language_finished(&self, _language: &str, _error: Option<&anyhow::Error>) {}
    fn file_finished(&self, _progress: Progress) {}
}

/// A `ProgressSink` that ignores everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Result of one target language.
#[derive(Debug)]
pub enum LanguageOutcome {
    Translated {
        language: String,
        text: String,
        /// Name of the emitted artifact, if one was written.
        artifact: Option<String>,
    },
    Failed {
        language: String,
        display_name: String,
        error: anyhow::Error,
    },
}

impl LanguageOutcome {
    pub fn language(&self) -> &str {
        match self {
            Self::Translated { language, .. } | Self::Failed { language, .. } => language,
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub const fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Translated { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Done,
    PartialFailure,
}

/// Everything one document produced.
#[derive(Debug)]
pub struct DocumentReport {
    pub path: Option<PathBuf>,
    pub outcomes: Vec<LanguageOutcome>,
    /// Text of the first requested language, when it succeeded.
    pub preview: Option<String>,
}

impl DocumentReport {
    pub fn status(&self) -> RunStatus {
        if self.outcomes.iter().any(LanguageOutcome::is_failed) {
            RunStatus::PartialFailure
        } else {
            RunStatus::Done
        }
    }

    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(LanguageOutcome::is_failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &LanguageOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

/// Reports of a whole batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn status(&self) -> RunStatus {
        if self
            .documents
            .iter()
            .any(|doc| doc.status() == RunStatus::PartialFailure)
        {
            RunStatus::PartialFailure
        } else {
            RunStatus::Done
        }
    }

    pub fn all_failed(&self) -> bool {
        !self.documents.is_empty() && self.documents.iter().all(DocumentReport::all_failed)
    }

    pub fn failure_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.failures().count()).sum()
    }
}

pub struct Orchestrator {
    backend: RetryingBackend<Arc<dyn Backend>>,
    options: TranslationOptions,
    source_language: String,
    languages: Vec<String>,
    multi: bool,
    force_artifacts: bool,
    throttle: Throttle,
}

impl Orchestrator {
    /// Fails with [`ConfigurationError::NoTargetLanguage`] before anything is sent.
    pub fn new(
        backend: Arc<dyn Backend>,
        options: TranslationOptions,
        source_language: &str,
        selection: &LanguageSelection,
    ) -> Result<Self, ConfigurationError> {
        let languages = selection.languages()?;
        Ok(Self {
            backend: RetryingBackend::new(backend, options.retry_policy()),
            throttle: options.throttle(),
            options,
            source_language: source_language.to_string(),
            languages,
            multi: selection.is_multi(),
            force_artifacts: false,
        })
    }

    /// Emit artifacts even for a single language and a single file.
    #[must_use]
    pub const fn force_artifacts(mut self, force: bool) -> Self {
        self.force_artifacts = force;
        self
    }

    #[must_use]
    pub const fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Translates one document into every target language.
    pub async fn translate_document(
        &self,
        document: &Document,
        position: Option<FilePosition>,
        artifacts: &mut dyn ArtifactSink,
        progress: &dyn ProgressSink,
    ) -> DocumentReport {
        let emit = self.multi
            || self.force_artifacts
            || position.is_some_and(|position| position.total > 1);
        let mut outcomes = Vec::with_capacity(self.languages.len());
        let mut preview = None;

        for (index, language) in self.languages.iter().enumerate() {
            progress.language_started(language);

            let result = match self.translate_language(&document.text, language, position).await {
                Ok(text) if emit => {
                    let name = output_name(document.path.as_deref(), language);
                    artifacts
                        .emit(document.path.as_deref(), &name, &text)
                        .with_context(|| format!("Failed to write {name}"))
                        .map(|()| (text, Some(name)))
                }
                Ok(text) => Ok((text, None)),
                Err(e) => Err(anyhow::Error::new(e)),
            };

            let outcome = match result {
                Ok((text, artifact)) => {
                    if index == 0 {
                        preview = Some(text.clone());
                    }
                    LanguageOutcome::Translated {
                        language: language.clone(),
                        text,
                        artifact,
                    }
                }
                Err(error) => {
                    let name = display_name(language);
                    error!("{name} translation failed: {error:#}");
                    LanguageOutcome::Failed {
                        language: language.clone(),
                        display_name: name.to_string(),
                        error,
                    }
                }
            };
            progress.language_finished(language, outcome.error());
            outcomes.push(outcome);

            if index + 1 < self.languages.len() && !self.throttle.language_delay.is_zero() {
                sleep(self.throttle.language_delay).await;
            }
        }

        DocumentReport {
            path: document.path.clone(),
            outcomes,
            preview,
        }
    }

    /// Translates a batch of documents one after another.
    pub async fn translate_files(
        &self,
        documents: &[Document],
        artifacts: &mut dyn ArtifactSink,
        progress: &dyn ProgressSink,
    ) -> Result<BatchReport, ConfigurationError> {
        if documents.is_empty() {
            return Err(ConfigurationError::NoInput);
        }

        let total = documents.len();
        let mut report = BatchReport::default();

        for (index, document) in documents.iter().enumerate() {
            if let Some(path) = &document.path {
                info!("Translating {} ({}/{total})", path.display(), index + 1);
            }
            let position = FilePosition { index, total };
            let doc_report = self
                .translate_document(document, Some(position), artifacts, progress)
                .await;
            report.documents.push(doc_report);

            progress.file_finished(Progress {
                completed: index + 1,
                total,
            });

            if index + 1 < total && !self.throttle.file_delay.is_zero() {
                sleep(self.throttle.file_delay).await;
            }
        }

        Ok(report)
    }

    /// One full pass for one language: fresh tokenization, translation, restoration.
    async fn translate_language(
        &self,
        text: &str,
        language: &str,
        position: Option<FilePosition>,
    ) -> Result<String, BackendError> {
        let lines = split_lines(text);

        let translated = if self.options.effective_raw_mode() {
            self.translate_raw(&lines, language, position).await?
        } else {
            let document = tokenize(&lines, &self.options.markdown);
            let translator = SegmentTranslator::new(
                &self.backend,
                &self.source_language,
                language,
                self.options.max_concurrency,
            )
            .with_position(position);
            let translated = translator.translate_lines(&document.lines).await?;
            restore(&translated.join("\n"), &document.placeholders)
        };

        Ok(remove_chars(&translated, &self.options.remove_chars))
    }

    async fn translate_raw(
        &self,
        lines: &[&str],
        language: &str,
        position: Option<FilePosition>,
    ) -> Result<String, BackendError> {
        let hint = self.options.context_mode.then_some(ContentHint::Markdown);
        let expected = lines.len();
        debug!("Sending {expected} raw lines into {language} (hint: {hint:?})");

        let texts = lines.iter().map(|line| (*line).to_string()).collect();
        let request = BatchRequest::new(texts, &self.source_language, language)
            .with_position(position)
            .with_hint(hint);
        let translated = self.backend.translate_batch(&request).await?;

        // With a hint the reply is one document; its line count may differ.
        if hint.is_none() && translated.len() != expected {
            return Err(BackendError::CountMismatch {
                expected,
                received: translated.len(),
            });
        }
        Ok(translated.join("\n"))
    }
}
