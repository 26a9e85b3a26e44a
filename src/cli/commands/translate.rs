use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::CacheManager;
use crate::cli::MarkdownArgs;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::error::ConfigurationError;
use crate::fs::atomic_write;
use crate::input::InputReader;
use crate::pipeline::{
    ArtifactSink, BatchReport, Document, Orchestrator, RunStatus, TranslationOptions,
};
use crate::translation::{Backend, CachedBackend, TranslationClient};
use crate::ui::{BatchProgress, Style};

pub struct TranslateOptions {
    pub files: Vec<PathBuf>,
    pub resolve: ResolveOptions,
    pub no_cache: bool,
    pub write: bool,
    pub output_dir: Option<PathBuf>,
    pub overrides: OptionOverrides,
}

/// CLI flags layered over the `[options]` table.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub raw: bool,
    pub context: bool,
    pub markdown: MarkdownArgs,
    pub remove_chars: Option<String>,
    pub retry_count: Option<usize>,
    pub retry_timeout: Option<u64>,
    pub concurrency: Option<usize>,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: TranslationOptions) -> TranslationOptions {
        options.raw_mode |= self.raw;
        options.context_mode |= self.context;
        options.markdown = self.markdown.apply(options.markdown);
        if let Some(remove_chars) = &self.remove_chars {
            options.remove_chars.clone_from(remove_chars);
        }
        if let Some(retry_count) = self.retry_count {
            options.retry_count = retry_count;
        }
        if let Some(retry_timeout) = self.retry_timeout {
            options.retry_timeout_secs = retry_timeout;
        }
        if let Some(concurrency) = self.concurrency {
            options.max_concurrency = concurrency;
        }
        options
    }
}

/// Writes artifacts to disk: into `output_dir`, or next to their input.
struct FileSink {
    output_dir: Option<PathBuf>,
    written: Vec<PathBuf>,
}

impl FileSink {
    const fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            written: Vec::new(),
        }
    }

    fn target(&self, source: Option<&Path>, name: &str) -> PathBuf {
        let dir = self
            .output_dir
            .as_deref()
            .or_else(|| source.and_then(Path::parent))
            .unwrap_or_else(|| Path::new(""));
        dir.join(name)
    }
}

impl ArtifactSink for FileSink {
    fn emit(&mut self, source: Option<&Path>, name: &str, content: &str) -> Result<()> {
        let path = self.target(source, name);
        atomic_write(&path, content)?;
        self.written.push(path);
        Ok(())
    }
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let config_file = ConfigManager::new()?.load_or_default()?;
    let config = resolve_config(&options.resolve, &config_file)?;
    let translation_options = options.overrides.apply(config_file.options.clone());

    let documents = read_documents(&options.files)?;

    let backend = build_backend(&config, &translation_options, options.no_cache)?;
    let orchestrator = Orchestrator::new(
        backend,
        translation_options,
        &config.source_language,
        &config.languages,
    )?
    .force_artifacts(options.write);

    let mut sink = FileSink::new(options.output_dir);
    let progress = BatchProgress::new(documents.len());
    let report = orchestrator
        .translate_files(&documents, &mut sink, &progress)
        .await?;
    progress.finish();

    print_report(&report, &sink.written);

    if report.all_failed() {
        bail!("Translation failed for every target language");
    }
    Ok(())
}

fn read_documents(files: &[PathBuf]) -> Result<Vec<Document>> {
    if files.is_empty() {
        let document = InputReader::read_document(None)?;
        if document.text.trim().is_empty() {
            return Err(ConfigurationError::NoInput.into());
        }
        return Ok(vec![document]);
    }

    files
        .iter()
        .map(|file| InputReader::read_document(Some(file.as_path())))
        .collect()
}

fn build_backend(
    config: &ResolvedConfig,
    options: &TranslationOptions,
    no_cache: bool,
) -> Result<Arc<dyn Backend>> {
    let client = TranslationClient::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        config.model.clone(),
    )
    .with_concurrency(options.max_concurrency);

    if no_cache || !config.use_cache {
        return Ok(Arc::new(client));
    }

    let cache = CacheManager::new()?;
    log::debug!("Using translation cache for provider '{}'", config.provider_name);
    Ok(Arc::new(CachedBackend::new(
        client,
        cache,
        &config.model,
        &config.endpoint,
    )))
}

fn print_report(report: &BatchReport, written: &[PathBuf]) {
    if let [document] = report.documents.as_slice()
        && let Some(preview) = &document.preview
    {
        println!("{preview}");
    }

    for path in written {
        crate::status!("{} {}", Style::success("Wrote"), Style::value(path.display()));
    }

    if report.status() == RunStatus::PartialFailure {
        crate::status!(
            "{} {} translation(s) failed",
            Style::warning("Warning:"),
            report.failure_count()
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_layer_on_config() {
        let base = TranslationOptions {
            remove_chars: "♪".to_string(),
            ..TranslationOptions::default()
        };
        let overrides = OptionOverrides {
            context: true,
            retry_count: Some(1),
            concurrency: Some(0),
            ..OptionOverrides::default()
        };

        let options = overrides.apply(base);
        assert!(options.effective_raw_mode());
        assert_eq!(options.retry_count, 1);
        assert_eq!(options.max_concurrency, 0);
        assert_eq!(options.remove_chars, "♪");
    }

    #[test]
    fn test_file_sink_targets() {
        let sink = FileSink::new(None);
        assert_eq!(
            sink.target(Some(Path::new("docs/guide.md")), "guide_ja.md"),
            PathBuf::from("docs/guide_ja.md")
        );
        assert_eq!(sink.target(None, "markdown_ja.md"), PathBuf::from("markdown_ja.md"));

        let sink = FileSink::new(Some(PathBuf::from("out")));
        assert_eq!(
            sink.target(Some(Path::new("docs/guide.md")), "guide_ja.md"),
            PathBuf::from("out/guide_ja.md")
        );
    }

    #[test]
    fn test_file_sink_writes_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(Some(temp_dir.path().join("out")));

        sink.emit(None, "markdown_fr.md", "Bonjour").unwrap();

        let path = temp_dir.path().join("out").join("markdown_fr.md");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Bonjour");
        assert_eq!(sink.written, vec![path]);
    }

    #[test]
    fn test_read_documents_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.md");
        let b = temp_dir.path().join("b.md");
        std::fs::write(&a, "A").unwrap();
        std::fs::write(&b, "B").unwrap();

        let documents = read_documents(&[b.clone(), a]).unwrap();
        assert_eq!(documents[0].path, Some(b));
        assert_eq!(documents[1].text, "A");
    }
}
