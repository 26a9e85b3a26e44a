use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::markdown::MarkdownOptions;
use crate::translation::RetryPolicy;

/// The `[options]` table: everything that shapes one translation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    #[serde(flatten)]
    pub markdown: MarkdownOptions,
    /// Skip tokenization and send whole lines.
    pub raw_mode: bool,
    /// Send the whole document in one call with a content hint. Implies `raw_mode`.
    pub context_mode: bool,
    /// Space-separated substrings removed from the final text.
    pub remove_chars: String,
    pub retry_count: usize,
    pub retry_timeout_secs: u64,
    /// Cap on in-flight backend calls per language pass; `0` means no cap.
    pub max_concurrency: usize,
    pub language_delay_ms: u64,
    pub file_delay_ms: u64,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            markdown: MarkdownOptions::default(),
            raw_mode: false,
            context_mode: false,
            remove_chars: String::new(),
            retry_count: 3,
            retry_timeout_secs: 30,
            max_concurrency: 8,
            language_delay_ms: 500,
            file_delay_ms: 1500,
        }
    }
}

impl TranslationOptions {
    pub const fn effective_raw_mode(&self) -> bool {
        self.raw_mode || self.context_mode
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_count,
            Duration::from_secs(self.retry_timeout_secs),
        )
    }

    pub const fn throttle(&self) -> Throttle {
        Throttle {
            language_delay: Duration::from_millis(self.language_delay_ms),
            file_delay: Duration::from_millis(self.file_delay_ms),
        }
    }
}

/// Fixed pauses that keep the request rate down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    /// Between two languages of one document.
    pub language_delay: Duration,
    /// Between two files of a batch.
    pub file_delay: Duration,
}

impl Throttle {
    pub const NONE: Self = Self {
        language_delay: Duration::ZERO,
        file_delay: Duration::ZERO,
    };
}

/// Target languages of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
    Single(String),
    /// Ordered list; artifacts are always written in this mode.
    Multi(Vec<String>),
}

impl LanguageSelection {
    pub fn languages(&self) -> Result<Vec<String>, ConfigurationError> {
        match self {
            Self::Single(language) => Ok(vec![language.clone()]),
            Self::Multi(languages) if languages.is_empty() => {
                Err(ConfigurationError::NoTargetLanguage)
            }
            Self::Multi(languages) => Ok(languages.clone()),
        }
    }

    pub const fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}
