mod backend;
mod cached;
mod client;
mod language;
mod mock;
mod prompt;
mod retry;
mod segment;

pub use backend::{Backend, BatchRequest, ContentHint, FilePosition};
pub use cached::CachedBackend;
pub use client::TranslationClient;
pub use language::{
    AUTO_DETECT, SUPPORTED_LANGUAGES, display_name, print_languages, validate_language,
    validate_source_language,
};
pub use mock::{MockBackend, MockBehavior};
pub use prompt::{build_system_prompt, prompt_hash};
pub use retry::{RetryPolicy, RetryingBackend, retry};
pub use segment::SegmentTranslator;
