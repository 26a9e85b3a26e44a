use sha2::{Digest, Sha256};

use super::backend::ContentHint;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator. Translate the following text{source} to {target_language}. \
     Output only the translated text without any explanations. \
     Preserve leading and trailing punctuation, inline formatting such as **bold**, and line breaks.";

pub const MARKDOWN_CONTEXT_PROMPT: &str = "The input is a complete Markdown document, one line per input line. \
     Translate only the prose. Keep frontmatter, code, math, URLs and Markdown syntax unchanged, \
     and keep the same number of lines.";

/// Builds the system prompt for one request.
///
/// `source_language` of `None` lets the model detect the language.
#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(
    target_language: &str,
    source_language: Option<&str>,
    hint: Option<ContentHint>,
) -> String {
    // {source} and {target_language} are placeholders for string replacement, not format arguments
    let source = source_language.map_or_else(String::new, |lang| format!(" from {lang}"));
    let prompt = SYSTEM_PROMPT_TEMPLATE
        .replace("{source}", &source)
        .replace("{target_language}", target_language);

    match hint {
        Some(ContentHint::Markdown) => format!("{prompt} {MARKDOWN_CONTEXT_PROMPT}"),
        None => prompt,
    }
}

/// Hash of the prompt templates; a changed prompt invalidates cached translations.
pub fn prompt_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(SYSTEM_PROMPT_TEMPLATE.as_bytes());
    hasher.update(MARKDOWN_CONTEXT_PROMPT.as_bytes());
    hex::encode(hasher.finalize())
}
