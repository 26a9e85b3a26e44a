use regex::Regex;
use std::sync::LazyLock;

use super::placeholder::PLACEHOLDER_RE;
use super::tokenizer::TokenizedDocument;

#[allow(clippy::unwrap_used)]
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// The tokenized document with its placeholders visible.
pub fn tagged_text(document: &TokenizedDocument) -> String {
    document.text()
}

/// The prose that would be sent for translation.
///
/// Placeholders are dropped and `**bold**` markers are unwrapped.
pub fn extract_text(document: &TokenizedDocument) -> String {
    let text = document.text();
    let without_placeholders = PLACEHOLDER_RE.replace_all(&text, "");
    BOLD_RE
        .replace_all(&without_placeholders, "$1")
        .into_owned()
}
