use log::debug;

use super::MarkdownOptions;
use super::placeholder::{PlaceholderMaps, PlaceholderRegistry};
use super::rules::Rule;

/// Result of one tokenization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedDocument {
    /// Lines with protected spans replaced, in document order.
    pub lines: Vec<String>,
    /// Every placeholder that occurs in `lines`, with the text it replaced.
    pub placeholders: PlaceholderMaps,
}

impl TokenizedDocument {
    /// The tokenized lines joined back into one text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Splits on `\n` only, so `\r` and trailing empty lines survive a round trip.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Replaces protected spans of a document with placeholders.
///
/// Numbering starts afresh on every call, so two passes over the same
/// document produce identical output and never share placeholders.
pub fn tokenize<S: AsRef<str>>(lines: &[S], options: &MarkdownOptions) -> TokenizedDocument {
    let mut registry = PlaceholderRegistry::new();

    let joined = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
    let text = Rule::DOCUMENT
        .into_iter()
        .filter(|rule| rule.is_enabled(options))
        .fold(joined, |text, rule| rule.apply(&text, options, &mut registry));

    let line_rules: Vec<Rule> = Rule::LINE
        .into_iter()
        .filter(|rule| rule.is_enabled(options))
        .collect();

    let lines: Vec<String> = split_lines(&text)
        .into_iter()
        .map(|line| {
            line_rules.iter().fold(line.to_string(), |line, rule| {
                rule.apply(&line, options, &mut registry)
            })
        })
        .collect();

    let placeholders = registry.into_maps();
    debug!(
        "Tokenized {} lines, {} protected spans",
        lines.len(),
        placeholders.len()
    );

    TokenizedDocument {
        lines,
        placeholders,
    }
}
