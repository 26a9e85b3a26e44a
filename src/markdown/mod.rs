//! Markdown protection engine.
//!
//! Protected spans (frontmatter, code, LaTeX, links and block prefixes) are
//! swapped for placeholders before translation and put back afterwards, so
//! only prose ever reaches the backend.

mod extract;
mod placeholder;
mod restorer;
mod rules;
mod segmenter;
mod tokenizer;

use serde::{Deserialize, Serialize};

pub use extract::{extract_text, tagged_text};
pub use placeholder::{
    Category, FIRST_INDEX, PLACEHOLDER_RE, PlaceholderMaps, PlaceholderRegistry, is_placeholder,
    render,
};
pub use restorer::{by_descending_length, remove_chars, restore, substitute};
pub use rules::{Rule, is_currency};
pub use segmenter::{Segment, split_edges, split_segments};
pub use tokenizer::{TokenizedDocument, split_lines, tokenize};

/// Which span kinds are sent to the backend instead of being protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Translate the leading `---` frontmatter block.
    pub translate_frontmatter: bool,
    /// Translate fenced code blocks.
    pub translate_multiline_code: bool,
    /// Translate `$$...$$` blocks and inline `$...$` math.
    pub translate_latex: bool,
    /// Translate the bracket text of links and images; only the
    /// opening bracket and the `](target)` part stay protected.
    pub translate_link_text: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            translate_frontmatter: false,
            translate_multiline_code: false,
            translate_latex: false,
            translate_link_text: true,
        }
    }
}
