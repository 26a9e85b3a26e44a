//! Placeholder tokens that stand in for protected spans.
//!
//! A placeholder looks like `<<<CATEGORY_n>>>`. Numbering starts at
//! [`FIRST_INDEX`] for every category and every tokenization pass; the
//! counters live in a [`PlaceholderRegistry`] owned by a single pass.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// First number handed out in each category.
pub const FIRST_INDEX: usize = 100;

/// Kind of protected span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Frontmatter,
    MultilineCode,
    LatexBlock,
    Code,
    LatexInline,
    Link,
    Heading,
    List,
    Blockquote,
}

impl Category {
    pub const ALL: [Self; 9] = [
        Self::Frontmatter,
        Self::MultilineCode,
        Self::LatexBlock,
        Self::Code,
        Self::LatexInline,
        Self::Link,
        Self::Heading,
        Self::List,
        Self::Blockquote,
    ];

    /// The upper-case tag used inside the placeholder.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Frontmatter => "FRONTMATTER",
            Self::MultilineCode => "MULTILINE_CODE",
            Self::LatexBlock => "LATEX_BLOCK",
            Self::Code => "CODE",
            Self::LatexInline => "LATEX_INLINE",
            Self::Link => "LINK",
            Self::Heading => "HEADING",
            Self::List => "LIST",
            Self::Blockquote => "BLOCKQUOTE",
        }
    }

    pub const fn is_latex(self) -> bool {
        matches!(self, Self::LatexBlock | Self::LatexInline)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Renders the placeholder token for `category` number `index`.
pub fn render(category: Category, index: usize) -> String {
    format!("<<<{}_{index}>>>", category.tag())
}

fn alternation() -> String {
    Category::ALL
        .iter()
        .map(|c| c.tag())
        .collect::<Vec<_>>()
        .join("|")
}

/// Matches any placeholder token anywhere in a string.
#[allow(clippy::unwrap_used)]
pub static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"<<<(?:{})_\d+>>>", alternation())).unwrap());

#[allow(clippy::unwrap_used)]
static EXACT_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^<<<(?:{})_\d+>>>$", alternation())).unwrap());

/// Returns `true` if the whole of `fragment` is one placeholder token.
pub fn is_placeholder(fragment: &str) -> bool {
    EXACT_PLACEHOLDER_RE.is_match(fragment)
}

/// Placeholder to original text, one map per category.
///
/// Maps are ordered so that iteration (and therefore restoration) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMaps {
    maps: BTreeMap<Category, BTreeMap<String, String>>,
}

impl PlaceholderMaps {
    pub fn insert(&mut self, category: Category, placeholder: String, original: String) {
        self.maps
            .entry(category)
            .or_default()
            .insert(placeholder, original);
    }

    /// Entries of one category.
    pub fn category(&self, category: Category) -> Option<&BTreeMap<String, String>> {
        self.maps.get(&category)
    }

    /// Original text for a placeholder, whatever its category.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.maps
            .values()
            .find_map(|map| map.get(placeholder))
            .map(String::as_str)
    }

    /// All entries as `(category, placeholder, original)`, category order first.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str, &str)> {
        self.maps.iter().flat_map(|(category, map)| {
            map.iter()
                .map(move |(key, value)| (*category, key.as_str(), value.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.maps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hands out placeholders for one tokenization pass and records what they replace.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    next: BTreeMap<Category, usize>,
    maps: PlaceholderMaps,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next placeholder of `category` for `original`.
    pub fn protect(&mut self, category: Category, original: &str) -> String {
        let counter = self.next.entry(category).or_insert(FIRST_INDEX);
        let placeholder = render(category, *counter);
        *counter += 1;
        self.maps
            .insert(category, placeholder.clone(), original.to_string());
        placeholder
    }

    pub fn into_maps(self) -> PlaceholderMaps {
        self.maps
    }
}
