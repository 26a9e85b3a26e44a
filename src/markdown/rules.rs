//! Ordered recognition rules.
//!
//! Document rules run over the whole joined text, then line rules run on
//! every line. Each rule sees the output of the rules before it, so the
//! order of [`Rule::DOCUMENT`] and [`Rule::LINE`] is part of the contract.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::MarkdownOptions;
use super::placeholder::{Category, PlaceholderRegistry};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        #[allow(clippy::unwrap_used)]
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(FRONTMATTER_RE, r"^---\n(?s:.*?)\n---");
pattern!(FENCED_CODE_RE, r"(?s)```.*?```");
pattern!(LATEX_BLOCK_RE, r"(?s)\$\$.*?\$\$");
pattern!(INLINE_CODE_RE, r"`[^`]+?`");
pattern!(INLINE_LATEX_RE, r"\$([^$]+?)\$");
pattern!(LINK_RE, r"(!?\[)(.*?)(\]\(.*?\))");
pattern!(HEADING_RE, r"^#{1,6}\s");
pattern!(LIST_ITEM_RE, r"^\s*(?:[-*]|\d+\.)\s+");
pattern!(BLOCKQUOTE_RE, r"^>\s");

/// One recognition step of the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Leading `---` block, first match only.
    Frontmatter,
    /// Triple-backtick fences.
    FencedCode,
    /// `$$...$$` blocks.
    LatexBlock,
    /// Single-backtick code spans.
    InlineCode,
    /// `$...$` math, skipping amounts such as `$1,000 $`.
    InlineLatex,
    /// Links and images.
    Link,
    /// `#` to `######` prefix.
    Heading,
    /// `-`, `*` or `1.` prefix.
    ListItem,
    /// `>` prefix.
    Blockquote,
}

impl Rule {
    /// Rules applied to the whole document, in order.
    pub const DOCUMENT: [Self; 3] = [Self::Frontmatter, Self::FencedCode, Self::LatexBlock];

    /// Rules applied to each line, in order.
    pub const LINE: [Self; 6] = [
        Self::InlineCode,
        Self::InlineLatex,
        Self::Link,
        Self::Heading,
        Self::ListItem,
        Self::Blockquote,
    ];

    pub const fn category(self) -> Category {
        match self {
            Self::Frontmatter => Category::Frontmatter,
            Self::FencedCode => Category::MultilineCode,
            Self::LatexBlock => Category::LatexBlock,
            Self::InlineCode => Category::Code,
            Self::InlineLatex => Category::LatexInline,
            Self::Link => Category::Link,
            Self::Heading => Category::Heading,
            Self::ListItem => Category::List,
            Self::Blockquote => Category::Blockquote,
        }
    }

    /// Whether the rule protects anything under `options`.
    pub const fn is_enabled(self, options: &MarkdownOptions) -> bool {
        match self {
            Self::Frontmatter => !options.translate_frontmatter,
            Self::FencedCode => !options.translate_multiline_code,
            Self::LatexBlock | Self::InlineLatex => !options.translate_latex,
            Self::InlineCode | Self::Link | Self::Heading | Self::ListItem | Self::Blockquote => {
                true
            }
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Frontmatter => &FRONTMATTER_RE,
            Self::FencedCode => &FENCED_CODE_RE,
            Self::LatexBlock => &LATEX_BLOCK_RE,
            Self::InlineCode => &INLINE_CODE_RE,
            Self::InlineLatex => &INLINE_LATEX_RE,
            Self::Link => &LINK_RE,
            Self::Heading => &HEADING_RE,
            Self::ListItem => &LIST_ITEM_RE,
            Self::Blockquote => &BLOCKQUOTE_RE,
        }
    }

    /// Replaces every span this rule recognizes in `text` with a placeholder.
    ///
    /// Does not check [`Rule::is_enabled`]; the tokenizer does.
    pub fn apply(
        self,
        text: &str,
        options: &MarkdownOptions,
        registry: &mut PlaceholderRegistry,
    ) -> String {
        let category = self.category();
        let re = self.pattern();

        match self {
            // Anchored to the start of the text: only the first match counts.
            Self::Frontmatter | Self::Heading | Self::ListItem | Self::Blockquote => re
                .replace(text, |caps: &Captures| registry.protect(category, &caps[0]))
                .into_owned(),
            Self::InlineLatex => re
                .replace_all(text, |caps: &Captures| {
                    if is_currency(&caps[1]) {
                        caps[0].to_string()
                    } else {
                        registry.protect(category, &caps[0])
                    }
                })
                .into_owned(),
            Self::Link if options.translate_link_text => re
                .replace_all(text, |caps: &Captures| {
                    let open = registry.protect(category, &caps[1]);
                    let close = registry.protect(category, &caps[3]);
                    format!("{open}{}{close}", &caps[2])
                })
                .into_owned(),
            Self::FencedCode | Self::LatexBlock | Self::InlineCode | Self::Link => re
                .replace_all(text, |caps: &Captures| registry.protect(category, &caps[0]))
                .into_owned(),
        }
    }
}

/// Content between single dollars that reads as an amount rather than math:
/// only digits, whitespace, commas and periods.
pub fn is_currency(content: &str) -> bool {
    !content.is_empty()
        && content
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == ',' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: Rule, text: &str) -> (String, PlaceholderRegistry) {
        apply_with(rule, text, &MarkdownOptions::default())
    }

    fn apply_with(
        rule: Rule,
        text: &str,
        options: &MarkdownOptions,
    ) -> (String, PlaceholderRegistry) {
        let mut registry = PlaceholderRegistry::new();
        let out = rule.apply(text, options, &mut registry);
        (out, registry)
    }

    #[test]
    fn test_frontmatter_only_at_document_start() {
        let (out, _) = apply(Rule::Frontmatter, "---\ntitle: x\n---\nbody");
        assert_eq!(out, "<<<FRONTMATTER_100>>>\nbody");

        let (out, _) = apply(Rule::Frontmatter, "intro\n---\ntitle: x\n---");
        assert_eq!(out, "intro\n---\ntitle: x\n---");
    }

    #[test]
    fn test_frontmatter_is_non_greedy() {
        let (out, registry) = apply(Rule::Frontmatter, "---\na: 1\n---\ntext\n---\nmore");
        assert_eq!(out, "<<<FRONTMATTER_100>>>\ntext\n---\nmore");
        assert_eq!(
            registry.into_maps().get("<<<FRONTMATTER_100>>>"),
            Some("---\na: 1\n---")
        );
    }

    #[test]
    fn test_fenced_code_blocks_left_to_right() {
        let text = "a\n```rust\nfn x() {}\n```\nb\n```\ny\n```";
        let (out, registry) = apply(Rule::FencedCode, text);
        assert_eq!(out, "a\n<<<MULTILINE_CODE_100>>>\nb\n<<<MULTILINE_CODE_101>>>");

        let maps = registry.into_maps();
        assert_eq!(
            maps.get("<<<MULTILINE_CODE_100>>>"),
            Some("```rust\nfn x() {}\n```")
        );
    }

    #[test]
    fn test_latex_block_spans_lines() {
        let (out, _) = apply(Rule::LatexBlock, "see\n$$\na^2 + b^2\n$$\nend");
        assert_eq!(out, "see\n<<<LATEX_BLOCK_100>>>\nend");
    }

    #[test]
    fn test_inline_code() {
        let (out, _) = apply(Rule::InlineCode, "Run `cargo build` then `cargo test`.");
        assert_eq!(out, "Run <<<CODE_100>>> then <<<CODE_101>>>.");
    }

    #[test]
    fn test_inline_latex_skips_currency() {
        let (out, _) = apply(Rule::InlineLatex, "Price: $19.99 today");
        assert_eq!(out, "Price: $19.99 today");

        let (out, _) = apply(Rule::InlineLatex, "Pay $1,000 $ now");
        assert_eq!(out, "Pay $1,000 $ now");

        let (out, _) = apply(Rule::InlineLatex, "Energy: $E=mc^2$");
        assert_eq!(out, "Energy: <<<LATEX_INLINE_100>>>");
    }

    #[test]
    fn test_inline_latex_with_backslash_is_math() {
        let (out, _) = apply(Rule::InlineLatex, r"Angle $\alpha$ here");
        assert_eq!(out, "Angle <<<LATEX_INLINE_100>>> here");
    }

    #[test]
    fn test_is_currency() {
        assert!(is_currency("19.99"));
        assert!(is_currency("1,000 "));
        assert!(!is_currency("E=mc^2"));
        assert!(!is_currency(r"\,5"));
        assert!(!is_currency(""));
    }

    #[test]
    fn test_link_protected_whole_when_link_text_not_translated() {
        let options = MarkdownOptions {
            translate_link_text: false,
            ..MarkdownOptions::default()
        };
        let (out, registry) =
            apply_with(Rule::Link, "See [docs](https://x.dev) and ![logo](a.png)", &options);
        assert_eq!(out, "See <<<LINK_100>>> and <<<LINK_101>>>");
        assert_eq!(
            registry.into_maps().get("<<<LINK_101>>>"),
            Some("![logo](a.png)")
        );
    }

    #[test]
    fn test_link_text_left_translatable() {
        let (out, registry) = apply(Rule::Link, "See [the docs](https://x.dev) now");
        assert_eq!(out, "See <<<LINK_100>>>the docs<<<LINK_101>>> now");

        let maps = registry.into_maps();
        assert_eq!(maps.get("<<<LINK_100>>>"), Some("["));
        assert_eq!(maps.get("<<<LINK_101>>>"), Some("](https://x.dev)"));
    }

    #[test]
    fn test_heading_prefix_only() {
        let (out, registry) = apply(Rule::Heading, "## Hello World");
        assert_eq!(out, "<<<HEADING_100>>>Hello World");
        assert_eq!(registry.into_maps().get("<<<HEADING_100>>>"), Some("## "));

        let (out, _) = apply(Rule::Heading, "####### too deep");
        assert_eq!(out, "####### too deep");

        let (out, _) = apply(Rule::Heading, "#hashtag");
        assert_eq!(out, "#hashtag");
    }

    #[test]
    fn test_list_item_prefixes() {
        let (out, registry) = apply(Rule::ListItem, "  - nested item");
        assert_eq!(out, "<<<LIST_100>>>nested item");
        assert_eq!(registry.into_maps().get("<<<LIST_100>>>"), Some("  - "));

        let (out, _) = apply(Rule::ListItem, "12.  twelfth");
        assert_eq!(out, "<<<LIST_100>>>twelfth");

        let (out, _) = apply(Rule::ListItem, "**bold** start");
        assert_eq!(out, "**bold** start");
    }

    #[test]
    fn test_blockquote_prefix() {
        let (out, _) = apply(Rule::Blockquote, "> quoted text");
        assert_eq!(out, "<<<BLOCKQUOTE_100>>>quoted text");

        let (out, _) = apply(Rule::Blockquote, ">no space");
        assert_eq!(out, ">no space");
    }

    #[test]
    fn test_enabled_flags() {
        let all = MarkdownOptions {
            translate_frontmatter: true,
            translate_multiline_code: true,
            translate_latex: true,
            translate_link_text: true,
        };
        assert!(!Rule::Frontmatter.is_enabled(&all));
        assert!(!Rule::FencedCode.is_enabled(&all));
        assert!(!Rule::LatexBlock.is_enabled(&all));
        assert!(!Rule::InlineLatex.is_enabled(&all));
        assert!(Rule::InlineCode.is_enabled(&all));
        assert!(Rule::Link.is_enabled(&all));

        let none = MarkdownOptions::default();
        assert!(Rule::Frontmatter.is_enabled(&none));
        assert!(Rule::InlineLatex.is_enabled(&none));
    }
}
