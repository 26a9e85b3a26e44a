//! Text extraction command handler.

use anyhow::Result;
use std::path::Path;

use crate::config::ConfigManager;
use crate::input::InputReader;
use crate::markdown::{MarkdownOptions, extract_text, split_lines, tagged_text, tokenize};

pub struct ExtractOptions<'a> {
    pub file: Option<&'a Path>,
    pub tagged: bool,
    /// Options after CLI flags were applied on top of the config file.
    pub markdown: MarkdownOptions,
}

/// Loads the `[options]` Markdown flags from the config file, if there is one.
pub fn configured_markdown_options() -> Result<MarkdownOptions> {
    let config = ConfigManager::new()?.load_or_default()?;
    Ok(config.options.markdown)
}

/// Prints the prose that would reach the backend, or the tagged lines.
pub fn run_extract(options: &ExtractOptions<'_>) -> Result<()> {
    let source_text = InputReader::read(options.file)?;
    println!("{}", render(&source_text, options.tagged, &options.markdown));
    Ok(())
}

fn render(text: &str, tagged: bool, markdown: &MarkdownOptions) -> String {
    let document = tokenize(&split_lines(text), markdown);
    if tagged {
        tagged_text(&document)
    } else {
        extract_text(&document)
    }
}
