use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::markdown::MarkdownOptions;

#[derive(Parser, Debug)]
#[command(name = "mdtl")]
#[command(about = "Translate Markdown while keeping code, math, links and markup intact")]
#[command(version)]
pub struct Args {
    /// Markdown files to translate (reads from stdin if none are given)
    pub files: Vec<PathBuf>,

    /// Target language code(s), comma separated (e.g. ja or ja,fr,de)
    #[arg(short = 't', long = "to", value_delimiter = ',')]
    pub to: Vec<String>,

    /// Source language code, or "auto" to let the model detect it
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Translate into every language listed under `languages` in the config
    #[arg(long)]
    pub multi: bool,

    /// Provider name (e.g., ollama, openrouter)
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Disable cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Also write the translation of a single file to disk
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Directory for translated files (default: next to each input)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Send whole lines without protecting any Markdown
    #[arg(long)]
    pub raw: bool,

    /// Send the whole document in one request (implies --raw)
    #[arg(long)]
    pub context: bool,

    #[command(flatten)]
    pub markdown: MarkdownArgs,

    /// Space-separated strings removed from the translated text
    #[arg(long, value_name = "CHARS")]
    pub remove_chars: Option<String>,

    /// Attempts per request before a language fails
    #[arg(long, value_name = "N")]
    pub retry_count: Option<usize>,

    /// Seconds to wait between attempts
    #[arg(long, value_name = "SECS")]
    pub retry_timeout: Option<u64>,

    /// Maximum requests in flight per language (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Suppress status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print debug logs to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that decide which Markdown spans are sent for translation.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct MarkdownArgs {
    /// Translate the frontmatter block
    #[arg(long)]
    pub translate_frontmatter: bool,

    /// Translate fenced code blocks
    #[arg(long)]
    pub translate_code: bool,

    /// Translate LaTeX math
    #[arg(long)]
    pub translate_latex: bool,

    /// Keep link text untranslated
    #[arg(long)]
    pub protect_link_text: bool,
}

impl MarkdownArgs {
    /// Turns on what the flags ask for; flags never turn a config setting off,
    /// except `--protect-link-text`.
    pub const fn apply(&self, mut options: MarkdownOptions) -> MarkdownOptions {
        if self.translate_frontmatter {
            options.translate_frontmatter = true;
        }
        if self.translate_code {
            options.translate_multiline_code = true;
        }
        if self.translate_latex {
            options.translate_latex = true;
        }
        if self.protect_link_text {
            options.translate_link_text = false;
        }
        options
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported language codes
    Languages,
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Print the text that would be sent for translation
    Extract {
        /// Markdown file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Print tokenized lines with placeholders instead
        #[arg(long)]
        tagged: bool,

        #[command(flatten)]
        markdown: MarkdownArgs,
    },
}
