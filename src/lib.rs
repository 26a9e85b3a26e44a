//! # mdtl - Markdown Translation CLI
//!
//! `mdtl` translates Markdown documents through OpenAI-compatible API endpoints
//! while keeping frontmatter, code, math, links and block markup byte-for-byte intact.
//!
//! ## How it works
//!
//! 1. Protected spans are replaced with `<<<CATEGORY_n>>>` placeholders ([`markdown::tokenize`])
//! 2. The prose around them is translated fragment by fragment ([`translation::SegmentTranslator`])
//! 3. Placeholders are swapped back for the original text ([`markdown::restore`])
//!
//! [`pipeline::Orchestrator`] repeats this for every target language and input file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file and print the result
//! mdtl --to ja ./notes.md
//!
//! # Write one file per language next to the input
//! mdtl --to ja,fr,de ./notes.md
//!
//! # Show what would be sent for translation
//! mdtl extract ./notes.md
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/mdtl/config.toml`:
//!
//! ```toml
//! [mdtl]
//! provider = "ollama"
//! model = "gemma3:12b"
//! to = "ja"
//!
//! [options]
//! translate_latex = false
//! remove_chars = "♪"
//!
//! [providers.ollama]
//! endpoint = "http://localhost:11434"
//! models = ["gemma3:12b", "llama3.2"]
//! ```

/// Translation cache management using `SQLite`.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Error types for backend calls and run configuration.
pub mod error;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Placeholder protection of Markdown spans.
pub mod markdown;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Per-language and per-file translation runs.
pub mod pipeline;

/// Translation backends, retry, caching and segment translation.
pub mod translation;

/// Terminal UI components (progress, colors).
pub mod ui;
