//! Subcommand implementations.

/// Text extraction command handler.
pub mod extract;

/// Provider listing command handler.
pub mod providers;

/// Translation command handler.
pub mod translate;
