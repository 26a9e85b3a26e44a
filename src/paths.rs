//! XDG-style path utilities for configuration and cache directories.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "mdtl";

/// Returns the configuration directory for mdtl.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/mdtl` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/mdtl` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns the cache directory for mdtl.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/mdtl` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/mdtl` otherwise
pub fn cache_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

fn xdg_dir(variable: &str, fallback: &str) -> Result<PathBuf> {
    match std::env::var(variable) {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(fallback).join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
