use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::paths;

/// Everything that decides what a batch translates to.
#[derive(Debug, Clone)]
pub struct CacheKey<'a> {
    pub texts: &'a [String],
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub model: &'a str,
    pub endpoint: &'a str,
    pub content_hint: Option<&'a str>,
    pub prompt_hash: &'a str,
}

impl CacheKey<'_> {
    pub fn digest(&self) -> String {
        let cache_input = serde_json::json!({
            "texts": self.texts,
            "source_language": self.source_language,
            "target_language": self.target_language,
            "model": self.model,
            "endpoint": self.endpoint,
            "content_hint": self.content_hint,
            "prompt_hash": self.prompt_hash,
        });

        let mut hasher = Sha256::new();
        hasher.update(cache_input.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Translation cache in an `SQLite` database.
///
/// Each row holds the translations of one batch as a JSON array.
pub struct CacheManager {
    db_path: PathBuf,
}

impl CacheManager {
    /// Opens the cache under the user cache directory.
    pub fn new() -> Result<Self> {
        let cache_dir = paths::cache_dir()?;

        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Self::at(cache_dir.join("translations.db"))
    }

    /// Opens (and creates if needed) the cache database at `db_path`.
    pub fn at(db_path: impl AsRef<Path>) -> Result<Self> {
        let manager = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        manager.init_db()?;
        Ok(manager)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS batches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cache_key TEXT UNIQUE NOT NULL,
                translations TEXT NOT NULL,
                source_language TEXT NOT NULL,
                target_language TEXT NOT NULL,
                model TEXT NOT NULL,
                endpoint TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                accessed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create batches table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cache_key ON batches(cache_key)",
            [],
        )
        .context("Failed to create index")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open cache database: {}", self.db_path.display()))
    }

    pub fn get(&self, key: &CacheKey<'_>) -> Result<Option<Vec<String>>> {
        let cache_key = key.digest();
        let conn = self.connect()?;

        let stored: Option<String> = conn
            .query_row(
                "SELECT translations FROM batches WHERE cache_key = ?1",
                [&cache_key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query cache")?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        conn.execute(
            "UPDATE batches SET accessed_at = CURRENT_TIMESTAMP WHERE cache_key = ?1",
            [&cache_key],
        )?;

        // A row that no longer parses is treated as a miss.
        Ok(serde_json::from_str(&stored).ok())
    }

    pub fn put(&self, key: &CacheKey<'_>, translations: &[String]) -> Result<()> {
        let cache_key = key.digest();
        let encoded =
            serde_json::to_string(translations).context("Failed to encode translations")?;
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO batches
             (cache_key, translations, source_language, target_language, model, endpoint)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cache_key,
                encoded,
                key.source_language,
                key.target_language,
                key.model,
                key.endpoint,
            ],
        )
        .context("Failed to insert translation into cache")?;

        Ok(())
    }
}
