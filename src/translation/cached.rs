use async_trait::async_trait;
use log::{debug, warn};

use super::backend::{Backend, BatchRequest, ContentHint};
use super::prompt::prompt_hash;
use crate::cache::{CacheKey, CacheManager};
use crate::error::BackendError;

/// Serves batches from the translation cache and stores fresh results.
///
/// Cache read and write failures are logged and never fail a translation.
pub struct CachedBackend<B> {
    inner: B,
    cache: CacheManager,
    model: String,
    endpoint: String,
    prompt_hash: String,
}

impl<B> CachedBackend<B> {
    pub fn new(inner: B, cache: CacheManager, model: &str, endpoint: &str) -> Self {
        Self {
            inner,
            cache,
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            prompt_hash: prompt_hash(),
        }
    }

    fn key<'a>(&'a self, request: &'a BatchRequest) -> CacheKey<'a> {
        CacheKey {
            texts: &request.texts,
            source_language: &request.source_language,
            target_language: &request.target_language,
            model: &self.model,
            endpoint: &self.endpoint,
            content_hint: request.content_hint.map(ContentHint::as_str),
            prompt_hash: &self.prompt_hash,
        }
    }
}

#[async_trait]
impl<B: Backend> Backend for CachedBackend<B> {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        let key = self.key(request);

        match self.cache.get(&key) {
            Ok(Some(cached)) if cached.len() == request.texts.len() => {
                debug!("Cache hit for {} texts into {}", cached.len(), request.target_language);
                return Ok(cached);
            }
            Ok(_) => {}
            Err(e) => warn!("{}", BackendError::Cache(format!("{e:#}"))),
        }

        let translations = self.inner.translate_batch(request).await?;

        if let Err(e) = self.cache.put(&key, &translations) {
            warn!("{}", BackendError::Cache(format!("{e:#}")));
        }

        Ok(translations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::MockBackend;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn cached(mock: &Arc<MockBackend>, temp_dir: &TempDir) -> CachedBackend<Arc<MockBackend>> {
        let cache = CacheManager::at(temp_dir.path().join("translations.db")).unwrap();
        CachedBackend::new(mock.clone(), cache, "model", "http://localhost:11434")
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mock = Arc::new(MockBackend::tagging());
        let backend = cached(&mock, &temp_dir);
        let request = BatchRequest::new(vec!["Hello".to_string()], "en", "ja");

        let first = backend.translate_batch(&request).await.unwrap();
        let second = backend.translate_batch(&request).await.unwrap();

        assert_eq!(first, vec!["[ja] Hello"]);
        assert_eq!(second, first);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_other_language_misses() {
        let temp_dir = TempDir::new().unwrap();
        let mock = Arc::new(MockBackend::tagging());
        let backend = cached(&mock, &temp_dir);

        backend
            .translate_batch(&BatchRequest::new(vec!["Hello".to_string()], "en", "ja"))
            .await
            .unwrap();
        let fr = backend
            .translate_batch(&BatchRequest::new(vec!["Hello".to_string()], "en", "fr"))
            .await
            .unwrap();

        assert_eq!(fr, vec!["[fr] Hello"]);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let mock = Arc::new(MockBackend::identity().failing_first(1));
        let backend = cached(&mock, &temp_dir);
        let request = BatchRequest::new(vec!["Hello".to_string()], "en", "de");

        assert!(backend.translate_batch(&request).await.is_err());
        assert_eq!(backend.translate_batch(&request).await.unwrap(), vec!["Hello"]);
        assert_eq!(mock.calls(), 2);
    }
}
