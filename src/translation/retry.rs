//! Per-call retry policy.

use async_trait::async_trait;
use log::warn;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::backend::{Backend, BatchRequest};
use crate::error::BackendError;

/// How often, and how far apart, a failed backend call is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts; `0` is treated as `1`.
    pub retry_count: usize,
    /// Wait between attempts.
    pub retry_timeout: Duration,
}

impl RetryPolicy {
    pub const fn new(retry_count: usize, retry_timeout: Duration) -> Self {
        Self {
            retry_count,
            retry_timeout,
        }
    }

    pub const fn attempts(&self) -> usize {
        if self.retry_count == 0 {
            1
        } else {
            self.retry_count
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(30))
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up.
pub async fn retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= attempts => {
                return Err(if attempts == 1 {
                    e
                } else {
                    BackendError::RetriesExhausted {
                        attempts,
                        last: Box::new(e),
                    }
                });
            }
            Err(e) => {
                warn!(
                    "Attempt {attempt}/{attempts} failed: {e}. Retrying in {}s...",
                    policy.retry_timeout.as_secs_f32()
                );
                sleep(policy.retry_timeout).await;
                attempt += 1;
            }
        }
    }
}

/// Wraps a backend so that every batch call follows a [`RetryPolicy`].
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B> RetryingBackend<B> {
    pub const fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<B: Backend> Backend for RetryingBackend<B> {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        retry(&self.policy, || self.inner.translate_batch(request)).await
    }
}
