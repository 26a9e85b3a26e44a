//! Scripted in-process backend for tests.
//!
//! - `MockBackend::identity()` - returns every text unchanged
//! - `MockBackend::tagging()` - prefixes every text with `[lang] `
//! - `.failing_for(lang)` - always fails for one target language
//! - `.failing_first(n)` - fails the first `n` calls, then behaves normally

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::backend::{Backend, BatchRequest};
use crate::error::BackendError;

/// How the mock turns a text into its "translation".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Echo the input.
    Identity,
    /// Prefix with the target language code.
    Tagging,
}

/// Backend double that records every request it sees.
#[derive(Debug)]
pub struct MockBackend {
    behavior: MockBehavior,
    failing_languages: HashSet<String>,
    fail_first: usize,
    latency: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<BatchRequest>>,
}

impl MockBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_languages: HashSet::new(),
            fail_first: 0,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    pub fn tagging() -> Self {
        Self::new(MockBehavior::Tagging)
    }

    #[must_use]
    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing_languages.insert(language.to_string());
        self
    }

    #[must_use]
    pub const fn failing_first(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    /// Every call waits this long before answering.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of `translate_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Copies of all requests received, in arrival order.
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn render(&self, text: &str, language: &str) -> String {
        match self.behavior {
            MockBehavior::Identity => text.to_string(),
            MockBehavior::Tagging => format!("[{language}] {text}"),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if call < self.fail_first {
            return Err(BackendError::Request(format!("simulated failure #{}", call + 1)));
        }
        if self.failing_languages.contains(&request.target_language) {
            return Err(BackendError::Api {
                status: 500,
                message: format!("simulated outage for {}", request.target_language),
            });
        }

        Ok(request
            .texts
            .iter()
            .map(|text| self.render(text, &request.target_language))
            .collect())
    }
}
