use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::backend::{Backend, BatchRequest, ContentHint};
use super::language::{AUTO_DETECT, display_name};
use super::prompt::build_system_prompt;
use crate::error::BackendError;
use crate::markdown::split_edges;

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Backend for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    concurrency: usize,
}

impl TranslationClient {
    pub fn new(endpoint: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            model,
            concurrency: 1,
        }
    }

    /// How many texts of one batch are sent at the same time (`0` = all).
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }

    async fn complete(&self, system_prompt: &str, text: &str) -> Result<String, BackendError> {
        let url = self.completions_url();

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(system_prompt),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(text),
                },
            ],
            stream: false,
        };

        let mut http_request = self.client.post(&url).json(&chat_request);

        // Add Authorization header if API key is present
        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|e| {
            BackendError::Request(format!("Failed to connect to API endpoint {url}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        body.choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| BackendError::Parse("response contained no message content".into()))
    }

    /// Translates one text, keeping its surrounding whitespace.
    async fn translate_one(&self, system_prompt: &str, text: &str) -> Result<String, BackendError> {
        let (leading, content, trailing) = split_edges(text);
        if content.is_empty() {
            return Ok(text.to_string());
        }
        let translated = self.complete(system_prompt, content).await?;
        Ok(format!("{leading}{}{trailing}", translated.trim()))
    }
}

fn source_for_prompt(source_language: &str) -> Option<&str> {
    (source_language != AUTO_DETECT).then(|| display_name(source_language))
}

#[async_trait]
impl Backend for TranslationClient {
    async fn translate_batch(&self, request: &BatchRequest) -> Result<Vec<String>, BackendError> {
        let system_prompt = build_system_prompt(
            display_name(&request.target_language),
            source_for_prompt(&request.source_language),
            request.content_hint,
        );

        match request.content_hint {
            // The whole document goes out in one message so the model sees its context.
            Some(ContentHint::Markdown) => {
                let document = request.texts.join("\n");
                if document.trim().is_empty() {
                    return Ok(request.texts.clone());
                }
                let translated = self.complete(&system_prompt, &document).await?;
                Ok(translated.split('\n').map(str::to_string).collect())
            }
            None => {
                let limit = if self.concurrency == 0 {
                    request.texts.len().max(1)
                } else {
                    self.concurrency
                };
                let calls: Vec<_> = request
                    .texts
                    .iter()
                    .map(|text| self.translate_one(&system_prompt, text))
                    .collect();
                stream::iter(calls).buffered(limit).try_collect().await
            }
        }
    }
}
