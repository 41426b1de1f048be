//! HTTP transport for OpenAI-compatible completion endpoints.
//!
//! `HttpEngine` wraps a `reqwest::Client` with pre-built headers and the
//! target endpoint. Each engine call is one non-streaming request; the
//! streaming seen by clients comes from the rolling loop stepping the engine.

use crate::{Completion, EngineConfig, Request};
use anyhow::{Context, Result, anyhow};
use reqwest::{
    Client, Method, Url,
    header::{self, HeaderMap, HeaderValue},
};
use tcore::InferenceEngine;

/// Completion engine backed by an HTTP endpoint.
#[derive(Clone)]
pub struct HttpEngine {
    client: Client,
    headers: HeaderMap,
    endpoint: Url,
    model: String,
    max_tokens: usize,
    temperature: Option<f64>,
}

impl HttpEngine {
    /// Build an engine from its configuration.
    ///
    /// Fails if the endpoint is not a valid URL or the API key cannot be
    /// used as a header value.
    pub fn new(client: Client, config: &EngineConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("invalid engine endpoint '{}'", config.endpoint))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            headers.insert(
                header::AUTHORIZATION,
                format!("Bearer {key}")
                    .parse()
                    .context("api key is not a valid header value")?,
            );
        }

        Ok(Self {
            client,
            headers,
            endpoint,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Send one completion request.
    pub async fn send(&self, request: &Request<'_>) -> Result<Completion> {
        tracing::trace!("request: {}", serde_json::to_string(request)?);
        let response = self
            .client
            .request(Method::POST, self.endpoint.clone())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        tracing::trace!("response: {text}");
        serde_json::from_str(&text).map_err(Into::into)
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The pre-built request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl InferenceEngine for HttpEngine {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = Request {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };
        let completion = self.send(&request).await?;
        let text = completion
            .text()
            .ok_or_else(|| anyhow!("completion response contained no choices"))?;
        Ok(format!("{prompt}{text}"))
    }
}
