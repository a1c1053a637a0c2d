//! Enrichment client. The single point of entry for the external
//! key-phrase / entity / sentiment service.
//!
//! Enrichment is best-effort. Callers get a `Result` and decide how to degrade;
//! nothing in here is allowed to fail an analysis on its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const LANGUAGE_CODE: &str = "en";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("enrichment service is not configured")]
    Disabled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPhrase {
    pub text: String,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub score: Option<f32>,
}

/// What the enrichment service returns for one excerpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    #[serde(default)]
    pub key_phrases: Vec<KeyPhrase>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize)]
struct EnrichmentRequest<'a> {
    text: &'a str,
    language_code: &'a str,
}

/// Pluggable enrichment backend, carried in `AppState` as `Arc<dyn Enricher>`.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, excerpt: &str) -> Result<EnrichmentPayload, EnrichmentError>;
}

/// Used when no enrichment service is configured. Always unavailable.
pub struct DisabledEnricher;

#[async_trait]
impl Enricher for DisabledEnricher {
    async fn enrich(&self, _excerpt: &str) -> Result<EnrichmentPayload, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }
}

/// JSON-over-HTTP enrichment client with retry on 429 and 5xx.
#[derive(Clone)]
pub struct HttpEnricher {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    backoff_base: Duration,
}

impl HttpEnricher {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            backoff_base: Duration::from_millis(500),
        })
    }

    #[cfg(test)]
    fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, excerpt: &str) -> Result<EnrichmentPayload, EnrichmentError> {
        let request_body = EnrichmentRequest {
            text: excerpt,
            language_code: LANGUAGE_CODE,
        };

        let mut last_error: Option<EnrichmentError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: base, 2×base, ...
                let delay = self.backoff_base * (1 << (attempt - 1));
                warn!(
                    "Enrichment attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.header("x-api-key", key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EnrichmentError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Enrichment service returned {}: {}", status, body);
                last_error = Some(EnrichmentError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EnrichmentError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let payload: EnrichmentPayload = serde_json::from_str(&body)?;

            debug!(
                "Enrichment succeeded: key_phrases={}, entities={}, sentiment={:?}",
                payload.key_phrases.len(),
                payload.entities.len(),
                payload.sentiment
            );

            return Ok(payload);
        }

        Err(last_error.unwrap_or(EnrichmentError::Api {
            status: 429,
            message: format!("gave up after {MAX_RETRIES} attempts"),
        }))
    }
}
