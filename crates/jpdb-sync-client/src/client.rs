use std::time::Duration;

use jpdb_sync::{
    RemoteDeck, ResolvedVocabulary, ServiceError, ValidationError, VocabIdPair, VocabularyService,
};
use serde_json::{Map, Value};

use crate::wire;

pub const DEFAULT_API_BASE: &str = "https://jpdb.io/api/v1";

/// Per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`JpdbClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_base_url: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Authenticated client for the JPDB JSON API.
///
/// Every endpoint is a POST with a JSON object body, including the ones
/// that take no parameters.
pub struct JpdbClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl JpdbClient {
    pub fn new(config: ClientConfig) -> Result<Self, ValidationError> {
        if config.api_key.trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// POST `payload` (or `{}`) to `endpoint` and return the response object.
    pub async fn call(
        &self,
        endpoint: &str,
        payload: Option<Value>,
    ) -> Result<Map<String, Value>, ServiceError> {
        let url = format!("{}/{}", self.api_base(), endpoint);
        let body = payload.unwrap_or_else(|| Value::Object(Map::new()));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(endpoint, status = status.as_u16(), "JPDB request finished");

        if !status.is_success() {
            return Err(ServiceError::Remote {
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown".into()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ServiceError::Parse(format!(
                "expected a JSON object from {endpoint}, got {other}"
            ))),
            Err(e) => Err(ServiceError::Parse(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl VocabularyService for JpdbClient {
    async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError> {
        let payload = wire::to_payload(&wire::ListDecksRequest::default())?;
        let body = self.call(wire::LIST_DECKS, Some(payload)).await?;
        wire::parse_decks(body)
    }

    async fn list_deck_vocabulary(&self, deck_id: i64) -> Result<Vec<Vec<i64>>, ServiceError> {
        let payload = wire::to_payload(&wire::ListDeckVocabularyRequest::new(deck_id))?;
        let body = self.call(wire::LIST_DECK_VOCABULARY, Some(payload)).await?;
        wire::parse_vocabulary_ids(body)
    }

    async fn lookup_vocabulary(
        &self,
        pairs: &[VocabIdPair],
    ) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError> {
        let payload = wire::to_payload(&wire::LookupVocabularyRequest::new(pairs))?;
        let body = self.call(wire::LOOKUP_VOCABULARY, Some(payload)).await?;
        wire::parse_vocabulary_info(body)
    }
}
