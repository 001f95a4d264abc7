use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    config::SearchConfig,
    error::{ConfigError, SearchError},
    types::SourceSummary,
};

/// Web-search capability used for evidence retrieval
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SourceSummary>, SearchError>;
}

/// Google Programmable Search (Custom Search JSON API)
pub struct GoogleCustomSearch {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl GoogleCustomSearch {
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(config: &SearchConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl WebSearch for GoogleCustomSearch {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SourceSummary>, SearchError> {
        let count = count.clamp(1, SearchConfig::MAX_RESULTS).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", count.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.items)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SourceSummary>,
}
