//! Game lookup tools: Steam storefront name search and catalog semantic search

use crate::errors::{AgentError, Result};
use crate::steamdb::SteamDbManager;
use crate::tools::types::{bind_arguments, Tool};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const STORE_SEARCH_NAME: &str = "steam_search_tool";
pub const DESCRIPTION_SEARCH_NAME: &str = "steam_search_by_desc_tool";

/// Names returned by a storefront search
const STORE_SEARCH_LIMIT: usize = 5;

/// Default neighbours returned by a description search
pub const DEFAULT_DESCRIPTION_K: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreSearchParams {
    game_name: String,
}

#[derive(Debug, Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<StoreItem>,
}

#[derive(Debug, Deserialize)]
struct StoreItem {
    name: String,
}

/// Looks a title up on the Steam store search API
#[derive(Debug, Clone)]
pub struct SteamStoreSearchTool {
    client: Client,
    base_url: String,
}

impl SteamStoreSearchTool {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AgentError::HttpError)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, game_name: &str) -> Result<Vec<String>> {
        let url = format!("{}/api/storesearch/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("term", game_name), ("l", "english"), ("cc", "US")])
            .send()
            .await
            .map_err(|e| AgentError::tool(STORE_SEARCH_NAME, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgentError::tool(
                STORE_SEARCH_NAME,
                format!("store returned HTTP {}", response.status()),
            ));
        }

        let body: StoreSearchResponse = response
            .json()
            .await
            .map_err(|e| AgentError::tool(STORE_SEARCH_NAME, format!("bad response: {}", e)))?;

        Ok(body
            .items
            .into_iter()
            .take(STORE_SEARCH_LIMIT)
            .map(|item| item.name)
            .collect())
    }
}

#[async_trait]
impl Tool for SteamStoreSearchTool {
    fn name(&self) -> &'static str {
        STORE_SEARCH_NAME
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<Value> {
        let params: StoreSearchParams = bind_arguments(STORE_SEARCH_NAME, arguments)?;
        let names = self.search(&params.game_name).await?;
        debug!(term = %params.game_name, hits = names.len(), "Store search");
        Ok(serde_json::to_value(names)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptionSearchParams {
    desc: String,
    #[serde(default = "default_k")]
    k: usize,
}

fn default_k() -> usize {
    DEFAULT_DESCRIPTION_K
}

/// One description search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub name: String,
    pub description: String,
}

/// Semantic search over the local catalog index
#[derive(Clone)]
pub struct SteamDescriptionSearchTool {
    steamdb: Arc<SteamDbManager>,
}

impl SteamDescriptionSearchTool {
    pub fn new(steamdb: Arc<SteamDbManager>) -> Self {
        Self { steamdb }
    }

    pub async fn search(&self, desc: &str, k: usize) -> Result<Vec<GameSummary>> {
        Ok(self
            .steamdb
            .query(desc, k)
            .await?
            .into_iter()
            .map(|record| GameSummary {
                name: record.name.clone(),
                description: record.description.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl Tool for SteamDescriptionSearchTool {
    fn name(&self) -> &'static str {
        DESCRIPTION_SEARCH_NAME
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<Value> {
        let params: DescriptionSearchParams = bind_arguments(DESCRIPTION_SEARCH_NAME, arguments)?;
        let hits = self.search(&params.desc, params.k).await?;
        Ok(serde_json::to_value(hits)?)
    }
}
