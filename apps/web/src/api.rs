//! PokeAPI client.

use memory_core::sprites::{NamedResourceList, SpriteDetail, CANDIDATE_LIMIT};
use memory_core::{SetupError, SpriteSource};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// HTTP sprite source backed by PokeAPI.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn list_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.base_url, CANDIDATE_LIMIT)
    }

    pub fn detail_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SetupError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SetupError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SetupError::Network(format!(
                "{} returned {}",
                url,
                resp.status()
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| SetupError::Parse(e.to_string()))
    }
}

impl SpriteSource for PokeApiClient {
    async fn list_names(&self) -> memory_core::Result<Vec<String>> {
        let list: NamedResourceList = self
            .get_json(&self.list_url())
            .await
            .map_err(|e| SetupError::CandidateList(e.to_string()))?;

        log::info!("Loaded {} candidate names", list.results.len());
        Ok(list.into_names())
    }

    async fn sprite_detail(&self, name: &str) -> memory_core::Result<SpriteDetail> {
        self.get_json(&self.detail_url(name)).await
    }
}
