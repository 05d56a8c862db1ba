//! HTTP client for the remote character and skill catalog.
//!
//! Expected endpoints, all returning camelCase JSON:
//!
//! - `GET {base}/characters/{id}`
//! - `GET {base}/skills/{id}`
//!
//! A 404 means "absent" and maps to `Ok(None)`. Everything else that is not
//! a 2xx, including the client timeout, is a `RepoError::Remote`. The client
//! never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use skirmish_domain::{Character, CharacterId, Skill, SkillId};

use crate::infrastructure::ports::{CharacterRepo, RepoError, SkillRepo};

#[derive(Clone)]
pub struct RemoteCatalogClient {
    client: Client,
    base_url: String,
}

impl RemoteCatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepoError::remote("build_client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: String,
    ) -> Result<Option<T>, RepoError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RepoError::remote(operation, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RepoError::remote(
                operation,
                format!("{} returned {}", url, response.status()),
            ));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| RepoError::serialization(format!("{operation}: {e}")))
    }
}

#[async_trait]
impl CharacterRepo for RemoteCatalogClient {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        self.fetch("get_character", format!("/characters/{id}")).await
    }
}

#[async_trait]
impl SkillRepo for RemoteCatalogClient {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError> {
        self.fetch("get_skill", format!("/skills/{id}")).await
    }
}
