//! Downstream backend proxy for player clustering and historical
//! comparisons.
//!
//! Plain HTTP with a shared API key header. A player with no cluster is a
//! soft failure: the lookup resolves to a `no_cluster_found` marker inside a
//! normal response, preserving the conversational flow instead of a 404.
//! No retry or backoff; the store's caller surfaces hard failures as-is.

use serde::Serialize;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::UpstreamError;
use crate::query::types::ComparisonCount;

/// Client for the cluster backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Result of a cluster or comparison lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterLookup {
    pub player: String,
    pub no_cluster_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<Value>,
}

impl ClusterLookup {
    pub fn not_found(player: &str) -> Self {
        Self {
            player: player.to_string(),
            no_cluster_found: true,
            cluster: None,
            comparisons: Vec::new(),
        }
    }
}

impl BackendClient {
    /// Build the client if the proxy is configured; `None` disables the
    /// backend-answered tasks.
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        Some(Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch a player's cluster profile.
    pub async fn player_cluster(&self, player: &str) -> Result<ClusterLookup, UpstreamError> {
        let url = format!("{}/api/clusters/player", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[("name", player)])
            .send()
            .await?;

        match self.read_payload(response, player).await? {
            Some(payload) => Ok(ClusterLookup {
                player: player.to_string(),
                no_cluster_found: false,
                cluster: Some(payload),
                comparisons: Vec::new(),
            }),
            None => Ok(ClusterLookup::not_found(player)),
        }
    }

    /// Fetch historically similar players, optionally bounded by count.
    pub async fn historical_comparisons(
        &self,
        player: &str,
        count: Option<ComparisonCount>,
    ) -> Result<ClusterLookup, UpstreamError> {
        let url = format!("{}/api/clusters/comparisons", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[("name", player)]);
        if let Some(count) = count {
            request = request.query(&[("count", count.as_param())]);
        }

        match self.read_payload(request.send().await?, player).await? {
            Some(payload) => {
                let comparisons = match payload {
                    Value::Array(items) => items,
                    Value::Object(mut obj) => match obj.remove("comparisons") {
                        Some(Value::Array(items)) => items,
                        other => other.into_iter().collect(),
                    },
                    other => vec![other],
                };
                Ok(ClusterLookup {
                    player: player.to_string(),
                    no_cluster_found: comparisons.is_empty(),
                    cluster: None,
                    comparisons,
                })
            }
            None => Ok(ClusterLookup::not_found(player)),
        }
    }

    /// 404 and explicit not-found payloads are the soft miss; any other
    /// non-success status is a hard upstream failure.
    async fn read_payload(
        &self,
        response: reqwest::Response,
        player: &str,
    ) -> Result<Option<Value>, UpstreamError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(player, "no cluster found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        if payload
            .get("noClusterFound")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return Ok(None);
        }
        Ok(Some(payload))
    }
}
