//! Vybot API client
//!
//! Typed client for the Vybe analytics REST service. One method per logical
//! query; query strings and JSON bodies are built by pure functions so the
//! field-name mapping can be tested without network access.

pub mod queries;
pub mod types;

pub use queries::*;
pub use types::*;

use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.vybenetwork.xyz";

#[derive(Debug, Error)]
pub enum VybeError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned HTTP {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Sort keys exposed in wizard UIs map to different field names upstream.
pub fn upstream_sort_key(key: &str) -> &str {
    match key {
        "value" => "valueUsd",
        "price" => "priceUsd",
        other => other,
    }
}

#[derive(Clone)]
pub struct VybeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl VybeClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, VybeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint = path, "GET upstream");

        let resp = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| VybeError::Request {
                endpoint: path.to_string(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(VybeError::Status {
                endpoint: path.to_string(),
                status: resp.status(),
            });
        }

        resp.json().await.map_err(|e| VybeError::Parse {
            endpoint: path.to_string(),
            source: e,
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, VybeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint = path, "POST upstream");

        let resp = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| VybeError::Request {
                endpoint: path.to_string(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(VybeError::Status {
                endpoint: path.to_string(),
                status: resp.status(),
            });
        }

        resp.json().await.map_err(|e| VybeError::Parse {
            endpoint: path.to_string(),
            source: e,
        })
    }

    pub async fn token_balances(
        &self,
        q: &TokenBalancesQuery,
    ) -> Result<TokenBalancesResponse, VybeError> {
        let path = format!("/account/token-balance/{}", q.owner);
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn token_balances_multi(
        &self,
        q: &TokenBalancesMultiQuery,
    ) -> Result<TokenBalancesMultiResponse, VybeError> {
        self.post_json("/account/token-balances", &q.body()).await
    }

    pub async fn token_balances_ts(
        &self,
        q: &TokenBalancesTsQuery,
    ) -> Result<TokenBalancesTsResponse, VybeError> {
        let path = format!("/account/token-balance-ts/{}", q.owner);
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn token_balances_ts_multi(
        &self,
        q: &TokenBalancesTsMultiQuery,
    ) -> Result<TokenBalancesTsMultiResponse, VybeError> {
        self.post_json("/account/token-balances-ts", &q.body()).await
    }

    pub async fn nft_balances(
        &self,
        q: &NftBalancesQuery,
    ) -> Result<NftBalancesResponse, VybeError> {
        let path = format!("/account/nft-balance/{}", q.owner);
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn nft_balances_multi(
        &self,
        q: &NftBalancesMultiQuery,
    ) -> Result<NftBalancesMultiResponse, VybeError> {
        self.post_json("/account/nft-balances", &q.body()).await
    }

    pub async fn pnl(&self, q: &PnlQuery) -> Result<PnlResponse, VybeError> {
        let path = format!("/account/pnl/{}", q.owner);
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn nft_collection_owners(
        &self,
        collection: &str,
    ) -> Result<NftOwnersResponse, VybeError> {
        let path = format!("/nft/collection-owners/{}", collection);
        self.get_json(&path, &[]).await
    }

    pub async fn token_details(&self, mint: &str) -> Result<TokenDetailsResponse, VybeError> {
        let path = format!("/token/{}", mint);
        self.get_json(&path, &[]).await
    }

    pub async fn token_top_holders(&self, mint: &str) -> Result<TokenHoldersResponse, VybeError> {
        let path = format!("/token/{}/top-holders", mint);
        self.get_json(&path, &[]).await
    }

    pub async fn token_trades(
        &self,
        q: &TokenTradesQuery,
    ) -> Result<TokenTradesResponse, VybeError> {
        self.get_json("/token/trades", &q.query_pairs()).await
    }

    pub async fn token_transfers(
        &self,
        q: &TokenTransfersQuery,
    ) -> Result<TokenTransfersResponse, VybeError> {
        self.get_json("/token/transfers", &q.query_pairs()).await
    }

    pub async fn instruction_names(
        &self,
        q: &InstructionNamesQuery,
    ) -> Result<InstructionNamesResponse, VybeError> {
        self.get_json("/token/instruction-names", &q.query_pairs())
            .await
    }

    pub async fn token_timeseries(
        &self,
        q: &TokenTimeseriesQuery,
    ) -> Result<TokenTimeseriesResponse, VybeError> {
        let path = format!("/token/{}/{}", q.mint, q.series.path_segment());
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn token_ohlcv(&self, q: &OhlcvQuery) -> Result<OhlcvResponse, VybeError> {
        let path = format!("/price/{}/token-ohlcv", q.mint);
        self.get_json(&path, &q.query_pairs()).await
    }

    pub async fn program_details(&self, program_id: &str) -> Result<ProgramDetailsResponse, VybeError> {
        let path = format!("/program/{}", program_id);
        self.get_json(&path, &[]).await
    }

    pub async fn program_tvl(
        &self,
        program_id: &str,
        resolution: &str,
    ) -> Result<ProgramTvlResponse, VybeError> {
        let path = format!("/program/{}/tvl", program_id);
        self.get_json(&path, &[("resolution", resolution.to_string())])
            .await
    }

    pub async fn program_active_users(
        &self,
        program_id: &str,
        days: Option<i64>,
    ) -> Result<ProgramActiveUsersResponse, VybeError> {
        let path = format!("/program/{}/active-users", program_id);
        let mut query = Vec::new();
        if let Some(days) = days {
            query.push(("days", days.to_string()));
        }
        self.get_json(&path, &query).await
    }

    pub async fn program_series(
        &self,
        program_id: &str,
        metric: ProgramMetric,
        range: &str,
    ) -> Result<ProgramSeriesResponse, VybeError> {
        let path = format!("/program/{}/{}", program_id, metric.path_segment());
        self.get_json(&path, &[("range", range.to_string())]).await
    }

    pub async fn program_ranking(
        &self,
        q: &ProgramRankingQuery,
    ) -> Result<ProgramRankingResponse, VybeError> {
        self.get_json("/program/ranking", &q.query_pairs()).await
    }

    pub async fn programs_list(&self, q: &ProgramsQuery) -> Result<ProgramsResponse, VybeError> {
        self.get_json("/programs", &q.query_pairs()).await
    }

    pub async fn known_accounts(
        &self,
        q: &KnownAccountsQuery,
    ) -> Result<KnownAccountsResponse, VybeError> {
        self.get_json("/program/known-program-accounts", &q.query_pairs())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_mapping_matches_upstream_names() {
        assert_eq!(upstream_sort_key("value"), "valueUsd");
        assert_eq!(upstream_sort_key("price"), "priceUsd");
        assert_eq!(upstream_sort_key("amount"), "amount");
        assert_eq!(upstream_sort_key("realizedPnlUsd"), "realizedPnlUsd");
    }

    #[test]
    fn error_messages_name_the_endpoint() {
        let err = VybeError::Status {
            endpoint: "/program/ranking".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        let text = err.to_string();
        assert!(text.contains("/program/ranking"));
        assert!(text.contains("500"));
    }
}
