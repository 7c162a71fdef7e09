//! Request parameter builders.
//!
//! Each query struct owns the parameters for one endpoint and exposes a pure
//! `query_pairs()` (GET) or `body()` (POST) builder. Keeping these pure lets
//! the omission rules be asserted without a server: boolean flags are sent
//! only when true, zero-valued numeric filters are dropped, and the wizard's
//! sort keys are mapped to the upstream field names.

use crate::upstream_sort_key;

/// Wrapped-SOL mint, the fixed base side of every trades query.
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

pub const MULTI_WALLET_MAX_ASSET_VALUE: &str = "1000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn param_name(self) -> &'static str {
        match self {
            SortOrder::Asc => "sortByAsc",
            SortOrder::Desc => "sortByDesc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

#[derive(Debug, Clone)]
pub struct TokenBalancesQuery {
    pub owner: String,
    pub include_no_price_balance: bool,
    pub only_verified: bool,
    /// Wizard-facing sort key ("value"/"amount") plus direction.
    pub sort: Option<(String, SortOrder)>,
    pub one_day_trade_minimum: i64,
    pub one_day_trade_volume_minimum: i64,
    pub holder_minimum: i64,
    pub min_asset_value: String,
    pub max_asset_value: String,
    pub limit: i64,
    pub page: i64,
}

impl Default for TokenBalancesQuery {
    fn default() -> Self {
        Self {
            owner: String::new(),
            include_no_price_balance: false,
            only_verified: false,
            sort: None,
            one_day_trade_minimum: 100,
            one_day_trade_volume_minimum: 100_000,
            holder_minimum: 50,
            min_asset_value: "0".to_string(),
            max_asset_value: String::new(),
            limit: 100,
            page: 0,
        }
    }
}

impl TokenBalancesQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.include_no_price_balance {
            pairs.push(("includeNoPriceBalance", "true".to_string()));
        }
        if let Some((key, order)) = &self.sort {
            pairs.push((order.param_name(), upstream_sort_key(key).to_string()));
        }
        if self.only_verified {
            pairs.push(("onlyVerified", "true".to_string()));
        }
        if self.one_day_trade_minimum > 0 {
            pairs.push(("oneDayTradeMinimum", self.one_day_trade_minimum.to_string()));
        }
        if self.one_day_trade_volume_minimum > 0 {
            pairs.push((
                "oneDayTradeVolumeMinimum",
                self.one_day_trade_volume_minimum.to_string(),
            ));
        }
        if self.holder_minimum > 0 {
            pairs.push(("holderMinimum", self.holder_minimum.to_string()));
        }
        if !self.min_asset_value.is_empty() && self.min_asset_value != "0" {
            pairs.push(("minAssetValue", self.min_asset_value.clone()));
        }
        if !self.max_asset_value.is_empty() {
            pairs.push(("maxAssetValue", self.max_asset_value.clone()));
        }
        if self.limit > 0 {
            pairs.push(("limit", self.limit.to_string()));
        }
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenBalancesMultiQuery {
    pub wallets: Vec<String>,
    pub filters: TokenBalancesQuery,
}

impl TokenBalancesMultiQuery {
    pub fn body(&self) -> serde_json::Value {
        let f = &self.filters;
        let max_asset_value = if f.max_asset_value.is_empty() {
            MULTI_WALLET_MAX_ASSET_VALUE.to_string()
        } else {
            f.max_asset_value.clone()
        };
        let mut body = serde_json::json!({
            "wallets": self.wallets,
            "includeNoPriceBalance": f.include_no_price_balance,
            "onlyVerified": f.only_verified,
            "oneDayTradeMinimum": f.one_day_trade_minimum,
            "oneDayTradeVolumeMinimum": f.one_day_trade_volume_minimum,
            "holderMinimum": f.holder_minimum,
            "minAssetValue": f.min_asset_value,
            "maxAssetValue": max_asset_value,
            "limit": f.limit,
            "page": f.page,
        });
        if let Some((key, order)) = &f.sort {
            body[order.param_name()] = serde_json::json!(upstream_sort_key(key));
        }
        body
    }
}

#[derive(Debug, Clone)]
pub struct TokenBalancesTsQuery {
    pub owner: String,
    pub days: i64,
    pub only_verified: bool,
    pub one_day_trade_minimum: i64,
    pub one_day_trade_volume_minimum: i64,
    pub holder_minimum: i64,
    pub min_asset_value: String,
    pub max_asset_value: String,
}

impl Default for TokenBalancesTsQuery {
    fn default() -> Self {
        Self {
            owner: String::new(),
            days: 14,
            only_verified: false,
            one_day_trade_minimum: 100,
            one_day_trade_volume_minimum: 100_000,
            holder_minimum: 50,
            min_asset_value: "0".to_string(),
            max_asset_value: String::new(),
        }
    }
}

impl TokenBalancesTsQuery {
    /// Unlike the snapshot endpoint, the time-series endpoint takes every
    /// filter explicitly; only `maxAssetValue` is dropped when unset.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("days", self.days.to_string()),
            ("onlyVerified", self.only_verified.to_string()),
            ("oneDayTradeMinimum", self.one_day_trade_minimum.to_string()),
            (
                "oneDayTradeVolumeMinimum",
                self.one_day_trade_volume_minimum.to_string(),
            ),
            ("holderMinimum", self.holder_minimum.to_string()),
            ("minAssetValue", self.min_asset_value.clone()),
        ];
        if !self.max_asset_value.is_empty() {
            pairs.push(("maxAssetValue", self.max_asset_value.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenBalancesTsMultiQuery {
    pub wallets: Vec<String>,
    pub filters: TokenBalancesTsQuery,
}

impl TokenBalancesTsMultiQuery {
    pub fn body(&self) -> serde_json::Value {
        let f = &self.filters;
        serde_json::json!({
            "wallets": self.wallets,
            "days": f.days,
            "onlyVerified": f.only_verified,
            "oneDayTradeMinimum": f.one_day_trade_minimum,
            "oneDayTradeVolumeMinimum": f.one_day_trade_volume_minimum,
            "holderMinimum": f.holder_minimum,
            "minAssetValue": f.min_asset_value,
            "maxAssetValue": f.max_asset_value,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NftBalancesQuery {
    pub owner: String,
    pub include_no_price_balance: bool,
    pub sort_by: String,
    pub order: SortOrder,
    pub limit: i64,
    pub page: i64,
}

impl Default for NftBalancesQuery {
    fn default() -> Self {
        Self {
            owner: String::new(),
            include_no_price_balance: false,
            sort_by: "value".to_string(),
            order: SortOrder::Desc,
            limit: 10,
            page: 0,
        }
    }
}

impl NftBalancesQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "includeNoPriceBalance",
                self.include_no_price_balance.to_string(),
            ),
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
            (
                self.order.param_name(),
                upstream_sort_key(&self.sort_by).to_string(),
            ),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct NftBalancesMultiQuery {
    pub wallets: Vec<String>,
    pub include_no_price_balance: bool,
    pub sort_by: String,
    pub order: SortOrder,
    pub limit: i64,
}

impl NftBalancesMultiQuery {
    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "wallets": self.wallets,
            "includeNoPriceBalance": self.include_no_price_balance,
            "limit": self.limit,
        });
        body[self.order.param_name()] = serde_json::json!(upstream_sort_key(&self.sort_by));
        body
    }
}

#[derive(Debug, Clone)]
pub struct PnlQuery {
    pub owner: String,
    pub resolution: String,
    pub token_address: Option<String>,
    /// Pnl sort keys are upstream names already (e.g. `realizedPnlUsd`).
    pub sort: Option<(String, SortOrder)>,
    pub limit: i64,
}

impl Default for PnlQuery {
    fn default() -> Self {
        Self {
            owner: String::new(),
            resolution: "1d".to_string(),
            token_address: None,
            sort: None,
            limit: 10,
        }
    }
}

impl PnlQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("resolution", self.resolution.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(token) = &self.token_address {
            pairs.push(("tokenAddress", token.clone()));
        }
        if let Some((key, order)) = &self.sort {
            pairs.push((order.param_name(), upstream_sort_key(key).to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenTradesQuery {
    /// Quote side of the pair; base is always wrapped SOL.
    pub token: String,
    pub program_id: Option<String>,
    pub market_id: Option<String>,
    pub authority: Option<String>,
    pub resolution: Option<String>,
    pub fee_payer: Option<String>,
}

impl TokenTradesQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("baseMintAddress", WSOL_MINT.to_string()),
            ("quoteMintAddress", self.token.clone()),
        ];
        if let Some(v) = &self.program_id {
            pairs.push(("programId", v.clone()));
        }
        if let Some(v) = &self.market_id {
            pairs.push(("marketId", v.clone()));
        }
        if let Some(v) = &self.authority {
            pairs.push(("authority", v.clone()));
        }
        if let Some(v) = &self.resolution {
            pairs.push(("resolution", v.clone()));
        }
        if let Some(v) = &self.fee_payer {
            pairs.push(("feePayer", v.clone()));
        }
        pairs.push(("limit", "20".to_string()));
        pairs.push(("sortByDesc", "blockTime".to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenTransfersQuery {
    pub mint: String,
    pub signature: Option<String>,
    pub calling_program: Option<String>,
    pub sender_token_account: Option<String>,
    pub sender_address: Option<String>,
    pub receiver_token_account: Option<String>,
    pub receiver_address: Option<String>,
}

impl TokenTransfersQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("mintAddress", self.mint.clone())];
        if let Some(v) = &self.signature {
            pairs.push(("signature", v.clone()));
        }
        if let Some(v) = &self.calling_program {
            pairs.push(("callingProgram", v.clone()));
        }
        if let Some(v) = &self.sender_token_account {
            pairs.push(("senderTokenAccount", v.clone()));
        }
        if let Some(v) = &self.sender_address {
            pairs.push(("senderAddress", v.clone()));
        }
        if let Some(v) = &self.receiver_token_account {
            pairs.push(("receiverTokenAccount", v.clone()));
        }
        if let Some(v) = &self.receiver_address {
            pairs.push(("receiverAddress", v.clone()));
        }
        pairs.push(("limit", "20".to_string()));
        pairs.push(("sortByDesc", "blockTime".to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructionNamesQuery {
    pub ix_name: Option<String>,
    pub calling_program: Option<String>,
    pub program_name: Option<String>,
}

impl InstructionNamesQuery {
    /// At least one filter must be set or the endpoint rejects the request.
    pub fn is_empty(&self) -> bool {
        self.ix_name.is_none() && self.calling_program.is_none() && self.program_name.is_none()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.ix_name {
            pairs.push(("ixName", v.clone()));
        }
        if let Some(v) = &self.calling_program {
            pairs.push(("callingProgram", v.clone()));
        }
        if let Some(v) = &self.program_name {
            pairs.push(("programName", v.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSeries {
    TransferVolume,
    Holders,
}

impl TokenSeries {
    pub fn path_segment(self) -> &'static str {
        match self {
            TokenSeries::TransferVolume => "transfer-volume",
            TokenSeries::Holders => "holders-ts",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "transfer-volume" => Some(TokenSeries::TransferVolume),
            "holders-ts" => Some(TokenSeries::Holders),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenTimeseriesQuery {
    pub mint: String,
    pub series: TokenSeries,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub interval: Option<String>,
}

impl TokenTimeseriesQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = self.start_time {
            pairs.push(("startTime", v.to_string()));
        }
        if let Some(v) = self.end_time {
            pairs.push(("endTime", v.to_string()));
        }
        if let Some(v) = &self.interval {
            pairs.push(("interval", v.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct OhlcvQuery {
    pub mint: String,
    pub resolution: Option<String>,
    pub time_start: Option<i64>,
    pub time_end: Option<i64>,
    pub limit: Option<i64>,
}

impl OhlcvQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.resolution {
            pairs.push(("resolution", v.clone()));
        }
        if let Some(v) = self.time_start {
            pairs.push(("timeStart", v.to_string()));
        }
        if let Some(v) = self.time_end {
            pairs.push(("timeEnd", v.to_string()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramMetric {
    InstructionsCount,
    TransactionsCount,
    ActiveUsers,
}

impl ProgramMetric {
    pub fn path_segment(self) -> &'static str {
        match self {
            ProgramMetric::InstructionsCount => "instructions-count-ts",
            ProgramMetric::TransactionsCount => "transactions-count-ts",
            ProgramMetric::ActiveUsers => "active-users-ts",
        }
    }

    pub fn unit_name(self) -> &'static str {
        match self {
            ProgramMetric::InstructionsCount => "Instructions",
            ProgramMetric::TransactionsCount => "Transactions",
            ProgramMetric::ActiveUsers => "Users",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramRankingQuery {
    pub interval: Option<String>,
    pub date: Option<i64>,
}

impl ProgramRankingQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.interval {
            pairs.push(("interval", v.clone()));
        }
        if let Some(v) = self.date {
            pairs.push(("date", v.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramsQuery {
    pub labels: Vec<String>,
    pub sort_by: Option<String>,
}

impl ProgramsQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.labels.is_empty() {
            let joined = self
                .labels
                .iter()
                .map(|l| l.to_uppercase())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("labels", joined));
        }
        if let Some(v) = &self.sort_by {
            pairs.push(("sortBy", v.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnownAccountsQuery {
    pub program_id: Option<String>,
    pub name: Option<String>,
    pub labels: Vec<String>,
    pub entity_name: Option<String>,
    pub entity_id: Option<String>,
    pub sort_by: Option<String>,
}

impl KnownAccountsQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.program_id {
            pairs.push(("programId", v.clone()));
        }
        if let Some(v) = &self.name {
            pairs.push(("name", v.clone()));
        }
        if !self.labels.is_empty() {
            pairs.push(("labels", self.labels.join(",")));
        }
        if let Some(v) = &self.entity_name {
            pairs.push(("entityName", v.clone()));
        }
        if let Some(v) = &self.entity_id {
            pairs.push(("entityId", v.clone()));
        }
        if let Some(v) = &self.sort_by {
            pairs.push(("sortBy", v.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn token_balances_defaults_send_limit_but_no_sort_or_price_flag() {
        let q = TokenBalancesQuery {
            owner: "ABC123".to_string(),
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert_eq!(pair(&pairs, "limit"), Some("100"));
        assert!(pair(&pairs, "sortByAsc").is_none());
        assert!(pair(&pairs, "sortByDesc").is_none());
        assert!(pair(&pairs, "includeNoPriceBalance").is_none());
        assert!(pair(&pairs, "page").is_none());
    }

    #[test]
    fn token_balances_sort_keys_are_mapped() {
        let q = TokenBalancesQuery {
            sort: Some(("value".to_string(), SortOrder::Desc)),
            ..Default::default()
        };
        assert_eq!(pair(&q.query_pairs(), "sortByDesc"), Some("valueUsd"));

        let q = TokenBalancesQuery {
            sort: Some(("amount".to_string(), SortOrder::Asc)),
            ..Default::default()
        };
        assert_eq!(pair(&q.query_pairs(), "sortByAsc"), Some("amount"));
    }

    #[test]
    fn token_balances_zero_filters_are_omitted() {
        let q = TokenBalancesQuery {
            one_day_trade_minimum: 0,
            one_day_trade_volume_minimum: 0,
            holder_minimum: 0,
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert!(pair(&pairs, "oneDayTradeMinimum").is_none());
        assert!(pair(&pairs, "oneDayTradeVolumeMinimum").is_none());
        assert!(pair(&pairs, "holderMinimum").is_none());
    }

    #[test]
    fn multi_wallet_body_keeps_wallet_order_and_caps_max_value() {
        let q = TokenBalancesMultiQuery {
            wallets: vec!["A".to_string(), "B".to_string()],
            filters: TokenBalancesQuery::default(),
        };
        let body = q.body();
        assert_eq!(body["wallets"], serde_json::json!(["A", "B"]));
        assert_eq!(body["maxAssetValue"], MULTI_WALLET_MAX_ASSET_VALUE);
        assert_eq!(body["limit"], 100);
        assert!(body.get("sortByDesc").is_none());
    }

    // The multi-wallet body carries a sort pair only when the user picked a
    // key, and keys without an upstream alias (`amount`) pass through
    // unchanged; unsorted requests leave the ordering to the upstream
    // default.
    #[test]
    fn multi_wallet_body_includes_sort_when_set() {
        let q = TokenBalancesMultiQuery {
            wallets: vec!["A".to_string()],
            filters: TokenBalancesQuery {
                sort: Some(("price".to_string(), SortOrder::Asc)),
                ..Default::default()
            },
        };
        let body = q.body();
        assert_eq!(body["sortByAsc"], "priceUsd");

        let q = TokenBalancesMultiQuery {
            wallets: vec!["A".to_string()],
            filters: TokenBalancesQuery {
                sort: Some(("amount".to_string(), SortOrder::Desc)),
                ..Default::default()
            },
        };
        assert_eq!(q.body()["sortByDesc"], "amount");
    }

    #[test]
    fn balance_ts_defaults_send_every_filter_except_max_value() {
        let q = TokenBalancesTsQuery {
            owner: "ABC123".to_string(),
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert_eq!(pair(&pairs, "days"), Some("14"));
        assert_eq!(pair(&pairs, "onlyVerified"), Some("false"));
        assert_eq!(pair(&pairs, "oneDayTradeMinimum"), Some("100"));
        assert_eq!(pair(&pairs, "minAssetValue"), Some("0"));
        assert!(pair(&pairs, "maxAssetValue").is_none());

        let q = TokenBalancesTsQuery {
            max_asset_value: "500".to_string(),
            ..Default::default()
        };
        assert_eq!(pair(&q.query_pairs(), "maxAssetValue"), Some("500"));
    }

    #[test]
    fn balance_ts_multi_body_carries_days_and_wallet_order() {
        let q = TokenBalancesTsMultiQuery {
            wallets: vec!["A".to_string(), "B".to_string()],
            filters: TokenBalancesTsQuery {
                days: 7,
                ..Default::default()
            },
        };
        let body = q.body();
        assert_eq!(body["wallets"], serde_json::json!(["A", "B"]));
        assert_eq!(body["days"], 7);
        assert_eq!(body["maxAssetValue"], "");
    }

    #[test]
    fn trades_query_pins_base_mint_and_recency_sort() {
        let q = TokenTradesQuery {
            token: "MINT".to_string(),
            resolution: Some("1d".to_string()),
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert_eq!(pair(&pairs, "baseMintAddress"), Some(WSOL_MINT));
        assert_eq!(pair(&pairs, "quoteMintAddress"), Some("MINT"));
        assert_eq!(pair(&pairs, "resolution"), Some("1d"));
        assert_eq!(pair(&pairs, "sortByDesc"), Some("blockTime"));
        assert!(pair(&pairs, "marketId").is_none());
    }

    #[test]
    fn instruction_names_requires_at_least_one_filter() {
        assert!(InstructionNamesQuery::default().is_empty());
        let q = InstructionNamesQuery {
            ix_name: Some("transfer".to_string()),
            ..Default::default()
        };
        assert!(!q.is_empty());
        assert_eq!(pair(&q.query_pairs(), "ixName"), Some("transfer"));
    }

    #[test]
    fn programs_query_uppercases_labels() {
        let q = ProgramsQuery {
            labels: vec!["defi".to_string(), "nft".to_string()],
            sort_by: None,
        };
        assert_eq!(pair(&q.query_pairs(), "labels"), Some("DEFI,NFT"));
    }

    #[test]
    fn known_accounts_joins_labels() {
        let q = KnownAccountsQuery {
            entity_name: Some("Jito".to_string()),
            labels: vec!["VAULT".to_string(), "POOL".to_string()],
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert_eq!(pair(&pairs, "entityName"), Some("Jito"));
        assert_eq!(pair(&pairs, "labels"), Some("VAULT,POOL"));
    }

    #[test]
    fn nft_balances_always_sends_sort_pair() {
        let q = NftBalancesQuery {
            owner: "W".to_string(),
            ..Default::default()
        };
        let pairs = q.query_pairs();
        assert_eq!(pair(&pairs, "sortByDesc"), Some("valueUsd"));
        assert_eq!(pair(&pairs, "includeNoPriceBalance"), Some("false"));
    }
}
