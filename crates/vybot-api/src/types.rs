//! Response bodies, decoded tolerantly.
//!
//! The upstream mixes string-encoded and native numbers and omits fields
//! freely, so everything optional defaults instead of failing the decode.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesResponse {
    #[serde(default)]
    pub owner_address: String,
    #[serde(flatten)]
    pub summary: BalanceSummary,
    #[serde(default)]
    pub data: Vec<TokenBalanceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesMultiResponse {
    #[serde(default)]
    pub owner_addresses: Vec<String>,
    #[serde(flatten)]
    pub summary: BalanceSummary,
    #[serde(default)]
    pub data: Vec<TokenBalanceEntry>,
}

/// Wallet-level totals shared by the single- and multi-wallet responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    #[serde(default)]
    pub total_token_value_usd: String,
    #[serde(default)]
    pub total_token_value_usd_1d_change: String,
    #[serde(default)]
    pub total_token_count: i64,
    #[serde(default)]
    pub staked_sol_balance: String,
    #[serde(default)]
    pub staked_sol_balance_usd: String,
    #[serde(default)]
    pub active_staked_sol_balance: String,
    #[serde(default)]
    pub active_staked_sol_balance_usd: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceEntry {
    pub symbol: Option<String>,
    #[serde(default)]
    pub mint_address: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub value_usd: String,
    #[serde(default)]
    pub price_usd: String,
    #[serde(default)]
    pub price_usd_1d_change: String,
    #[serde(default)]
    pub price_usd_7d_trend: String,
    #[serde(default)]
    pub value_usd_1d_change: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesTsResponse {
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub data: Vec<TokenBalanceTsPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesTsMultiResponse {
    #[serde(default)]
    pub owner_addresses: Vec<String>,
    #[serde(default)]
    pub data: Vec<TokenBalanceTsPoint>,
}

/// One daily sample of a wallet's aggregate balances.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceTsPoint {
    #[serde(default)]
    pub block_time: i64,
    #[serde(default)]
    pub token_value: String,
    #[serde(default)]
    pub stake_value: String,
    #[serde(default)]
    pub stake_value_sol: String,
    #[serde(default)]
    pub system_value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftBalancesResponse {
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub total_sol: String,
    #[serde(default)]
    pub total_usd: String,
    #[serde(default)]
    pub total_nft_collection_count: i64,
    #[serde(default)]
    pub data: Vec<NftCollectionBalance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftBalancesMultiResponse {
    #[serde(default)]
    pub owner_addresses: Vec<String>,
    #[serde(default)]
    pub total_sol: String,
    #[serde(default)]
    pub total_usd: String,
    #[serde(default)]
    pub total_nft_collection_count: i64,
    #[serde(default)]
    pub data: Vec<NftCollectionBalance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCollectionBalance {
    pub name: Option<String>,
    #[serde(default)]
    pub collection_address: String,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub value_sol: String,
    #[serde(default)]
    pub price_sol: String,
    #[serde(default)]
    pub value_usd: String,
    #[serde(default)]
    pub price_usd: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlResponse {
    #[serde(default)]
    pub summary: PnlSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlSummary {
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub realized_pnl_usd: f64,
    #[serde(default)]
    pub unrealized_pnl_usd: f64,
    #[serde(default)]
    pub trades_count: i64,
    pub best_performing_token: Option<PnlTokenMetric>,
    pub worst_performing_token: Option<PnlTokenMetric>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlTokenMetric {
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub pnl_usd: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftOwnersResponse {
    #[serde(default)]
    pub data: Vec<NftOwner>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftOwner {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetailsResponse {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub market_cap: Option<f64>,
    pub usd_value_volume_24h: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: Option<f64>,
    pub price_change_24h: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHoldersResponse {
    #[serde(default)]
    pub data: Vec<TokenHolder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolder {
    #[serde(default)]
    pub owner_address: String,
    pub owner_name: Option<String>,
    #[serde(default)]
    pub percentage_of_supply_held: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTradesResponse {
    #[serde(default)]
    pub data: Vec<TokenTrade>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTrade {
    #[serde(default)]
    pub block_time: i64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quote_size: String,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfersResponse {
    #[serde(default)]
    pub transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default)]
    pub block_time: i64,
    pub sender_address: Option<String>,
    pub receiver_address: Option<String>,
    #[serde(default)]
    pub calculated_amount: String,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionNamesResponse {
    #[serde(default)]
    pub data: Vec<InstructionName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionName {
    #[serde(default)]
    pub ix_name: String,
    #[serde(default)]
    pub calling_program: String,
    #[serde(default)]
    pub program_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTimeseriesResponse {
    #[serde(default)]
    pub data: Vec<TokenSeriesPoint>,
}

/// Union of the transfer-volume and holders series point shapes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSeriesPoint {
    pub time_bucket_start: Option<i64>,
    pub volume: Option<f64>,
    pub timestamp: Option<i64>,
    pub n_holders: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvResponse {
    #[serde(default)]
    pub data: Vec<Candle>,
}

/// OHLCV values arrive string-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub high: String,
    #[serde(default)]
    pub low: String,
    #[serde(default)]
    pub close: String,
    #[serde(default)]
    pub volume: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDetailsResponse {
    pub name: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub program_description: Option<String>,
    #[serde(default, rename = "transactions1d")]
    pub transactions_1d: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramTvlResponse {
    #[serde(default)]
    pub program_id: String,
    #[serde(default)]
    pub data: Vec<TvlPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlPoint {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub tvl: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramActiveUsersResponse {
    #[serde(default)]
    pub data: Vec<ActiveUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    #[serde(default)]
    pub wallet: String,
    #[serde(default)]
    pub transactions: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSeriesResponse {
    #[serde(default)]
    pub data: Vec<ProgramSeriesPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSeriesPoint {
    #[serde(default)]
    pub block_time: i64,
    pub instructions_count: Option<i64>,
    pub transactions_count: Option<i64>,
    pub dau: Option<i64>,
}

impl ProgramSeriesPoint {
    pub fn value(&self) -> i64 {
        self.instructions_count
            .or(self.transactions_count)
            .or(self.dau)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRankingResponse {
    #[serde(default)]
    pub data: Vec<ProgramRank>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRank {
    pub program_name: Option<String>,
    #[serde(default)]
    pub program_id: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramsResponse {
    #[serde(default)]
    pub data: Vec<ProgramEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub program_id: String,
    pub program_description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub dau: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownAccountsResponse {
    pub program_id: Option<String>,
    #[serde(default)]
    pub accounts: Vec<KnownAccount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownAccount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_balances_decode_with_summary_fields() {
        let json = r#"{
            "ownerAddress": "ABC123",
            "totalTokenValueUsd": "1234.5",
            "totalTokenValueUsd1dChange": "-2.1",
            "totalTokenCount": 2,
            "stakedSolBalance": "1.5",
            "stakedSolBalanceUsd": "300",
            "activeStakedSolBalance": "1.0",
            "activeStakedSolBalanceUsd": "200",
            "data": [
                {"symbol": "SOL", "mintAddress": "So1", "amount": "1.5",
                 "decimals": 9, "valueUsd": "300", "priceUsd": "200",
                 "priceUsd1dChange": "1", "priceUsd7dTrend": "2",
                 "valueUsd1dChange": "3", "verified": true}
            ]
        }"#;
        let resp: TokenBalancesResponse = serde_json::from_str(json).expect("decode");
        assert_eq!(resp.owner_address, "ABC123");
        assert_eq!(resp.summary.total_token_count, 2);
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].symbol.as_deref(), Some("SOL"));
    }

    #[test]
    fn pnl_decode_tolerates_missing_extremes() {
        let json = r#"{"summary": {"winRate": 55.5, "realizedPnlUsd": 10.0,
            "unrealizedPnlUsd": -3.0, "tradesCount": 7}}"#;
        let resp: PnlResponse = serde_json::from_str(json).expect("decode");
        assert!(resp.summary.best_performing_token.is_none());
        assert_eq!(resp.summary.trades_count, 7);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"data": [{"ownerAddress": "X",
            "percentageOfSupplyHeld": 12.34, "balance": "999"}]}"#;
        let resp: TokenHoldersResponse = serde_json::from_str(json).expect("decode");
        assert_eq!(resp.data[0].owner_address, "X");
        assert!((resp.data[0].percentage_of_supply_held - 12.34).abs() < 1e-9);
    }

    #[test]
    fn empty_object_decodes_to_defaults() {
        let resp: ProgramDetailsResponse = serde_json::from_str("{}").expect("decode");
        assert!(resp.name.is_none());
        let resp: TokenTransfersResponse = serde_json::from_str("{}").expect("decode");
        assert!(resp.transfers.is_empty());
    }
}
