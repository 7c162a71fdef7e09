//! Token balances for one or more wallets.
//!
//! A single configured wallet uses the per-owner GET endpoint; two or more
//! switch to the multi-wallet POST endpoint.

use super::{fmt_num, plain_num, NO_DATA};
use crate::Command;
use vybot_api::{
    BalanceSummary, TokenBalanceEntry, TokenBalancesMultiQuery, TokenBalancesQuery, VybeClient,
    VybeError,
};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const SORT_KEYS: &[&str] = &["none", "value", "amount"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "wallets",
        label: "Wallet address",
        prompt: "Please enter a wallet address:",
        kind: FieldKind::TextList,
    },
    FieldSpec {
        key: "include_no_price",
        label: "Include no price balance",
        prompt: "",
        kind: FieldKind::Toggle { default: false },
    },
    FieldSpec {
        key: "only_verified",
        label: "Verified only",
        prompt: "",
        kind: FieldKind::Toggle { default: false },
    },
    FieldSpec {
        key: "trade_min",
        label: "Trade min",
        prompt: "Enter a minimum number of trades in the last day:",
        kind: FieldKind::Float {
            min: 0.0,
            default: 100.0,
        },
    },
    FieldSpec {
        key: "volume_min",
        label: "Volume min",
        prompt: "Enter a minimum trade volume in the last day:",
        kind: FieldKind::Float {
            min: 0.0,
            default: 100_000.0,
        },
    },
    FieldSpec {
        key: "holder_min",
        label: "Holders min",
        prompt: "Enter a minimum holder count:",
        kind: FieldKind::Float {
            min: 0.0,
            default: 50.0,
        },
    },
    FieldSpec {
        key: "min_value",
        label: "Min value",
        prompt: "Enter a minimum asset value in USD:",
        kind: FieldKind::Float {
            min: 0.0,
            default: 0.0,
        },
    },
    FieldSpec {
        key: "max_value",
        label: "Max value",
        prompt: "Enter a maximum asset value in USD (empty message removes the limit):",
        kind: FieldKind::OptFloat { min: 0.0 },
    },
    FieldSpec {
        key: "limit",
        label: "Limit",
        prompt: "Enter a new limit (1-1000):",
        kind: FieldKind::Int {
            min: 1,
            max: 1000,
            default: 100,
        },
    },
    FieldSpec {
        key: "page",
        label: "Page",
        prompt: "Enter a page number (0-1000):",
        kind: FieldKind::Int {
            min: 0,
            max: 1000,
            default: 0,
        },
    },
    FieldSpec {
        key: "sort_by",
        label: "Sort",
        prompt: "",
        kind: FieldKind::Cycle {
            values: SORT_KEYS,
            default: "none",
        },
    },
    FieldSpec {
        key: "sort_order",
        label: "Order",
        prompt: "",
        kind: FieldKind::Order {
            default: vybot_api::SortOrder::Desc,
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "wallets",
            label: "Add wallet address",
        },
        ButtonSpec::Clear {
            field: "wallets",
            label: "Clear wallets",
        },
    ],
    &[
        ButtonSpec::Toggle {
            field: "include_no_price",
            label: "Include no price balance",
        },
        ButtonSpec::Toggle {
            field: "only_verified",
            label: "Verified only",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "trade_min",
            label: "Trade min",
        },
        ButtonSpec::Edit {
            field: "volume_min",
            label: "Volume min",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "holder_min",
            label: "Holders min",
        },
        ButtonSpec::Edit {
            field: "min_value",
            label: "Min value",
        },
    ],
    &[ButtonSpec::Edit {
        field: "max_value",
        label: "Max value",
    }],
    &[
        ButtonSpec::Edit {
            field: "limit",
            label: "Limit",
        },
        ButtonSpec::Edit {
            field: "page",
            label: "Page",
        },
    ],
    &[
        ButtonSpec::Cycle {
            field: "sort_by",
            label: "Sort",
        },
        ButtonSpec::Order {
            field: "sort_order",
            label: "Order",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_balances",
    command: "balances",
    description: "Token balances for one or more wallets",
    title: "Token Balances",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenBalances;

fn filters(state: &ConfigState) -> TokenBalancesQuery {
    let sort = match state.choice("sort_by") {
        "" | "none" => None,
        key => Some((key.to_string(), state.order("sort_order"))),
    };
    TokenBalancesQuery {
        owner: String::new(),
        include_no_price_balance: state.bool_value("include_no_price"),
        only_verified: state.bool_value("only_verified"),
        sort,
        one_day_trade_minimum: state.float_value("trade_min") as i64,
        one_day_trade_volume_minimum: state.float_value("volume_min") as i64,
        holder_minimum: state.float_value("holder_min") as i64,
        min_asset_value: plain_num(state.float_value("min_value")),
        max_asset_value: state.opt_float("max_value").map(plain_num).unwrap_or_default(),
        limit: state.int_value("limit"),
        page: state.int_value("page"),
    }
}

fn summary_block(summary: &BalanceSummary) -> String {
    format!(
        "• Total Value: <code>${}</code>\n\
         • 24h Change: <code>{}%</code>\n\
         • Total Tokens: <code>{}</code>\n\
         • Staked SOL: <code>{} SOL</code>\n\
         • Staked Value: <code>${}</code>\n\
         • Active Staked SOL: <code>{} SOL</code>\n\
         • Active Staked Value: <code>${}</code>\n",
        fmt_num(&summary.total_token_value_usd, 2),
        fmt_num(&summary.total_token_value_usd_1d_change, 2),
        summary.total_token_count,
        fmt_num(&summary.staked_sol_balance, 4),
        fmt_num(&summary.staked_sol_balance_usd, 2),
        fmt_num(&summary.active_staked_sol_balance, 4),
        fmt_num(&summary.active_staked_sol_balance_usd, 2),
    )
}

fn token_block(token: &TokenBalanceEntry) -> String {
    format!(
        "\n<b>{}</b>\n<code>{}</code>\n\
         • Amount: <code>{}</code>\n\
         • Value: <code>${}</code>\n\
         • Price: <code>${}</code>\n\
         • 24h Change: <code>{}%</code>\n\
         • 7d Trend: <code>{}%</code>\n\
         • Value Change: <code>{}%</code>\n\
         • Verified: <code>{}</code>\n",
        token.symbol.as_deref().unwrap_or("Unknown"),
        token.mint_address,
        fmt_num(&token.amount, token.decimals as usize),
        fmt_num(&token.value_usd, 2),
        fmt_num(&token.price_usd, 6),
        fmt_num(&token.price_usd_1d_change, 2),
        fmt_num(&token.price_usd_7d_trend, 2),
        fmt_num(&token.value_usd_1d_change, 2),
        if token.verified { "Yes" } else { "No" },
    )
}

pub fn render_single(resp: &vybot_api::TokenBalancesResponse) -> String {
    if resp.data.is_empty() {
        return NO_DATA.to_string();
    }
    let mut text = format!(
        "<u>Token Balances</u>\n\n<code>{}</code>\n\n<b>Summary:</b>\n",
        resp.owner_address
    );
    text.push_str(&summary_block(&resp.summary));
    text.push_str("\n<b>Token List:</b>\n");
    for token in &resp.data {
        text.push_str(&token_block(token));
    }
    text
}

pub fn render_multi(resp: &vybot_api::TokenBalancesMultiResponse) -> String {
    if resp.data.is_empty() {
        return NO_DATA.to_string();
    }
    let mut text = format!(
        "<u>Token Balances</u>\n\n<code>{}</code>\n\n<b>Summary:</b>\n",
        resp.owner_addresses.join(", ")
    );
    text.push_str(&summary_block(&resp.summary));
    text.push_str("\n<b>Token List:</b>\n");
    for token in &resp.data {
        text.push_str(&token_block(token));
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenBalances {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.list("wallets").is_empty() {
            Some("Please set a wallet address first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let wallets = state.list("wallets");
        if wallets.len() == 1 {
            let mut query = filters(state);
            query.owner = wallets[0].clone();
            let resp = client.token_balances(&query).await?;
            Ok(render_single(&resp))
        } else {
            let query = TokenBalancesMultiQuery {
                wallets: wallets.to_vec(),
                filters: filters(state),
            };
            let resp = client.token_balances_multi(&query).await?;
            Ok(render_multi(&resp))
        }
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch token balances. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(state: &mut ConfigState, key: &str, value: &str) {
        state
            .set_from_text(SPEC.field(key).expect("field"), value)
            .expect("set");
    }

    #[test]
    fn default_filters_match_scenario_one() {
        let mut state = ConfigState::new(&SPEC);
        set(&mut state, "wallets", "ABC123");
        let mut query = filters(&state);
        query.owner = state.list("wallets")[0].clone();

        let pairs = query.query_pairs();
        let find = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());
        assert_eq!(find("limit").as_deref(), Some("100"));
        assert!(find("sortByAsc").is_none());
        assert!(find("sortByDesc").is_none());
        assert!(find("includeNoPriceBalance").is_none());
    }

    #[test]
    fn sort_cycle_maps_into_query() {
        let mut state = ConfigState::new(&SPEC);
        let sort_by = SPEC.field("sort_by").expect("field");
        state.cycle(sort_by); // none -> value
        let query = filters(&state);
        assert_eq!(query.sort, Some(("value".to_string(), vybot_api::SortOrder::Desc)));

        state.flip_order(SPEC.field("sort_order").expect("field"));
        let query = filters(&state);
        assert_eq!(query.sort, Some(("value".to_string(), vybot_api::SortOrder::Asc)));
    }

    #[test]
    fn empty_result_renders_no_data() {
        let resp = vybot_api::TokenBalancesResponse::default();
        assert_eq!(render_single(&resp), NO_DATA);
    }

    #[test]
    fn renderer_handles_missing_symbol() {
        let resp: vybot_api::TokenBalancesResponse = serde_json::from_str(
            r#"{"ownerAddress": "W", "totalTokenValueUsd": "10",
                "totalTokenValueUsd1dChange": "1", "totalTokenCount": 1,
                "stakedSolBalance": "0", "stakedSolBalanceUsd": "0",
                "activeStakedSolBalance": "0", "activeStakedSolBalanceUsd": "0",
                "data": [{"mintAddress": "M", "amount": "2", "decimals": 2,
                          "valueUsd": "10", "priceUsd": "5",
                          "priceUsd1dChange": "0", "priceUsd7dTrend": "0",
                          "valueUsd1dChange": "0", "verified": false}]}"#,
        )
        .expect("decode");
        let text = render_single(&resp);
        assert!(text.contains("<b>Unknown</b>"));
        assert!(text.contains("Amount: <code>2.00</code>"));
        assert!(text.contains("Verified: <code>No</code>"));
    }
}
