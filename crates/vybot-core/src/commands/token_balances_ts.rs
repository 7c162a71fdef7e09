//! Token balance history for one or more wallets.
//!
//! Daily samples over a configurable window; one wallet uses the per-owner
//! GET endpoint, two or more switch to the multi-wallet POST endpoint.

use super::{fmt_num, format_date, plain_num, NO_DATA};
use crate::Command;
use vybot_api::{
    TokenBalanceTsPoint, TokenBalancesTsMultiQuery, TokenBalancesTsQuery, VybeClient, VybeError,
};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "wallets",
        label: "Wallet address",
        prompt: "Please enter a wallet address:",
        kind: FieldKind::TextList,
    },
    FieldSpec {
        key: "days",
        label: "Days",
        prompt: "Enter number of days (1-30):",
        kind: FieldKind::Int {
            min: 1,
            max: 30,
            default: 14,
        },
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
        ButtonSpec::Edit {
            field: "days",
            label: "Days",
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
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_balances_ts",
    command: "tstokens",
    description: "Token balance history for one or more wallets",
    title: "Token Balance Time Series",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenBalancesTs;

fn filters(state: &ConfigState) -> TokenBalancesTsQuery {
    TokenBalancesTsQuery {
        owner: String::new(),
        days: state.int_value("days"),
        only_verified: state.bool_value("only_verified"),
        one_day_trade_minimum: state.float_value("trade_min") as i64,
        one_day_trade_volume_minimum: state.float_value("volume_min") as i64,
        holder_minimum: state.float_value("holder_min") as i64,
        min_asset_value: plain_num(state.float_value("min_value")),
        max_asset_value: state.opt_float("max_value").map(plain_num).unwrap_or_default(),
    }
}

fn change(latest: &str, oldest: &str) -> String {
    let diff = latest.parse::<f64>().unwrap_or(0.0) - oldest.parse::<f64>().unwrap_or(0.0);
    format!("{:.2}", diff)
}

pub fn render(owners: &str, data: &[TokenBalanceTsPoint]) -> String {
    let (oldest, latest) = match (data.first(), data.last()) {
        (Some(oldest), Some(latest)) => (oldest, latest),
        _ => return NO_DATA.to_string(),
    };
    format!(
        "<u>Token Balance Time Series</u>\n\n<code>{}</code>\n\n\
         <b>Latest Values:</b>\n\
         • Total Value: <code>${}</code>\n\
         • Staked SOL: <code>{} SOL</code>\n\
         • Staked Value: <code>${}</code>\n\
         • System SOL: <code>${}</code>\n\n\
         <b>Time Range:</b>\n\
         • From: {}\n\
         • To: {}\n\n\
         <b>Value Changes:</b>\n\
         • Token Value: <code>${}</code>\n\
         • Staked Value: <code>${}</code>\n\
         • System Value: <code>${}</code>\n",
        owners,
        fmt_num(&latest.token_value, 2),
        fmt_num(&latest.stake_value_sol, 4),
        fmt_num(&latest.stake_value, 2),
        fmt_num(&latest.system_value, 2),
        format_date(oldest.block_time),
        format_date(latest.block_time),
        change(&latest.token_value, &oldest.token_value),
        change(&latest.stake_value, &oldest.stake_value),
        change(&latest.system_value, &oldest.system_value),
    )
}

#[async_trait::async_trait]
impl Command for TokenBalancesTs {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.list("wallets").is_empty() {
            Some("Please add at least one wallet address first!")
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
            let resp = client.token_balances_ts(&query).await?;
            Ok(render(&resp.owner_address, &resp.data))
        } else {
            let query = TokenBalancesTsMultiQuery {
                wallets: wallets.to_vec(),
                filters: filters(state),
            };
            let resp = client.token_balances_ts_multi(&query).await?;
            Ok(render(&resp.owner_addresses.join(", "), &resp.data))
        }
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch token balance history. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vybot_wizard::InputError;

    #[test]
    fn default_filters_cover_a_two_week_window() {
        let state = ConfigState::new(&SPEC);
        let query = filters(&state);
        assert_eq!(query.days, 14);
        assert!(!query.only_verified);
        assert_eq!(query.min_asset_value, "0");
        assert_eq!(query.max_asset_value, "");
    }

    #[test]
    fn days_rejects_values_above_thirty() {
        let mut state = ConfigState::new(&SPEC);
        let days = SPEC.field("days").expect("field");
        let err = state.set_from_text(days, "31").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid number between 1 and 30");
        assert!(matches!(err, InputError::OutOfRange { min: 1, max: 30 }));
        assert_eq!(state.int_value("days"), 14);
    }

    #[test]
    fn render_reports_range_and_value_changes() {
        let resp: vybot_api::TokenBalancesTsResponse = serde_json::from_str(
            r#"{"ownerAddress": "W",
                "data": [
                    {"blockTime": 1700000000, "tokenValue": "100.5",
                     "stakeValue": "10", "stakeValueSol": "0.25",
                     "systemValue": "5"},
                    {"blockTime": 1700086400, "tokenValue": "150.25",
                     "stakeValue": "12", "stakeValueSol": "0.30",
                     "systemValue": "4"}
                ]}"#,
        )
        .expect("decode");
        let text = render(&resp.owner_address, &resp.data);
        assert!(text.contains("Total Value: <code>$150.25</code>"));
        assert!(text.contains("Staked SOL: <code>0.3000 SOL</code>"));
        assert!(text.contains("From: 2023-11-14"));
        assert!(text.contains("Token Value: <code>$49.75</code>"));
        assert!(text.contains("System Value: <code>$-1.00</code>"));
    }

    #[test]
    fn empty_history_renders_no_data() {
        assert_eq!(render("W", &[]), NO_DATA);
    }
}
