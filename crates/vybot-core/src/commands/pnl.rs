//! Realized/unrealized PnL summary for a wallet.

use crate::Command;
use vybot_api::{PnlQuery, PnlResponse, SortOrder, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const RESOLUTIONS: &[&str] = &["1d", "7d", "30d"];
const SORT_KEYS: &[&str] = &["none", "realizedPnlUsd", "unrealizedPnlUsd"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "wallet",
        label: "Wallet address",
        prompt: "Please enter a wallet address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "resolution",
        label: "Resolution",
        prompt: "",
        kind: FieldKind::Cycle {
            values: RESOLUTIONS,
            default: "1d",
        },
    },
    FieldSpec {
        key: "token",
        label: "Token filter",
        prompt: "Please enter a token address (empty message clears the filter):",
        kind: FieldKind::Text,
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
            default: SortOrder::Desc,
        },
    },
    FieldSpec {
        key: "limit",
        label: "Limit",
        prompt: "Enter a new limit (1-1000):",
        kind: FieldKind::Int {
            min: 1,
            max: 1000,
            default: 10,
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "wallet",
            label: "Edit wallet address",
        },
        ButtonSpec::Cycle {
            field: "resolution",
            label: "Resolution",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "token",
            label: "Token filter",
        },
        ButtonSpec::Clear {
            field: "token",
            label: "Clear token filter",
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
        ButtonSpec::Edit {
            field: "limit",
            label: "Limit",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "pnl",
    command: "pnl",
    description: "Trading PnL summary for a wallet",
    title: "Wallet PnL",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct Pnl;

pub fn render(resolution: &str, resp: &PnlResponse) -> String {
    let summary = &resp.summary;
    let mut text = format!(
        "<u>Wallet PnL</u>\n\nResolution: {}\n\n\
         <b>Win Rate:</b> <code>{:.2}%</code>\n\
         <b>Realized PnL:</b> <code>${:.2}</code>\n\
         <b>Unrealized PnL:</b> <code>${:.2}</code>\n\
         <b>Total Trades:</b> <code>{}</code>\n",
        resolution,
        summary.win_rate,
        summary.realized_pnl_usd,
        summary.unrealized_pnl_usd,
        summary.trades_count,
    );
    if let Some(best) = &summary.best_performing_token {
        text.push_str(&format!(
            "\n<b>Best Performing Token:</b> <code>{}</code> (${:.2})",
            best.token_symbol, best.pnl_usd
        ));
    }
    if let Some(worst) = &summary.worst_performing_token {
        text.push_str(&format!(
            "\n<b>Worst Performing Token:</b> <code>{}</code> (${:.2})",
            worst.token_symbol, worst.pnl_usd
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for Pnl {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.text("wallet").is_none() {
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
        let sort = match state.choice("sort_by") {
            "" | "none" => None,
            key => Some((key.to_string(), state.order("sort_order"))),
        };
        let query = PnlQuery {
            owner: state.text("wallet").unwrap_or_default().to_string(),
            resolution: state.choice("resolution").to_string(),
            token_address: state.text("token").map(str::to_string),
            sort,
            limit: state.int_value("limit"),
        };
        let resp = client.pnl(&query).await?;
        Ok(render(&query.resolution, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch PnL data. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_extreme_tokens() {
        let resp: PnlResponse = serde_json::from_str(
            r#"{"summary": {"winRate": 42.123, "realizedPnlUsd": 10.5,
                "unrealizedPnlUsd": -2.25, "tradesCount": 9}}"#,
        )
        .expect("decode");
        let text = render("7d", &resp);
        assert!(text.contains("Win Rate:</b> <code>42.12%</code>"));
        assert!(text.contains("Realized PnL:</b> <code>$10.50</code>"));
        assert!(!text.contains("Best Performing Token"));
    }

    #[test]
    fn resolution_cycle_covers_all_values() {
        use vybot_wizard::cycle_next;
        assert_eq!(cycle_next(RESOLUTIONS, "1d"), "7d");
        assert_eq!(cycle_next(RESOLUTIONS, "30d"), "1d");
    }
}
