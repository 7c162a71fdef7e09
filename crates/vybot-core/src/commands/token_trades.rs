//! Recent trades for a token against wrapped SOL.

use super::format_datetime;
use crate::Command;
use vybot_api::{TokenTradesQuery, TokenTradesResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const RESOLUTIONS: &[&str] = &["none", "1h", "1d", "1w", "1m", "1y"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "token",
        label: "Token",
        prompt: "Please enter a token address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "resolution",
        label: "Resolution",
        prompt: "",
        kind: FieldKind::Cycle {
            values: RESOLUTIONS,
            default: "none",
        },
    },
    FieldSpec {
        key: "platform",
        label: "Platform",
        prompt: "Please enter a platform address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "market",
        label: "Market",
        prompt: "Please enter a market ID:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "authority",
        label: "Authority",
        prompt: "Please enter an authority address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "fee_payer",
        label: "Fee payer",
        prompt: "Please enter a fee payer address:",
        kind: FieldKind::Text,
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "token",
            label: "Edit token address",
        },
        ButtonSpec::Cycle {
            field: "resolution",
            label: "Resolution",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "platform",
            label: "Platform",
        },
        ButtonSpec::Edit {
            field: "market",
            label: "Market",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "authority",
            label: "Authority",
        },
        ButtonSpec::Edit {
            field: "fee_payer",
            label: "Fee payer",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_trades",
    command: "trades",
    description: "Recent trades for a token",
    title: "Token Trades",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenTrades;

pub fn render(token: &str, resolution: &str, resp: &TokenTradesResponse) -> String {
    let mut text = format!(
        "<u>Token Trades</u>\n\nToken: <code>{}</code>\nResolution: {}\n\n",
        token, resolution
    );
    if resp.data.is_empty() {
        text.push_str("No trades found for the specified parameters.");
        return text;
    }
    text.push_str("<b>Recent Trades:</b>\n\n");
    for trade in &resp.data {
        let price: f64 = trade.price.parse().unwrap_or(0.0);
        let quote: f64 = trade.quote_size.parse().unwrap_or(0.0);
        let sol_price = if price != 0.0 { 1.0 / price } else { 0.0 };
        text.push_str(&format!(
            "💱 <b>Trade</b> at {}\n\
             • Price: <code>{}</code> SOL\n\
             • Amount: <code>{}</code>\n\
             • Total: <code>{}</code> SOL\n",
            format_datetime(trade.block_time),
            sol_price,
            trade.quote_size,
            quote * sol_price,
        ));
        if let Some(signature) = &trade.signature {
            text.push_str(&format!(
                "• <a href=\"https://solscan.io/tx/{}\">View on Solscan</a>\n",
                signature
            ));
        }
        text.push('\n');
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenTrades {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.text("token").is_none() {
            Some("Please set a token address first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let resolution = state.choice("resolution");
        let query = TokenTradesQuery {
            token: state.text("token").unwrap_or_default().to_string(),
            program_id: state.text("platform").map(str::to_string),
            market_id: state.text("market").map(str::to_string),
            authority: state.text("authority").map(str::to_string),
            resolution: (resolution != "none").then(|| resolution.to_string()),
            fee_payer: state.text("fee_payer").map(str::to_string),
        };
        let resp = client.token_trades(&query).await?;
        Ok(render(&query.token, resolution, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch trades. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_lines_include_inverted_price() {
        let resp: TokenTradesResponse = serde_json::from_str(
            r#"{"data": [{"blockTime": 1700000000, "price": "4",
                 "quoteSize": "8", "signature": "sig1"}]}"#,
        )
        .expect("decode");
        let text = render("MINT", "none", &resp);
        assert!(text.contains("Price: <code>0.25</code> SOL"));
        assert!(text.contains("Total: <code>2</code> SOL"));
        assert!(text.contains("solscan.io/tx/sig1"));
    }

    #[test]
    fn empty_trades() {
        let text = render("MINT", "1d", &TokenTradesResponse::default());
        assert!(text.contains("No trades found"));
    }
}
