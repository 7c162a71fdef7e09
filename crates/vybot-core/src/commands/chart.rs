//! OHLCV lookup for a token, rendered as a text summary.

use super::{format_datetime, NO_DATA};
use crate::Command;
use vybot_api::{OhlcvQuery, OhlcvResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

pub const RESOLUTIONS: &[&str] = &[
    "15m", "30m", "1h", "2h", "3h", "4h", "1d", "1w", "1mo", "1y",
];

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
            default: "1d",
        },
    },
    FieldSpec {
        key: "time_start",
        label: "Start time",
        prompt: "Please enter a Unix timestamp (empty message clears it):",
        kind: FieldKind::Timestamp,
    },
    FieldSpec {
        key: "time_end",
        label: "End time",
        prompt: "Please enter a Unix timestamp (empty message clears it):",
        kind: FieldKind::Timestamp,
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
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[ButtonSpec::Edit {
        field: "token",
        label: "Edit token address",
    }],
    &[
        ButtonSpec::Cycle {
            field: "resolution",
            label: "Resolution",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Limit",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "time_start",
            label: "Set start time",
        },
        ButtonSpec::Edit {
            field: "time_end",
            label: "Set end time",
        },
    ],
    &[ButtonSpec::Search {
        label: "🔍 Fetch OHLCV",
    }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "chart",
    command: "chart",
    description: "OHLCV price summary for a token",
    title: "Price Chart",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct Chart;

fn num(raw: &str) -> f64 {
    raw.parse().unwrap_or(0.0)
}

pub fn render(token: &str, resolution: &str, resp: &OhlcvResponse) -> String {
    if resp.data.is_empty() {
        return NO_DATA.to_string();
    }
    let first = &resp.data[0];
    let last = &resp.data[resp.data.len() - 1];
    let high = resp
        .data
        .iter()
        .map(|c| num(&c.high))
        .fold(f64::MIN, f64::max);
    let low = resp
        .data
        .iter()
        .map(|c| num(&c.low))
        .fold(f64::MAX, f64::min);
    let volume: f64 = resp.data.iter().map(|c| num(&c.volume)).sum();
    let open = num(&first.open);
    let close = num(&last.close);
    let change = if open != 0.0 {
        (close - open) / open * 100.0
    } else {
        0.0
    };

    format!(
        "<u>Price Chart</u>\n\nToken: <code>{}</code>\nResolution: {}\n\
         Candles: <code>{}</code>\n\n\
         Start ({}): <code>${:.6}</code>\n\
         End ({}): <code>${:.6}</code>\n\
         High: <code>${:.6}</code>\nLow: <code>${:.6}</code>\n\
         Volume: <code>${:.2}</code>\n\n\
         <b>Change:</b> <code>{}{:.2}%</code>",
        token,
        resolution,
        resp.data.len(),
        format_datetime(first.time),
        open,
        format_datetime(last.time),
        close,
        high,
        low,
        volume,
        if change >= 0.0 { "+" } else { "" },
        change,
    )
}

#[async_trait::async_trait]
impl Command for Chart {
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
        let query = OhlcvQuery {
            mint: state.text("token").unwrap_or_default().to_string(),
            resolution: Some(state.choice("resolution").to_string()),
            time_start: state.opt_time("time_start"),
            time_end: state.opt_time("time_end"),
            limit: Some(state.int_value("limit")),
        };
        let resp = client.token_ohlcv(&query).await?;
        Ok(render(&query.mint, state.choice("resolution"), &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch chart data. Please check the token and parameters."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_wraps_from_last_to_first() {
        use vybot_wizard::cycle_next;
        assert_eq!(cycle_next(RESOLUTIONS, "1y"), "15m");
    }

    #[test]
    fn summary_computes_range_and_change() {
        let resp: OhlcvResponse = serde_json::from_str(
            r#"{"data": [
                {"time": 1700000000, "open": "1.0", "high": "1.5",
                 "low": "0.9", "close": "1.2", "volume": "100"},
                {"time": 1700086400, "open": "1.2", "high": "2.0",
                 "low": "1.1", "close": "1.5", "volume": "200"}
            ]}"#,
        )
        .expect("decode");
        let text = render("MINT", "1d", &resp);
        assert!(text.contains("Candles: <code>2</code>"));
        assert!(text.contains("High: <code>$2.000000</code>"));
        assert!(text.contains("Low: <code>$0.900000</code>"));
        assert!(text.contains("Change:</b> <code>+50.00%</code>"));
    }

    #[test]
    fn empty_series_renders_no_data() {
        assert_eq!(render("MINT", "1d", &OhlcvResponse::default()), NO_DATA);
    }
}
