//! Transfer-volume or holder-count history for a token.

use super::{format_datetime, NO_DATA};
use crate::Command;
use vybot_api::{TokenSeries, TokenTimeseriesQuery, TokenTimeseriesResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const SERIES: &[&str] = &["transfer-volume", "holders-ts"];
const INTERVALS: &[&str] = &["day", "hour"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "token",
        label: "Token",
        prompt: "Please enter a token address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "series",
        label: "Series",
        prompt: "",
        kind: FieldKind::Cycle {
            values: SERIES,
            default: "transfer-volume",
        },
    },
    FieldSpec {
        key: "interval",
        label: "Interval",
        prompt: "",
        kind: FieldKind::Cycle {
            values: INTERVALS,
            default: "day",
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
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[ButtonSpec::Edit {
        field: "token",
        label: "Edit token address",
    }],
    &[
        ButtonSpec::Cycle {
            field: "series",
            label: "Series",
        },
        ButtonSpec::Cycle {
            field: "interval",
            label: "Interval",
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
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_timeseries",
    command: "tokents",
    description: "Transfer-volume or holder history for a token",
    title: "Token Timeseries",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenTimeseries;

pub fn render(token: &str, series: TokenSeries, resp: &TokenTimeseriesResponse) -> String {
    let mut text = format!(
        "<u>Token Timeseries</u>\n\nToken: <code>{}</code>\nSeries: {}\n\n",
        token,
        series.path_segment()
    );
    if resp.data.is_empty() {
        text.push_str(NO_DATA);
        return text;
    }
    let first = &resp.data[0];
    let last = &resp.data[resp.data.len() - 1];
    let (start_value, end_value, start_time, end_time, unit) = match series {
        TokenSeries::TransferVolume => (
            first.volume.unwrap_or(0.0),
            last.volume.unwrap_or(0.0),
            first.time_bucket_start.unwrap_or(0),
            last.time_bucket_start.unwrap_or(0),
            "volume",
        ),
        TokenSeries::Holders => (
            first.n_holders.unwrap_or(0) as f64,
            last.n_holders.unwrap_or(0) as f64,
            first.timestamp.unwrap_or(0),
            last.timestamp.unwrap_or(0),
            "holders",
        ),
    };
    text.push_str(&format!(
        "Start ({}): <code>{}</code> {}\nEnd ({}): <code>{}</code> {}\n\n",
        format_datetime(start_time),
        start_value,
        unit,
        format_datetime(end_time),
        end_value,
        unit,
    ));

    let difference = end_value - start_value;
    let percentage = if start_value != 0.0 {
        difference / start_value * 100.0
    } else {
        0.0
    };
    text.push_str(&format!(
        "<b>Change Summary:</b>\n\
         • Absolute change in {}: <code>{}{}</code>\n\
         • Percentage change: <code>{}{:.2}%</code>",
        unit,
        if difference >= 0.0 { "+" } else { "" },
        difference,
        if percentage >= 0.0 { "+" } else { "" },
        percentage,
    ));
    text
}

#[async_trait::async_trait]
impl Command for TokenTimeseries {
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
        let series = TokenSeries::from_key(state.choice("series"))
            .unwrap_or(TokenSeries::TransferVolume);
        let query = TokenTimeseriesQuery {
            mint: state.text("token").unwrap_or_default().to_string(),
            series,
            start_time: state.opt_time("time_start"),
            end_time: state.opt_time("time_end"),
            interval: Some(state.choice("interval").to_string()),
        };
        let resp = client.token_timeseries(&query).await?;
        Ok(render(&query.mint, series, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch timeseries data. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holders_series_reports_change() {
        let resp: TokenTimeseriesResponse = serde_json::from_str(
            r#"{"data": [
                {"timestamp": 1700000000, "nHolders": 100},
                {"timestamp": 1700086400, "nHolders": 150}
            ]}"#,
        )
        .expect("decode");
        let text = render("MINT", TokenSeries::Holders, &resp);
        assert!(text.contains("<code>100</code> holders"));
        assert!(text.contains("<code>150</code> holders"));
        assert!(text.contains("Absolute change in holders: <code>+50</code>"));
        assert!(text.contains("Percentage change: <code>+50.00%</code>"));
    }

    #[test]
    fn empty_series_renders_no_data() {
        let text = render("MINT", TokenSeries::TransferVolume, &TokenTimeseriesResponse::default());
        assert!(text.contains(NO_DATA));
    }
}
