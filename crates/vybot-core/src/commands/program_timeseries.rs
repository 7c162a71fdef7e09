//! Instruction, transaction, or active-user history for a program.

use super::format_date;
use crate::Command;
use vybot_api::{ProgramMetric, ProgramSeriesResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const METRICS: &[&str] = &["instructions", "transactions", "active-users"];
const RANGES: &[&str] = &["1d", "7d", "30d"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "program_id",
        label: "Program",
        prompt: "Please enter a program address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "metric",
        label: "Metric",
        prompt: "",
        kind: FieldKind::Cycle {
            values: METRICS,
            default: "instructions",
        },
    },
    FieldSpec {
        key: "range",
        label: "Range",
        prompt: "",
        kind: FieldKind::Cycle {
            values: RANGES,
            default: "7d",
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[ButtonSpec::Edit {
        field: "program_id",
        label: "Edit program address",
    }],
    &[
        ButtonSpec::Cycle {
            field: "metric",
            label: "Metric",
        },
        ButtonSpec::Cycle {
            field: "range",
            label: "Range",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_timeseries",
    command: "programts",
    description: "Usage history for a program",
    title: "Program Timeseries",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramTimeseries;

fn metric_from(choice: &str) -> ProgramMetric {
    match choice {
        "transactions" => ProgramMetric::TransactionsCount,
        "active-users" => ProgramMetric::ActiveUsers,
        _ => ProgramMetric::InstructionsCount,
    }
}

pub fn render(
    program_id: &str,
    metric: ProgramMetric,
    range: &str,
    resp: &ProgramSeriesResponse,
) -> String {
    let mut text = format!(
        "<u>Program Timeseries</u>\n\nProgram: <code>{}</code>\n\
         Metric: {}\nRange: {}\n\n",
        program_id,
        metric.unit_name(),
        range
    );
    if resp.data.is_empty() {
        text.push_str("No data available for this period.");
        return text;
    }
    let first = &resp.data[0];
    let mid = &resp.data[resp.data.len() / 2];
    let last = &resp.data[resp.data.len() - 1];
    text.push_str(&format!(
        "• {}: <code>{}</code>\n• {}: <code>{}</code>\n• {}: <code>{}</code>\n\n",
        format_date(first.block_time),
        first.value(),
        format_date(mid.block_time),
        mid.value(),
        format_date(last.block_time),
        last.value(),
    ));
    let start = first.value() as f64;
    let end = last.value() as f64;
    let percentage = if start != 0.0 {
        (end - start) / start * 100.0
    } else {
        0.0
    };
    text.push_str(&format!(
        "Trend: <code>{}{:.2}%</code> over the period",
        if percentage >= 0.0 { "+" } else { "" },
        percentage,
    ));
    text
}

#[async_trait::async_trait]
impl Command for ProgramTimeseries {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.text("program_id").is_none() {
            Some("Please set a program address first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let program_id = state.text("program_id").unwrap_or_default().to_string();
        let metric = metric_from(state.choice("metric"));
        let range = state.choice("range");
        let resp = client.program_series(&program_id, metric, range).await?;
        Ok(render(&program_id, metric, range, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch timeseries data. Please check the program address and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_choices_map() {
        assert!(matches!(
            metric_from("instructions"),
            ProgramMetric::InstructionsCount
        ));
        assert!(matches!(
            metric_from("active-users"),
            ProgramMetric::ActiveUsers
        ));
    }

    #[test]
    fn trend_is_computed_from_endpoints() {
        let resp: ProgramSeriesResponse = serde_json::from_str(
            r#"{"data": [
                {"blockTime": 1700000000, "transactionsCount": 100},
                {"blockTime": 1700086400, "transactionsCount": 150},
                {"blockTime": 1700172800, "transactionsCount": 200}
            ]}"#,
        )
        .expect("decode");
        let text = render("PROG", ProgramMetric::TransactionsCount, "7d", &resp);
        assert!(text.contains("<code>100</code>"));
        assert!(text.contains("<code>150</code>"));
        assert!(text.contains("<code>200</code>"));
        assert!(text.contains("Trend: <code>+100.00%</code>"));
    }

    #[test]
    fn empty_period() {
        let text = render(
            "PROG",
            ProgramMetric::ActiveUsers,
            "1d",
            &ProgramSeriesResponse::default(),
        );
        assert!(text.contains("No data available for this period."));
    }
}
