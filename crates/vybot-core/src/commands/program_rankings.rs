//! Program ranking leaderboard.

use crate::Command;
use vybot_api::{ProgramRankingQuery, ProgramRankingResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const INTERVALS: &[&str] = &["1d", "7d", "30d"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "interval",
        label: "Interval",
        prompt: "",
        kind: FieldKind::Cycle {
            values: INTERVALS,
            default: "1d",
        },
    },
    FieldSpec {
        key: "limit",
        label: "Programs shown",
        prompt: "Enter a new limit (1-100):",
        kind: FieldKind::Int {
            min: 1,
            max: 100,
            default: 10,
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Cycle {
            field: "interval",
            label: "Interval",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Programs shown",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_rankings",
    command: "rankings",
    description: "Program ranking leaderboard",
    title: "Program Rankings",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramRankings;

pub fn render(interval: &str, limit: usize, resp: &ProgramRankingResponse) -> String {
    let mut text = format!("<u>Program Rankings</u>\n\nInterval: {}\n\n", interval);
    if resp.data.is_empty() {
        text.push_str("No ranking data available.");
        return text;
    }
    for (index, entry) in resp.data.iter().take(limit).enumerate() {
        text.push_str(&format!(
            "{}. <b>{}</b>\n<code>{}</code>\nScore: <code>{:.2}</code>\n\n",
            index + 1,
            entry.program_name.as_deref().unwrap_or("Unknown"),
            entry.program_id,
            entry.score,
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for ProgramRankings {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, _state: &ConfigState) -> Option<&'static str> {
        None
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let interval = state.choice("interval");
        let query = ProgramRankingQuery {
            interval: Some(interval.to_string()),
            date: None,
        };
        let resp = client.program_ranking(&query).await?;
        Ok(render(interval, state.int_value("limit") as usize, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch program rankings. Please try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vybot_wizard::{ConfigState, InputError};

    #[test]
    fn limit_rejects_values_above_one_hundred() {
        let mut state = ConfigState::new(&SPEC);
        let limit = SPEC.field("limit").expect("field");
        let err = state.set_from_text(limit, "101").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter a valid number between 1 and 100"
        );
        assert!(matches!(err, InputError::OutOfRange { min: 1, max: 100 }));
    }

    #[test]
    fn unnamed_programs_render_as_unknown() {
        let resp: ProgramRankingResponse = serde_json::from_str(
            r#"{"data": [
                {"programId": "PROG1", "score": 98.7},
                {"programName": "Jupiter", "programId": "PROG2", "score": 95.0}
            ]}"#,
        )
        .expect("decode");
        let text = render("1d", 10, &resp);
        assert!(text.contains("<b>Unknown</b>"));
        assert!(text.contains("<b>Jupiter</b>"));
        assert!(text.contains("Score: <code>98.70</code>"));
    }

    #[test]
    fn empty_rankings() {
        let text = render("7d", 10, &ProgramRankingResponse::default());
        assert!(text.contains("No ranking data available."));
    }
}
