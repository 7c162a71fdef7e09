//! Total-value-locked history for a program.

use super::format_date;
use crate::Command;
use vybot_api::{ProgramTvlResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const RESOLUTIONS: &[&str] = &["1d", "7d", "30d", "90d", "180d", "365d"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "program_id",
        label: "Program",
        prompt: "Please enter a program address:",
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
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "program_id",
            label: "Edit program address",
        },
        ButtonSpec::Cycle {
            field: "resolution",
            label: "Resolution",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_tvl",
    command: "tvl",
    description: "TVL history for a program",
    title: "Program TVL",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramTvl;

pub fn render(program_id: &str, resolution: &str, resp: &ProgramTvlResponse) -> String {
    let mut text = format!(
        "<u>Program TVL</u>\n\nProgram: <code>{}</code>\nResolution: {}\n\n",
        program_id, resolution
    );
    if resp.data.is_empty() {
        text.push_str("No TVL data available for this program.");
        return text;
    }
    text.push_str("<b>TVL History:</b>\n");
    for point in &resp.data {
        text.push_str(&format!(
            "• {}: <code>{:.2} SOL</code>\n",
            format_date(point.timestamp),
            point.tvl,
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for ProgramTvl {
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
        let resolution = state.choice("resolution");
        let resp = client.program_tvl(&program_id, resolution).await?;
        Ok(render(&program_id, resolution, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch TVL data. Please check the program address and try again."
    }
}
