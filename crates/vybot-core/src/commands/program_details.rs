//! Metadata for a single on-chain program.

use crate::Command;
use vybot_api::{ProgramDetailsResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[FieldSpec {
    key: "program_id",
    label: "Program",
    prompt: "Please enter a program address:",
    kind: FieldKind::Text,
}];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[ButtonSpec::Edit {
        field: "program_id",
        label: "Edit program address",
    }],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_details",
    command: "program",
    description: "Metadata for an on-chain program",
    title: "Program Details",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramDetails;

pub fn render(program_id: &str, resp: &ProgramDetailsResponse) -> String {
    let labels = if resp.labels.is_empty() {
        "N/A".to_string()
    } else {
        resp.labels.join(", ")
    };
    format!(
        "<u>Program Details</u>\n\n\
         Program: <code>{}</code>\n\n\
         • Name: <b>{}</b>\n\
         • Labels: {}\n\
         • About: {}\n\
         • Daily Transactions: <code>{}</code>",
        program_id,
        resp.name.as_deref().unwrap_or("N/A"),
        labels,
        resp.program_description.as_deref().unwrap_or("N/A"),
        resp.transactions_1d,
    )
}

#[async_trait::async_trait]
impl Command for ProgramDetails {
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
        let resp = client.program_details(&program_id).await?;
        Ok(render(&program_id, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch program details. Please check the program address and try again."
    }
}
