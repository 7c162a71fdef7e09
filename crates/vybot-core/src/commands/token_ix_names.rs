//! Instruction-name lookup across programs.

use crate::Command;
use vybot_api::{InstructionNamesQuery, InstructionNamesResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "ix_name",
        label: "Instruction name",
        prompt: "Please enter an instruction name:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "calling_program",
        label: "Calling program",
        prompt: "Please enter a calling program address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "program_name",
        label: "Program name",
        prompt: "Please enter a program name:",
        kind: FieldKind::Text,
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "ix_name",
            label: "Instruction name",
        },
        ButtonSpec::Edit {
            field: "calling_program",
            label: "Calling program",
        },
    ],
    &[ButtonSpec::Edit {
        field: "program_name",
        label: "Program name",
    }],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_ix_names",
    command: "instructions",
    description: "Look up instruction names by program",
    title: "Token Instruction Names",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenIxNames;

fn query_from(state: &ConfigState) -> InstructionNamesQuery {
    InstructionNamesQuery {
        ix_name: state.text("ix_name").map(str::to_string),
        calling_program: state.text("calling_program").map(str::to_string),
        program_name: state.text("program_name").map(str::to_string),
    }
}

pub fn render(query: &InstructionNamesQuery, resp: &InstructionNamesResponse) -> String {
    let mut text = String::from("<u>Token Instruction Names</u>\n\n<b>Search Parameters:</b>\n");
    if let Some(v) = &query.ix_name {
        text.push_str(&format!("• Instruction Name: <code>{}</code>\n", v));
    }
    if let Some(v) = &query.calling_program {
        text.push_str(&format!("• Calling Program: <code>{}</code>\n", v));
    }
    if let Some(v) = &query.program_name {
        text.push_str(&format!("• Program Name: <code>{}</code>\n", v));
    }
    text.push('\n');
    if resp.data.is_empty() {
        text.push_str("No instruction names found for the specified parameters.");
        return text;
    }
    text.push_str("<b>Instructions:</b>\n\n");
    for ix in &resp.data {
        text.push_str(&format!(
            "• <code>{}</code> called on <code>{}</code>\n<code>{}</code>\n\n",
            ix.ix_name, ix.program_name, ix.calling_program
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenIxNames {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if query_from(state).is_empty() {
            Some("Please set at least one search parameter first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let query = query_from(state);
        let resp = client.instruction_names(&query).await?;
        Ok(render(&query, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch instruction names. Please check your inputs and try again."
    }
}
