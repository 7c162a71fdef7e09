//! Labeled accounts belonging to a program.

use crate::Command;
use vybot_api::{KnownAccountsQuery, KnownAccountsResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "program_id",
        label: "Program",
        prompt: "Please enter a program address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "name",
        label: "Account name",
        prompt: "Please enter an account name:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "entity_name",
        label: "Entity name",
        prompt: "Please enter an entity name:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "entity_id",
        label: "Entity ID",
        prompt: "Please enter an entity ID:",
        kind: FieldKind::Text,
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "program_id",
            label: "Edit program address",
        },
        ButtonSpec::Edit {
            field: "name",
            label: "Account name",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "entity_name",
            label: "Entity name",
        },
        ButtonSpec::Edit {
            field: "entity_id",
            label: "Entity ID",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "known_accounts",
    command: "knownaccounts",
    description: "Labeled accounts of a program",
    title: "Known Program Accounts",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct KnownAccounts;

pub fn render(program_id: &str, resp: &KnownAccountsResponse) -> String {
    let mut text = format!(
        "<u>Known Program Accounts</u>\n\nProgram: <code>{}</code>\n\n",
        program_id
    );
    if resp.accounts.is_empty() {
        text.push_str("No known accounts found for this program.");
        return text;
    }
    for account in &resp.accounts {
        text.push_str(&format!(
            "• <b>{}</b>\n<code>{}</code>\n",
            account.name, account.address
        ));
        if let Some(description) = &account.description {
            text.push_str(&format!("{}\n", description));
        }
        text.push('\n');
    }
    text
}

#[async_trait::async_trait]
impl Command for KnownAccounts {
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
        let query = KnownAccountsQuery {
            program_id: Some(program_id.clone()),
            name: state.text("name").map(str::to_string),
            labels: Vec::new(),
            entity_name: state.text("entity_name").map(str::to_string),
            entity_id: state.text("entity_id").map(str::to_string),
            sort_by: None,
        };
        let resp = client.known_accounts(&query).await?;
        Ok(render(&program_id, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch known accounts. Please check the program address and try again."
    }
}
