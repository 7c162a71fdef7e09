//! Browse the program directory by category.

use crate::Command;
use vybot_api::{ProgramsQuery, ProgramsResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "category",
        label: "Category",
        prompt: "Please enter a category (e.g. DEX, NFT):",
        kind: FieldKind::Text,
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
        ButtonSpec::Edit {
            field: "category",
            label: "Category",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Programs shown",
        },
    ],
    &[
        ButtonSpec::Clear {
            field: "category",
            label: "Clear category",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_list",
    command: "programs",
    description: "Browse the program directory",
    title: "Programs",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramList;

pub fn render(limit: usize, resp: &ProgramsResponse) -> String {
    let mut text = String::from("<u>Programs</u>\n\n");
    if resp.data.is_empty() {
        text.push_str("No programs found matching the criteria.");
        return text;
    }
    for entry in resp.data.iter().take(limit) {
        let name = entry
            .friendly_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&entry.program_id);
        text.push_str(&format!("• <b>{}</b>\n<code>{}</code>\n", name, entry.program_id));
        if let Some(description) = &entry.program_description {
            text.push_str(&format!("{}\n", description));
        }
        if !entry.labels.is_empty() {
            text.push_str(&format!("Labels: {}\n", entry.labels.join(", ")));
        }
        text.push_str(&format!("Daily Users: <code>{}</code>\n\n", entry.dau));
    }
    text
}

#[async_trait::async_trait]
impl Command for ProgramList {
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
        let query = ProgramsQuery {
            labels: state
                .text("category")
                .map(|c| vec![c.to_string()])
                .unwrap_or_default(),
            sort_by: None,
        };
        let resp = client.programs_list(&query).await?;
        Ok(render(state.int_value("limit") as usize, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch programs. Please try again."
    }
}
