//! Most active wallets of a program over a recent window.

use super::short_address;
use crate::Command;
use vybot_api::{ProgramActiveUsersResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const DAYS: &[&str] = &["1d", "3d", "7d", "14d", "21d", "30d"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "program_id",
        label: "Program",
        prompt: "Please enter a program address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "days",
        label: "Window",
        prompt: "",
        kind: FieldKind::Cycle {
            values: DAYS,
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
            field: "days",
            label: "Window",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "program_active_users",
    command: "activeusers",
    description: "Most active wallets of a program",
    title: "Program Active Users",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct ProgramActiveUsers;

fn window_days(choice: &str) -> i64 {
    choice.trim_end_matches('d').parse().unwrap_or(1)
}

pub fn render(program_id: &str, window: &str, resp: &ProgramActiveUsersResponse) -> String {
    let mut text = format!(
        "<u>Program Active Users</u>\n\nProgram: <code>{}</code>\nWindow: {}\n\n",
        program_id, window
    );
    if resp.data.is_empty() {
        text.push_str("No active users found for this period.");
        return text;
    }
    text.push_str("<b>Top Wallets:</b>\n");
    for (index, user) in resp.data.iter().take(20).enumerate() {
        text.push_str(&format!(
            "{}. <a href=\"https://solscan.io/address/{}\">{}</a>: <code>{}</code> transactions\n",
            index + 1,
            user.wallet,
            short_address(&user.wallet),
            user.transactions,
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for ProgramActiveUsers {
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
        let window = state.choice("days");
        let resp = client
            .program_active_users(&program_id, Some(window_days(window)))
            .await?;
        Ok(render(&program_id, window, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch active users. Please check the program address and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_parses_to_days() {
        assert_eq!(window_days("1d"), 1);
        assert_eq!(window_days("30d"), 30);
    }

    #[test]
    fn wallets_listed_with_transaction_counts() {
        let resp: ProgramActiveUsersResponse = serde_json::from_str(
            r#"{"data": [
                {"wallet": "WalletAddr111", "transactions": 420},
                {"wallet": "WalletAddr222", "transactions": 69}
            ]}"#,
        )
        .expect("decode");
        let text = render("PROG", "7d", &resp);
        assert!(text.contains("<code>420</code> transactions"));
        assert!(text.contains("2. "));
    }

    #[test]
    fn empty_window() {
        let text = render("PROG", "1d", &ProgramActiveUsersResponse::default());
        assert!(text.contains("No active users found"));
    }
}
