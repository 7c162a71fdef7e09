//! Recent transfers of a token, with optional party filters.

use super::format_datetime;
use crate::Command;
use vybot_api::{TokenTransfersQuery, TokenTransfersResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "token",
        label: "Token",
        prompt: "Please enter a token address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "signature",
        label: "Signature",
        prompt: "Please enter a signature:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "calling_program",
        label: "Calling program",
        prompt: "Please enter a program address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "sender_token",
        label: "Sender token account",
        prompt: "Please enter a sender token account:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "sender",
        label: "Sender",
        prompt: "Please enter a sender address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "receiver_token",
        label: "Receiver token account",
        prompt: "Please enter a receiver token account:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "receiver",
        label: "Receiver",
        prompt: "Please enter a receiver address:",
        kind: FieldKind::Text,
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "token",
            label: "Edit token address",
        },
        ButtonSpec::Edit {
            field: "signature",
            label: "Signature",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "calling_program",
            label: "Calling program",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "sender",
            label: "Sender",
        },
        ButtonSpec::Edit {
            field: "sender_token",
            label: "Sender token account",
        },
    ],
    &[
        ButtonSpec::Edit {
            field: "receiver",
            label: "Receiver",
        },
        ButtonSpec::Edit {
            field: "receiver_token",
            label: "Receiver token account",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_transfers",
    command: "transfers",
    description: "Recent transfers of a token",
    title: "Token Transfers",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenTransfers;

pub fn render(token: &str, resp: &TokenTransfersResponse) -> String {
    let mut text = format!("<u>Token Transfers</u>\n\nToken: <code>{}</code>\n\n", token);
    if resp.transfers.is_empty() {
        text.push_str("No transfers found for the specified parameters.");
        return text;
    }
    text.push_str("<b>Recent Transfers:</b>\n\n");
    for transfer in &resp.transfers {
        text.push_str(&format!(
            "🔄 <b>Transfer</b> at {}\n\
             • From: <code>{}</code>\n\
             • To: <code>{}</code>\n\
             • Amount: <code>{}</code>\n",
            format_datetime(transfer.block_time),
            transfer.sender_address.as_deref().unwrap_or("Unknown"),
            transfer.receiver_address.as_deref().unwrap_or("Unknown"),
            transfer.calculated_amount,
        ));
        if let Some(signature) = &transfer.signature {
            text.push_str(&format!(
                "• <a href=\"https://solscan.io/tx/{}\">View on Solscan</a>\n",
                signature
            ));
        }
        text.push('\n');
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenTransfers {
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
        let query = TokenTransfersQuery {
            mint: state.text("token").unwrap_or_default().to_string(),
            signature: state.text("signature").map(str::to_string),
            calling_program: state.text("calling_program").map(str::to_string),
            sender_token_account: state.text("sender_token").map(str::to_string),
            sender_address: state.text("sender").map(str::to_string),
            receiver_token_account: state.text("receiver_token").map(str::to_string),
            receiver_address: state.text("receiver").map(str::to_string),
        };
        let resp = client.token_transfers(&query).await?;
        Ok(render(&query.mint, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch transfers. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parties_render_as_unknown() {
        let resp: TokenTransfersResponse = serde_json::from_str(
            r#"{"transfers": [{"blockTime": 1700000000,
                "calculatedAmount": "12.5"}]}"#,
        )
        .expect("decode");
        let text = render("MINT", &resp);
        assert!(text.contains("From: <code>Unknown</code>"));
        assert!(text.contains("To: <code>Unknown</code>"));
        assert!(text.contains("Amount: <code>12.5</code>"));
        assert!(!text.contains("Solscan"));
    }

    #[test]
    fn empty_transfers() {
        let text = render("MINT", &TokenTransfersResponse::default());
        assert!(text.contains("No transfers found"));
    }
}
