//! Top holders of a token.

use super::short_address;
use crate::Command;
use vybot_api::{TokenHoldersResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "token",
        label: "Token",
        prompt: "Please enter a token address:",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "limit",
        label: "Holders shown",
        prompt: "Enter a new limit (1-1000):",
        kind: FieldKind::Int {
            min: 1,
            max: 1000,
            default: 10,
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "token",
            label: "Edit token address",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Holders shown",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_holders",
    command: "holders",
    description: "Top holders of a token",
    title: "Token Holders",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenHolders;

pub fn render(token: &str, limit: usize, resp: &TokenHoldersResponse) -> String {
    let mut text = format!(
        "<u>Token Holders</u>\n\nToken: <code>{}</code>\n\
         Total holders returned: <code>{}</code>\n\n",
        token,
        resp.data.len()
    );
    if resp.data.is_empty() {
        text.push_str("No holders found for this token.");
        return text;
    }
    for (index, holder) in resp.data.iter().take(limit).enumerate() {
        text.push_str(&format!(
            "{}. <a href=\"https://solscan.io/address/{}\">{}</a>: <code>{:.2}%</code> of supply\n",
            index + 1,
            holder.owner_address,
            short_address(&holder.owner_address),
            holder.percentage_of_supply_held,
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenHolders {
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
        let token = state.text("token").unwrap_or_default().to_string();
        let resp = client.token_top_holders(&token).await?;
        Ok(render(&token, state.int_value("limit") as usize, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch token holders. Please check the token address and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_the_limit() {
        let resp: TokenHoldersResponse = serde_json::from_str(
            r#"{"data": [
                {"ownerAddress": "AAAAAAAAAAAA", "percentageOfSupplyHeld": 10.5},
                {"ownerAddress": "BBBBBBBBBBBB", "percentageOfSupplyHeld": 5.25},
                {"ownerAddress": "CCCCCCCCCCCC", "percentageOfSupplyHeld": 1.0}
            ]}"#,
        )
        .expect("decode");
        let text = render("MINT", 2, &resp);
        assert!(text.contains("1. "));
        assert!(text.contains("2. "));
        assert!(!text.contains("3. "));
        assert!(text.contains("10.50%"));
    }

    #[test]
    fn empty_holder_list() {
        let text = render("MINT", 10, &TokenHoldersResponse::default());
        assert!(text.contains("No holders found"));
    }
}
