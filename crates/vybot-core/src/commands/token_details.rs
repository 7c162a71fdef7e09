//! Basic token metadata and price info.

use crate::Command;
use vybot_api::{TokenDetailsResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[FieldSpec {
    key: "token",
    label: "Token",
    prompt: "Please enter a token address:",
    kind: FieldKind::Text,
}];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[ButtonSpec::Edit {
        field: "token",
        label: "Edit token address",
    }],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "token_details",
    command: "token",
    description: "Token metadata and price",
    title: "Token Details",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct TokenDetails;

fn opt_num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "N/A".to_string(),
    }
}

pub fn render(token: &str, details: &TokenDetailsResponse) -> String {
    let mut text = format!("<u>Token Details</u>\n\nToken: <code>{}</code>\n\n", token);
    if details.symbol.is_none() {
        text.push_str("No token details found.");
        return text;
    }
    text.push_str(&format!(
        "<b>Basic Info:</b>\n\
         • Name: <code>{}</code>\n\
         • Symbol: <code>{}</code>\n\
         • MktCap: <code>${}</code>\n\
         • 24h Vol.: <code>${}</code>\n\
         • Category: <code>{} ({})</code>\n",
        details.name.as_deref().unwrap_or("N/A"),
        details.symbol.as_deref().unwrap_or("N/A"),
        opt_num(details.market_cap),
        opt_num(details.usd_value_volume_24h),
        details.category.as_deref().unwrap_or("N/A"),
        details.subcategory.as_deref().unwrap_or("N/A"),
    ));
    if let Some(price) = details.price {
        text.push_str(&format!(
            "\n<b>Price Info:</b>\n• Current Price: <code>${:.6}</code>\n",
            price
        ));
        if let Some(change) = details.price_change_24h {
            text.push_str(&format!("• 24h Change: <code>{:.2}%</code>\n", change));
        }
    }
    text
}

#[async_trait::async_trait]
impl Command for TokenDetails {
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
        let resp = client.token_details(&token).await?;
        Ok(render(&token, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch token details. Please check the token address and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_symbol_means_no_details() {
        let text = render("MINT", &TokenDetailsResponse::default());
        assert!(text.contains("No token details found."));
    }

    #[test]
    fn optional_fields_fall_back_to_na() {
        let resp: TokenDetailsResponse = serde_json::from_str(
            r#"{"symbol": "BONK", "price": 0.0000325}"#,
        )
        .expect("decode");
        let text = render("MINT", &resp);
        assert!(text.contains("Name: <code>N/A</code>"));
        assert!(text.contains("MktCap: <code>$N/A</code>"));
        assert!(text.contains("Current Price: <code>$0.000033</code>"));
        assert!(!text.contains("24h Change"));
    }
}
