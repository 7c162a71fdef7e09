//! Owners of an NFT collection.

use super::short_address;
use crate::Command;
use vybot_api::{NftOwnersResponse, VybeClient, VybeError};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "collection",
        label: "Collection",
        prompt: "Please enter a collection address:",
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
            field: "collection",
            label: "Edit collection address",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Holders shown",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "nft_holders",
    command: "nftholders",
    description: "Owners of an NFT collection",
    title: "NFT Collection Holders",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct NftHolders;

pub fn render(collection: &str, limit: usize, resp: &NftOwnersResponse) -> String {
    let mut text = format!(
        "<u>NFT Collection Holders</u>\n\nCollection: <code>{}</code>\n\
         Total holders returned: <code>{}</code>\n\n",
        collection,
        resp.data.len()
    );
    if resp.data.is_empty() {
        text.push_str("No holders found for this collection.");
        return text;
    }
    for (index, holder) in resp.data.iter().take(limit).enumerate() {
        text.push_str(&format!(
            "{}. <a href=\"https://solscan.io/address/{}\">{}</a> holds <b>{}</b> NFTs\n",
            index + 1,
            holder.owner,
            short_address(&holder.owner),
            holder.amount,
        ));
    }
    text
}

#[async_trait::async_trait]
impl Command for NftHolders {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.text("collection").is_none() {
            Some("Please set a collection address first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let collection = state.text("collection").unwrap_or_default().to_string();
        let resp = client.nft_collection_owners(&collection).await?;
        Ok(render(&collection, state.int_value("limit") as usize, &resp))
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch collection holders. Please check the collection address and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_lines_show_amount() {
        let resp: NftOwnersResponse = serde_json::from_str(
            r#"{"data": [
                {"owner": "OwnerAddr111", "amount": 3},
                {"owner": "OwnerAddr222", "amount": 1}
            ]}"#,
        )
        .expect("decode");
        let text = render("COLL", 10, &resp);
        assert!(text.contains("holds <b>3</b> NFTs"));
        assert!(text.contains("Total holders returned: <code>2</code>"));
    }

    #[test]
    fn empty_collection() {
        let text = render("COLL", 10, &NftOwnersResponse::default());
        assert!(text.contains("No holders found"));
    }
}
