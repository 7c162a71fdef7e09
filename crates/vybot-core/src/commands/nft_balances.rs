//! NFT balances for one or more wallets.

use super::{fmt_num, NO_DATA};
use crate::Command;
use vybot_api::{
    NftBalancesMultiQuery, NftBalancesQuery, NftCollectionBalance, SortOrder, VybeClient,
    VybeError,
};
use vybot_wizard::{ButtonSpec, ConfigState, FieldKind, FieldSpec, WizardSpec};

const SORT_KEYS: &[&str] = &["value", "price"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "wallets",
        label: "Wallet address",
        prompt: "Please enter a wallet address:",
        kind: FieldKind::TextList,
    },
    FieldSpec {
        key: "show_unknown",
        label: "Unknown NFTs",
        prompt: "",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "limit",
        label: "Limit",
        prompt: "Enter a new limit (1-1000):",
        kind: FieldKind::Int {
            min: 1,
            max: 1000,
            default: 10,
        },
    },
    FieldSpec {
        key: "sort_by",
        label: "Sort",
        prompt: "",
        kind: FieldKind::Cycle {
            values: SORT_KEYS,
            default: "value",
        },
    },
    FieldSpec {
        key: "sort_order",
        label: "Order",
        prompt: "",
        kind: FieldKind::Order {
            default: SortOrder::Desc,
        },
    },
];

const LAYOUT: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::Edit {
            field: "wallets",
            label: "Add wallet address",
        },
        ButtonSpec::Clear {
            field: "wallets",
            label: "Clear wallets",
        },
    ],
    &[
        ButtonSpec::Toggle {
            field: "show_unknown",
            label: "Unknown NFTs",
        },
        ButtonSpec::Edit {
            field: "limit",
            label: "Limit",
        },
    ],
    &[
        ButtonSpec::Cycle {
            field: "sort_by",
            label: "Sort",
        },
        ButtonSpec::Order {
            field: "sort_order",
            label: "Order",
        },
    ],
    &[ButtonSpec::Search { label: "🔍 Search" }],
];

pub const SPEC: WizardSpec = WizardSpec {
    id: "nft_balances",
    command: "nfts",
    description: "NFT balances for one or more wallets",
    title: "NFT Balances",
    fields: FIELDS,
    layout: LAYOUT,
};

pub struct NftBalances;

fn collection_block(nft: &NftCollectionBalance) -> String {
    format!(
        "\n<b>{}</b>\n<code>{}</code>\n\
         • Items: <code>{}</code>\n\
         • Value: <code>${}</code> (<code>{} SOL</code>)\n\
         • Floor: <code>${}</code>\n",
        nft.name.as_deref().unwrap_or("Unknown"),
        nft.collection_address,
        nft.total_items,
        fmt_num(&nft.value_usd, 2),
        fmt_num(&nft.value_sol, 4),
        fmt_num(&nft.price_usd, 2),
    )
}

fn render(owners: &str, total_usd: &str, total_sol: &str, collections: i64,
          data: &[NftCollectionBalance], show_unknown: bool) -> String {
    let visible: Vec<&NftCollectionBalance> = data
        .iter()
        .filter(|nft| show_unknown || nft.name.is_some())
        .collect();
    if visible.is_empty() {
        return NO_DATA.to_string();
    }
    let mut text = format!(
        "<u>NFT Balances</u>\n\n<code>{}</code>\n\n<b>Summary:</b>\n\
         • Total Value: <code>${}</code> (<code>{} SOL</code>)\n\
         • Collections: <code>{}</code>\n\n<b>Collections:</b>\n",
        owners,
        fmt_num(total_usd, 2),
        fmt_num(total_sol, 4),
        collections,
    );
    for nft in visible {
        text.push_str(&collection_block(nft));
    }
    text
}

#[async_trait::async_trait]
impl Command for NftBalances {
    fn spec(&self) -> &'static WizardSpec {
        &SPEC
    }

    fn missing_input(&self, state: &ConfigState) -> Option<&'static str> {
        if state.list("wallets").is_empty() {
            Some("Please set a wallet address first!")
        } else {
            None
        }
    }

    async fn search(
        &self,
        client: &VybeClient,
        state: &ConfigState,
    ) -> Result<String, VybeError> {
        let wallets = state.list("wallets");
        let show_unknown = state.bool_value("show_unknown");
        if wallets.len() == 1 {
            let query = NftBalancesQuery {
                owner: wallets[0].clone(),
                include_no_price_balance: show_unknown,
                sort_by: state.choice("sort_by").to_string(),
                order: state.order("sort_order"),
                limit: state.int_value("limit"),
                page: 0,
            };
            let resp = client.nft_balances(&query).await?;
            Ok(render(
                &resp.owner_address,
                &resp.total_usd,
                &resp.total_sol,
                resp.total_nft_collection_count,
                &resp.data,
                show_unknown,
            ))
        } else {
            let query = NftBalancesMultiQuery {
                wallets: wallets.to_vec(),
                include_no_price_balance: show_unknown,
                sort_by: state.choice("sort_by").to_string(),
                order: state.order("sort_order"),
                limit: state.int_value("limit"),
            };
            let resp = client.nft_balances_multi(&query).await?;
            Ok(render(
                &resp.owner_addresses.join(", "),
                &resp.total_usd,
                &resp.total_sol,
                resp.total_nft_collection_count,
                &resp.data,
                show_unknown,
            ))
        }
    }

    fn failure_text(&self) -> &'static str {
        "Failed to fetch NFT balances. Please check your inputs and try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(name: Option<&str>) -> NftCollectionBalance {
        NftCollectionBalance {
            name: name.map(str::to_string),
            collection_address: "C".to_string(),
            total_items: 3,
            value_sol: "1.5".to_string(),
            price_sol: "0.5".to_string(),
            value_usd: "300".to_string(),
            price_usd: "100".to_string(),
            logo_url: None,
        }
    }

    #[test]
    fn unknown_collections_are_hidden_when_toggled_off() {
        let data = vec![collection(Some("Mad Lads")), collection(None)];
        let shown = render("W", "300", "1.5", 2, &data, true);
        assert!(shown.contains("Mad Lads"));
        assert!(shown.contains("Unknown"));

        let hidden = render("W", "300", "1.5", 2, &data, false);
        assert!(hidden.contains("Mad Lads"));
        assert!(!hidden.contains("Unknown"));
    }

    #[test]
    fn empty_result_renders_no_data() {
        assert_eq!(render("W", "0", "0", 0, &[], true), NO_DATA);
    }
}
