//! The command set: one wizard per upstream query.
//!
//! Each module supplies a static `WizardSpec`, the required-field check, the
//! mapping from config state to an API query, and a pure result renderer.

pub mod chart;
pub mod known_accounts;
pub mod nft_balances;
pub mod nft_holders;
pub mod pnl;
pub mod program_active_users;
pub mod program_details;
pub mod program_list;
pub mod program_rankings;
pub mod program_timeseries;
pub mod program_tvl;
pub mod token_balances;
pub mod token_balances_ts;
pub mod token_details;
pub mod token_holders;
pub mod token_ix_names;
pub mod token_timeseries;
pub mod token_trades;
pub mod token_transfers;

use crate::Command;
use std::sync::Arc;

pub fn all() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(token_balances::TokenBalances),
        Arc::new(token_balances_ts::TokenBalancesTs),
        Arc::new(nft_balances::NftBalances),
        Arc::new(pnl::Pnl),
        Arc::new(chart::Chart),
        Arc::new(token_details::TokenDetails),
        Arc::new(token_holders::TokenHolders),
        Arc::new(token_trades::TokenTrades),
        Arc::new(token_transfers::TokenTransfers),
        Arc::new(token_ix_names::TokenIxNames),
        Arc::new(token_timeseries::TokenTimeseries),
        Arc::new(nft_holders::NftHolders),
        Arc::new(program_details::ProgramDetails),
        Arc::new(program_tvl::ProgramTvl),
        Arc::new(program_active_users::ProgramActiveUsers),
        Arc::new(program_timeseries::ProgramTimeseries),
        Arc::new(program_rankings::ProgramRankings),
        Arc::new(program_list::ProgramList),
        Arc::new(known_accounts::KnownAccounts),
    ]
}

pub(crate) const NO_DATA: &str = "No data available for the specified parameters.";

/// Parse a string-encoded number and format it with fixed precision.
pub(crate) fn fmt_num(raw: &str, precision: usize) -> String {
    format!("{:.*}", precision, raw.parse::<f64>().unwrap_or(0.0))
}

/// Format a float for a query string, dropping a trailing `.0`.
pub(crate) fn plain_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// `ABCDEF...WXYZ` style shortening for addresses in running text.
/// Counts characters, not bytes, so a malformed upstream value cannot
/// split a multi-byte sequence.
pub(crate) fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        address.to_string()
    } else {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

pub(crate) fn format_datetime(unix_secs: i64) -> String {
    match chrono::DateTime::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => unix_secs.to_string(),
    }
}

pub(crate) fn format_date(unix_secs: i64) -> String {
    match chrono::DateTime::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => unix_secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wizard_ids_and_commands_are_unique() {
        let commands = all();
        let ids: HashSet<_> = commands.iter().map(|c| c.spec().id).collect();
        let names: HashSet<_> = commands.iter().map(|c| c.spec().command).collect();
        assert_eq!(ids.len(), commands.len());
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn every_layout_button_references_a_known_field() {
        use vybot_wizard::ButtonSpec;
        for command in all() {
            let spec = command.spec();
            for row in spec.layout {
                for button in *row {
                    let field = match *button {
                        ButtonSpec::Edit { field, .. }
                        | ButtonSpec::Toggle { field, .. }
                        | ButtonSpec::Cycle { field, .. }
                        | ButtonSpec::Order { field, .. }
                        | ButtonSpec::Clear { field, .. } => field,
                        ButtonSpec::Search { .. } => continue,
                    };
                    assert!(
                        spec.field(field).is_some(),
                        "wizard {} has a button for unknown field {}",
                        spec.id,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(fmt_num("1234.567", 2), "1234.57");
        assert_eq!(fmt_num("garbage", 2), "0.00");
        assert_eq!(plain_num(100.0), "100");
        assert_eq!(plain_num(0.5), "0.5");
        assert_eq!(short_address("So11111111111111111111111111111111111111112")
            .starts_with("So1111"), true);
        assert_eq!(short_address("short"), "short");
        assert_eq!(format_date(0), "1970-01-01");
    }

    #[test]
    fn short_address_handles_multibyte_input() {
        assert_eq!(short_address("солана-адрес-пример"), "солана...имер");
        assert_eq!(short_address("солана"), "солана");
    }
}
