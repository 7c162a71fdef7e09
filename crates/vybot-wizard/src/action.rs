//! Button actions and their callback-data encoding.
//!
//! Callback data is `<wizard id>:<op>[:<field>]`. The wizard id is matched
//! exactly, so ids never shadow each other the way nested string prefixes
//! can.

use crate::schema::WizardSpec;
use crate::state::ConfigState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Prompt for text input on a field.
    Edit { field: String },
    Toggle { field: String },
    Cycle { field: String },
    Order { field: String },
    Clear { field: String },
    Search,
}

pub fn encode_callback(wizard_id: &str, action: &WizardAction) -> String {
    match action {
        WizardAction::Edit { field } => format!("{}:edit:{}", wizard_id, field),
        WizardAction::Toggle { field } => format!("{}:toggle:{}", wizard_id, field),
        WizardAction::Cycle { field } => format!("{}:cycle:{}", wizard_id, field),
        WizardAction::Order { field } => format!("{}:order:{}", wizard_id, field),
        WizardAction::Clear { field } => format!("{}:clear:{}", wizard_id, field),
        WizardAction::Search => format!("{}:search", wizard_id),
    }
}

/// Decode callback data into its wizard id and action. Unknown shapes yield
/// `None` and are ignored upstream.
pub fn parse_callback(data: &str) -> Option<(&str, WizardAction)> {
    let mut parts = data.splitn(3, ':');
    let wizard_id = parts.next()?;
    let op = parts.next()?;
    let field = parts.next().map(str::to_string);

    let action = match (op, field) {
        ("edit", Some(field)) => WizardAction::Edit { field },
        ("toggle", Some(field)) => WizardAction::Toggle { field },
        ("cycle", Some(field)) => WizardAction::Cycle { field },
        ("order", Some(field)) => WizardAction::Order { field },
        ("clear", Some(field)) => WizardAction::Clear { field },
        ("search", None) => WizardAction::Search,
        _ => return None,
    };
    Some((wizard_id, action))
}

/// What the runtime must do after an action was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Config changed; re-render the wizard message in place.
    Refresh,
    /// Register a pending input and send the field's reply prompt.
    Prompt {
        field: &'static str,
        prompt: &'static str,
    },
    /// Run the wizard's query.
    Search,
    /// Nothing to do (unknown field).
    Ignored,
}

/// Apply a button action to the config state.
pub fn handle_action(
    spec: &WizardSpec,
    state: &mut ConfigState,
    action: &WizardAction,
) -> ActionOutcome {
    match action {
        WizardAction::Search => ActionOutcome::Search,
        WizardAction::Edit { field } => match spec.field(field) {
            Some(f) => ActionOutcome::Prompt {
                field: f.key,
                prompt: f.prompt,
            },
            None => ActionOutcome::Ignored,
        },
        WizardAction::Toggle { field } => match spec.field(field) {
            Some(f) => {
                state.toggle(f);
                ActionOutcome::Refresh
            }
            None => ActionOutcome::Ignored,
        },
        WizardAction::Cycle { field } => match spec.field(field) {
            Some(f) => {
                state.cycle(f);
                ActionOutcome::Refresh
            }
            None => ActionOutcome::Ignored,
        },
        WizardAction::Order { field } => match spec.field(field) {
            Some(f) => {
                state.flip_order(f);
                ActionOutcome::Refresh
            }
            None => ActionOutcome::Ignored,
        },
        WizardAction::Clear { field } => match spec.field(field) {
            Some(f) => {
                state.clear(f);
                ActionOutcome::Refresh
            }
            None => ActionOutcome::Ignored,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_data_round_trips() {
        let cases = [
            WizardAction::Edit {
                field: "token".to_string(),
            },
            WizardAction::Toggle {
                field: "only_verified".to_string(),
            },
            WizardAction::Cycle {
                field: "resolution".to_string(),
            },
            WizardAction::Order {
                field: "sort_order".to_string(),
            },
            WizardAction::Clear {
                field: "wallets".to_string(),
            },
            WizardAction::Search,
        ];
        for action in cases {
            let data = encode_callback("token_balances", &action);
            let (id, parsed) = parse_callback(&data).expect("parse");
            assert_eq!(id, "token_balances");
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn malformed_callback_data_is_rejected() {
        assert!(parse_callback("").is_none());
        assert!(parse_callback("pnl").is_none());
        assert!(parse_callback("pnl:frobnicate").is_none());
        assert!(parse_callback("pnl:edit").is_none());
        assert!(parse_callback("pnl:search:extra").is_none());
    }

    #[test]
    fn exact_id_match_does_not_shadow() {
        // "nft_holders" and "nft_balances" both parse to their own id; no
        // prefix ordering is involved.
        let (id, _) = parse_callback("nft_holders:search").expect("parse");
        assert_eq!(id, "nft_holders");
        let (id, _) = parse_callback("nft_balances:search").expect("parse");
        assert_eq!(id, "nft_balances");
    }
}
