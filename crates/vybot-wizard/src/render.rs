//! Wizard message and keyboard rendering.
//!
//! Pure functions of spec + state, so rendering twice without a mutation in
//! between yields byte-identical output.

use crate::action::{encode_callback, WizardAction};
use crate::schema::{ButtonSpec, FieldKind, FieldSpec, WizardSpec};
use crate::state::ConfigState;
use vybot_ipc::InlineButton;

fn display_value(field: &FieldSpec, state: &ConfigState) -> String {
    match field.kind {
        FieldKind::Toggle { .. } => state.bool_value(field.key).to_string(),
        FieldKind::Cycle { .. } => state.choice(field.key).to_string(),
        FieldKind::Order { .. } => state.order(field.key).label().to_string(),
        FieldKind::Text => state
            .text(field.key)
            .unwrap_or("Not set")
            .to_string(),
        FieldKind::TextList => {
            let items = state.list(field.key);
            match items.len() {
                0 => "Not set".to_string(),
                1 => items[0].clone(),
                n => format!("{} entries", n),
            }
        }
        FieldKind::Int { .. } => state.int_value(field.key).to_string(),
        FieldKind::Float { .. } => state.float_value(field.key).to_string(),
        FieldKind::OptFloat { .. } => match state.opt_float(field.key) {
            Some(v) => v.to_string(),
            None => "No limit".to_string(),
        },
        FieldKind::Timestamp => match state.opt_time(field.key) {
            Some(v) => v.to_string(),
            None => "Not set".to_string(),
        },
    }
}

/// The wizard message body: title plus one summary line per field.
pub fn render_text(spec: &WizardSpec, state: &ConfigState) -> String {
    let mut text = format!("<u>{}</u>\n\n", spec.title);
    for field in spec.fields {
        text.push_str(&format!(
            "{}: <code>{}</code>\n",
            field.label,
            display_value(field, state)
        ));
    }
    text
}

fn button_label(spec: &WizardSpec, state: &ConfigState, button: &ButtonSpec) -> String {
    match *button {
        ButtonSpec::Search { label } | ButtonSpec::Clear { field: _, label } => label.to_string(),
        ButtonSpec::Toggle { field, label } => {
            let mark = if state.bool_value(field) { "✅" } else { "❌" };
            format!("{} {}", mark, label)
        }
        ButtonSpec::Cycle { field, label } => format!("{}: {}", label, state.choice(field)),
        ButtonSpec::Order { field, label } => {
            format!("{}: {}", label, state.order(field).label())
        }
        ButtonSpec::Edit { field, label } => match spec.field(field).map(|f| f.kind) {
            Some(FieldKind::Int { .. })
            | Some(FieldKind::Float { .. })
            | Some(FieldKind::OptFloat { .. }) => {
                let f = spec.field(field).expect("field exists");
                format!("{}: {}", label, display_value(f, state))
            }
            Some(FieldKind::Timestamp) => {
                if state.opt_time(field).is_some() {
                    format!("✅ {}", label)
                } else {
                    label.to_string()
                }
            }
            _ => label.to_string(),
        },
    }
}

fn button_action(button: &ButtonSpec) -> WizardAction {
    match *button {
        ButtonSpec::Edit { field, .. } => WizardAction::Edit {
            field: field.to_string(),
        },
        ButtonSpec::Toggle { field, .. } => WizardAction::Toggle {
            field: field.to_string(),
        },
        ButtonSpec::Cycle { field, .. } => WizardAction::Cycle {
            field: field.to_string(),
        },
        ButtonSpec::Order { field, .. } => WizardAction::Order {
            field: field.to_string(),
        },
        ButtonSpec::Clear { field, .. } => WizardAction::Clear {
            field: field.to_string(),
        },
        ButtonSpec::Search { .. } => WizardAction::Search,
    }
}

pub fn render_keyboard(spec: &WizardSpec, state: &ConfigState) -> Vec<Vec<InlineButton>> {
    spec.layout
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    InlineButton::new(
                        button_label(spec, state, button),
                        encode_callback(spec.id, &button_action(button)),
                    )
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec {
            key: "wallet",
            label: "Wallet address",
            prompt: "Please enter a wallet address:",
            kind: FieldKind::Text,
        },
        FieldSpec {
            key: "verified",
            label: "Verified only",
            prompt: "",
            kind: FieldKind::Toggle { default: false },
        },
        FieldSpec {
            key: "limit",
            label: "Limit",
            prompt: "Enter a new limit (1-1000):",
            kind: FieldKind::Int {
                min: 1,
                max: 1000,
                default: 100,
            },
        },
    ];

    const LAYOUT: &[&[ButtonSpec]] = &[
        &[
            ButtonSpec::Edit {
                field: "wallet",
                label: "Edit wallet address",
            },
            ButtonSpec::Toggle {
                field: "verified",
                label: "Verified only",
            },
        ],
        &[
            ButtonSpec::Edit {
                field: "limit",
                label: "Limit",
            },
            ButtonSpec::Search { label: "🔍 Search" },
        ],
    ];

    const SPEC: WizardSpec = WizardSpec {
        id: "demo",
        command: "demo",
        description: "demo wizard",
        title: "Demo",
        fields: FIELDS,
        layout: LAYOUT,
    };

    #[test]
    fn render_is_idempotent() {
        let state = ConfigState::new(&SPEC);
        assert_eq!(render_text(&SPEC, &state), render_text(&SPEC, &state));
        assert_eq!(
            render_keyboard(&SPEC, &state),
            render_keyboard(&SPEC, &state)
        );
    }

    #[test]
    fn summary_shows_defaults() {
        let state = ConfigState::new(&SPEC);
        let text = render_text(&SPEC, &state);
        assert!(text.contains("<u>Demo</u>"));
        assert!(text.contains("Wallet address: <code>Not set</code>"));
        assert!(text.contains("Limit: <code>100</code>"));
    }

    #[test]
    fn keyboard_reflects_state() {
        let mut state = ConfigState::new(&SPEC);
        let keyboard = render_keyboard(&SPEC, &state);
        assert_eq!(keyboard[0][1].text, "❌ Verified only");
        assert_eq!(keyboard[1][0].text, "Limit: 100");
        assert_eq!(keyboard[1][1].callback_data, "demo:search");

        state.toggle(SPEC.field("verified").expect("field"));
        let keyboard = render_keyboard(&SPEC, &state);
        assert_eq!(keyboard[0][1].text, "✅ Verified only");
        assert_eq!(keyboard[0][1].callback_data, "demo:toggle:verified");
    }
}
