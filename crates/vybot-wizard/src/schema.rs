//! Field and wizard schemas.
//!
//! A wizard is described entirely by static data: its fields (name, kind,
//! input prompt) and its keyboard layout. The engine drives everything else.

use vybot_api::SortOrder;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Boolean flipped by a button.
    Toggle { default: bool },

    /// Enumerated value advanced cyclically by a button. An unknown current
    /// value recovers by wrapping to the first entry.
    Cycle {
        values: &'static [&'static str],
        default: &'static str,
    },

    /// Ascending/descending toggle.
    Order { default: SortOrder },

    /// Free text captured via a prompted reply. Empty input clears it.
    Text,

    /// List of free-text entries; each prompted reply appends one.
    TextList,

    /// Bounded integer.
    Int {
        min: i64,
        max: i64,
        default: i64,
    },

    /// Lower-bounded decimal.
    Float { min: f64, default: f64 },

    /// Optional lower-bounded decimal; empty input removes the limit.
    OptFloat { min: f64 },

    /// Optional Unix timestamp; empty input clears it.
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Stable key used in callback data and config state.
    pub key: &'static str,
    /// Human-readable name shown in the wizard summary.
    pub label: &'static str,
    /// Reply prompt shown when this field is edited via text.
    pub prompt: &'static str,
    pub kind: FieldKind,
}

/// One inline button in the wizard keyboard.
#[derive(Debug, Clone, Copy)]
pub enum ButtonSpec {
    /// Prompt for text input (sets, appends for lists).
    Edit { field: &'static str, label: &'static str },
    /// Flip a toggle field; rendered with a checkmark/cross prefix.
    Toggle { field: &'static str, label: &'static str },
    /// Advance a cyclic field; rendered as "label: current".
    Cycle { field: &'static str, label: &'static str },
    /// Flip sort direction; rendered as "label: asc|desc".
    Order { field: &'static str, label: &'static str },
    /// Reset a field to its default.
    Clear { field: &'static str, label: &'static str },
    /// Run the query with the current configuration.
    Search { label: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct WizardSpec {
    /// Wizard id; doubles as the callback-data tag and must be unique.
    pub id: &'static str,
    /// Slash command that opens this wizard.
    pub command: &'static str,
    /// Short command description for the platform command menu.
    pub description: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub layout: &'static [&'static [ButtonSpec]],
}

impl WizardSpec {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }
}
