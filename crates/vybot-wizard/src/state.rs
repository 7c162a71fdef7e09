//! Per-session wizard configuration and text-input validation.

use crate::schema::{FieldKind, FieldSpec, WizardSpec};
use thiserror::Error;
use vybot_api::SortOrder;

/// Validation failures shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Please enter a valid number between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("Please enter a valid number greater than or equal to {min}")]
    BelowMinimum { min: f64 },

    #[error("Please enter a valid number greater than or equal to {min}, or empty message to remove limit")]
    BelowMinimumOrEmpty { min: f64 },

    #[error("Please enter a valid Unix timestamp")]
    BadTimestamp,

    #[error("Please enter a non-empty value")]
    Empty,

    #[error("This option is changed with its button, not with text")]
    NotTextEditable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Choice(&'static str),
    Order(SortOrder),
    Text(String),
    List(Vec<String>),
    Int(i64),
    Float(f64),
    OptFloat(Option<f64>),
    OptTime(Option<i64>),
}

impl FieldKind {
    pub fn default_value(&self) -> FieldValue {
        match *self {
            FieldKind::Toggle { default } => FieldValue::Bool(default),
            FieldKind::Cycle { default, .. } => FieldValue::Choice(default),
            FieldKind::Order { default } => FieldValue::Order(default),
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::TextList => FieldValue::List(Vec::new()),
            FieldKind::Int { default, .. } => FieldValue::Int(default),
            FieldKind::Float { default, .. } => FieldValue::Float(default),
            FieldKind::OptFloat { .. } => FieldValue::OptFloat(None),
            FieldKind::Timestamp => FieldValue::OptTime(None),
        }
    }
}

/// Advance through `values`, wrapping at the end. A `current` that is not in
/// `values` behaves as index -1, so the first advance lands on index 0.
pub fn cycle_next(values: &'static [&'static str], current: &str) -> &'static str {
    let index = values
        .iter()
        .position(|v| *v == current)
        .map(|i| i as i64)
        .unwrap_or(-1);
    values[((index + 1) % values.len() as i64) as usize]
}

/// One wizard's configuration for one session, keyed by field name in
/// schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigState {
    values: Vec<(&'static str, FieldValue)>,
}

impl ConfigState {
    pub fn new(spec: &WizardSpec) -> Self {
        Self {
            values: spec
                .fields
                .iter()
                .map(|f| (f.key, f.kind.default_value()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.values
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn bool_value(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FieldValue::Bool(true)))
    }

    pub fn choice(&self, key: &str) -> &'static str {
        match self.get(key) {
            Some(FieldValue::Choice(v)) => v,
            _ => "",
        }
    }

    pub fn order(&self, key: &str) -> SortOrder {
        match self.get(key) {
            Some(FieldValue::Order(o)) => *o,
            _ => SortOrder::Desc,
        }
    }

    /// Text value, or `None` when unset/empty.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn int_value(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(FieldValue::Int(n)) => *n,
            _ => 0,
        }
    }

    pub fn float_value(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(FieldValue::Float(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn opt_float(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(FieldValue::OptFloat(v)) => *v,
            _ => None,
        }
    }

    pub fn opt_time(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(FieldValue::OptTime(v)) => *v,
            _ => None,
        }
    }

    pub fn toggle(&mut self, field: &FieldSpec) {
        if let Some(FieldValue::Bool(b)) = self.get_mut(field.key) {
            *b = !*b;
        }
    }

    pub fn cycle(&mut self, field: &FieldSpec) {
        if let FieldKind::Cycle { values, .. } = field.kind {
            if let Some(FieldValue::Choice(current)) = self.get_mut(field.key) {
                *current = cycle_next(values, current);
            }
        }
    }

    pub fn flip_order(&mut self, field: &FieldSpec) {
        if let Some(FieldValue::Order(o)) = self.get_mut(field.key) {
            *o = o.toggled();
        }
    }

    pub fn clear(&mut self, field: &FieldSpec) {
        if let Some(value) = self.get_mut(field.key) {
            *value = field.kind.default_value();
        }
    }

    /// Apply prompted text input. On error the state is left untouched.
    pub fn set_from_text(&mut self, field: &FieldSpec, input: &str) -> Result<(), InputError> {
        let input = input.trim();
        let parsed = match field.kind {
            FieldKind::Text => FieldValue::Text(input.to_string()),
            FieldKind::TextList => {
                if input.is_empty() {
                    return Err(InputError::Empty);
                }
                let mut items = self.list(field.key).to_vec();
                items.push(input.to_string());
                FieldValue::List(items)
            }
            FieldKind::Int { min, max, .. } => {
                let n: i64 = input
                    .parse()
                    .map_err(|_| InputError::OutOfRange { min, max })?;
                if n < min || n > max {
                    return Err(InputError::OutOfRange { min, max });
                }
                FieldValue::Int(n)
            }
            FieldKind::Float { min, .. } => {
                let n: f64 = input
                    .parse()
                    .map_err(|_| InputError::BelowMinimum { min })?;
                if n < min {
                    return Err(InputError::BelowMinimum { min });
                }
                FieldValue::Float(n)
            }
            FieldKind::OptFloat { min } => {
                if input.is_empty() {
                    FieldValue::OptFloat(None)
                } else {
                    let n: f64 = input
                        .parse()
                        .map_err(|_| InputError::BelowMinimumOrEmpty { min })?;
                    if n < min {
                        return Err(InputError::BelowMinimumOrEmpty { min });
                    }
                    FieldValue::OptFloat(Some(n))
                }
            }
            FieldKind::Timestamp => {
                if input.is_empty() {
                    FieldValue::OptTime(None)
                } else {
                    let ts: i64 = input.parse().map_err(|_| InputError::BadTimestamp)?;
                    if ts <= 0 {
                        return Err(InputError::BadTimestamp);
                    }
                    FieldValue::OptTime(Some(ts))
                }
            }
            FieldKind::Toggle { .. } | FieldKind::Cycle { .. } | FieldKind::Order { .. } => {
                return Err(InputError::NotTextEditable);
            }
        };

        if let Some(slot) = self.get_mut(field.key) {
            *slot = parsed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ButtonSpec, WizardSpec};

    const RESOLUTIONS: &[&str] = &[
        "15m", "30m", "1h", "2h", "3h", "4h", "1d", "1w", "1mo", "1y",
    ];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec {
            key: "token",
            label: "Token",
            prompt: "Please enter a token address:",
            kind: FieldKind::Text,
        },
        FieldSpec {
            key: "resolution",
            label: "Resolution",
            prompt: "",
            kind: FieldKind::Cycle {
                values: RESOLUTIONS,
                default: "1d",
            },
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
        FieldSpec {
            key: "wallets",
            label: "Wallets",
            prompt: "Please enter a wallet address:",
            kind: FieldKind::TextList,
        },
        FieldSpec {
            key: "max_value",
            label: "Max Asset Value",
            prompt: "Enter a max asset value:",
            kind: FieldKind::OptFloat { min: 0.0 },
        },
        FieldSpec {
            key: "time_start",
            label: "Start time",
            prompt: "Please enter a Unix timestamp:",
            kind: FieldKind::Timestamp,
        },
    ];

    const LAYOUT: &[&[ButtonSpec]] = &[];

    const SPEC: WizardSpec = WizardSpec {
        id: "test",
        command: "test",
        description: "test wizard",
        title: "Test",
        fields: FIELDS,
        layout: LAYOUT,
    };

    fn field(key: &str) -> &'static FieldSpec {
        SPEC.field(key).expect("field")
    }

    #[test]
    fn cycle_visits_every_value_once_before_repeating() {
        let mut seen = Vec::new();
        let mut current = "15m";
        for _ in 0..RESOLUTIONS.len() {
            seen.push(current);
            current = cycle_next(RESOLUTIONS, current);
        }
        assert_eq!(seen, RESOLUTIONS.to_vec());
        assert_eq!(current, "15m");
    }

    #[test]
    fn cycle_wraps_from_last_to_first() {
        assert_eq!(cycle_next(RESOLUTIONS, "1y"), "15m");
    }

    #[test]
    fn cycle_recovers_from_unknown_value() {
        assert_eq!(cycle_next(RESOLUTIONS, "bogus"), "15m");
    }

    #[test]
    fn limit_boundaries_are_accepted() {
        let mut state = ConfigState::new(&SPEC);
        state.set_from_text(field("limit"), "1").expect("min");
        assert_eq!(state.int_value("limit"), 1);
        state.set_from_text(field("limit"), "1000").expect("max");
        assert_eq!(state.int_value("limit"), 1000);
    }

    #[test]
    fn limit_rejections_leave_state_unchanged() {
        let mut state = ConfigState::new(&SPEC);
        for bad in ["0", "1001", "abc", "1.5"] {
            let err = state.set_from_text(field("limit"), bad).expect_err(bad);
            assert_eq!(
                err.to_string(),
                "Please enter a valid number between 1 and 1000"
            );
            assert_eq!(state.int_value("limit"), 100);
        }
    }

    #[test]
    fn list_appends_in_insertion_order() {
        let mut state = ConfigState::new(&SPEC);
        state.set_from_text(field("wallets"), "A").expect("add");
        state.set_from_text(field("wallets"), "B").expect("add");
        assert_eq!(state.list("wallets"), &["A".to_string(), "B".to_string()]);
        assert!(state.set_from_text(field("wallets"), "  ").is_err());
        assert_eq!(state.list("wallets").len(), 2);
    }

    #[test]
    fn opt_float_empty_input_removes_limit() {
        let mut state = ConfigState::new(&SPEC);
        state.set_from_text(field("max_value"), "5.5").expect("set");
        assert_eq!(state.opt_float("max_value"), Some(5.5));
        state.set_from_text(field("max_value"), "").expect("clear");
        assert_eq!(state.opt_float("max_value"), None);

        let err = state
            .set_from_text(field("max_value"), "-1")
            .expect_err("below min");
        assert_eq!(
            err.to_string(),
            "Please enter a valid number greater than or equal to 0, or empty message to remove limit"
        );
    }

    #[test]
    fn timestamp_rejects_garbage() {
        let mut state = ConfigState::new(&SPEC);
        let err = state
            .set_from_text(field("time_start"), "tomorrow")
            .expect_err("garbage");
        assert_eq!(err.to_string(), "Please enter a valid Unix timestamp");
        state
            .set_from_text(field("time_start"), "1700000000")
            .expect("valid");
        assert_eq!(state.opt_time("time_start"), Some(1_700_000_000));
    }

    #[test]
    fn clear_restores_field_default() {
        let mut state = ConfigState::new(&SPEC);
        state.set_from_text(field("token"), "MINT").expect("set");
        state.set_from_text(field("limit"), "7").expect("set");
        state.clear(field("token"));
        state.clear(field("limit"));
        assert_eq!(state.text("token"), None);
        assert_eq!(state.int_value("limit"), 100);
    }

    #[test]
    fn toggle_and_order_reject_text_input() {
        let mut state = ConfigState::new(&SPEC);
        assert_eq!(
            state.set_from_text(field("resolution"), "1h"),
            Err(InputError::NotTextEditable)
        );
    }
}
