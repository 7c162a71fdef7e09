//! Vybot wizard engine
//!
//! Generic configuration-wizard machinery shared by every command: a field
//! schema, a typed per-session config state, button actions with a closed
//! callback-data encoding, text-input validation, and the message/keyboard
//! renderer. Commands supply only their schema, their API-call mapping, and
//! their result renderer.

pub mod action;
pub mod render;
pub mod schema;
pub mod state;
pub mod store;

pub use action::{encode_callback, handle_action, parse_callback, ActionOutcome, WizardAction};
pub use render::{render_keyboard, render_text};
pub use schema::{ButtonSpec, FieldKind, FieldSpec, WizardSpec};
pub use state::{cycle_next, ConfigState, FieldValue, InputError};
pub use store::{PendingInput, SessionKey, WizardStores};
