//! Per-session wizard state.
//!
//! Configs are keyed by (chat, user, wizard) and pending input requests by
//! (chat, user), so two users editing the same wizard never see each other's
//! state. The runtime serializes access by holding these behind one mutex.

use crate::schema::WizardSpec;
use crate::state::ConfigState;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

/// A registered wait for the user's next text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub wizard: &'static str,
    pub field: &'static str,
    /// The reply prompt we sent, deleted once input arrives.
    pub prompt_message_id: i64,
    /// The wizard message to refresh after a successful parse.
    pub wizard_message_id: i64,
}

#[derive(Default)]
pub struct WizardStores {
    configs: HashMap<(SessionKey, &'static str), ConfigState>,
    pending: HashMap<SessionKey, PendingInput>,
}

impl WizardStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session's config for a wizard, created from defaults on first use.
    pub fn config_mut(&mut self, key: SessionKey, spec: &WizardSpec) -> &mut ConfigState {
        self.configs
            .entry((key, spec.id))
            .or_insert_with(|| ConfigState::new(spec))
    }

    pub fn config(&self, key: SessionKey, wizard_id: &'static str) -> Option<&ConfigState> {
        self.configs.get(&(key, wizard_id))
    }

    pub fn set_pending(&mut self, key: SessionKey, pending: PendingInput) {
        self.pending.insert(key, pending);
    }

    pub fn pending(&self, key: SessionKey) -> Option<&PendingInput> {
        self.pending.get(&key)
    }

    pub fn take_pending(&mut self, key: SessionKey) -> Option<PendingInput> {
        self.pending.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ButtonSpec, FieldKind, FieldSpec};

    const FIELDS: &[FieldSpec] = &[FieldSpec {
        key: "limit",
        label: "Limit",
        prompt: "Enter a new limit (1-1000):",
        kind: FieldKind::Int {
            min: 1,
            max: 1000,
            default: 100,
        },
    }];
    const LAYOUT: &[&[ButtonSpec]] = &[];
    const SPEC: WizardSpec = WizardSpec {
        id: "demo",
        command: "demo",
        description: "demo wizard",
        title: "Demo",
        fields: FIELDS,
        layout: LAYOUT,
    };

    #[test]
    fn configs_are_isolated_per_session() {
        let mut stores = WizardStores::new();
        let alice = SessionKey {
            chat_id: 1,
            user_id: 10,
        };
        let bob = SessionKey {
            chat_id: 1,
            user_id: 20,
        };

        let field = SPEC.field("limit").expect("field");
        stores
            .config_mut(alice, &SPEC)
            .set_from_text(field, "5")
            .expect("set");

        assert_eq!(stores.config_mut(alice, &SPEC).int_value("limit"), 5);
        assert_eq!(stores.config_mut(bob, &SPEC).int_value("limit"), 100);
    }

    #[test]
    fn pending_input_never_leaks_across_users() {
        let mut stores = WizardStores::new();
        let alice = SessionKey {
            chat_id: 1,
            user_id: 10,
        };
        let bob = SessionKey {
            chat_id: 1,
            user_id: 20,
        };

        stores.set_pending(
            alice,
            PendingInput {
                wizard: "demo",
                field: "limit",
                prompt_message_id: 7,
                wizard_message_id: 3,
            },
        );

        assert!(stores.pending(bob).is_none());
        let taken = stores.take_pending(alice).expect("pending");
        assert_eq!(taken.field, "limit");
        assert!(stores.pending(alice).is_none());
    }
}
