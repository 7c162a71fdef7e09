//! Vybot core runtime
//!
//! Routes inbound chat events to the command wizards: slash commands open a
//! wizard, callbacks mutate its per-session config, and free text feeds a
//! registered pending input. Events are processed sequentially off the bus;
//! the wizard stores sit behind one mutex.

pub mod commands;

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use vybot_api::{VybeClient, VybeError};
use vybot_ipc::{ChatTransport, Envelope, EventBus, MessageKind};
use vybot_wizard::{
    handle_action, parse_callback, render_keyboard, render_text, ActionOutcome, ConfigState,
    PendingInput, SessionKey, WizardSpec, WizardStores,
};

/// One chat command: a wizard schema plus the query it runs.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn spec(&self) -> &'static WizardSpec;

    /// `Some(message)` when a required field is still unset.
    fn missing_input(&self, state: &ConfigState) -> Option<&'static str>;

    /// Run the query and render the result.
    async fn search(&self, client: &VybeClient, state: &ConfigState)
        -> Result<String, VybeError>;

    /// Generic user-facing message for upstream failures.
    fn failure_text(&self) -> &'static str;
}

pub struct BotRuntime {
    transport: Arc<dyn ChatTransport>,
    client: VybeClient,
    commands: Vec<Arc<dyn Command>>,
    stores: Mutex<WizardStores>,
}

impl BotRuntime {
    pub fn new(transport: Arc<dyn ChatTransport>, client: VybeClient) -> Self {
        Self {
            transport,
            client,
            commands: commands::all(),
            stores: Mutex::new(WizardStores::new()),
        }
    }

    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    /// Consume the inbound bus until it closes.
    pub async fn run(&self, bus: EventBus) {
        let mut rx = bus.subscribe();
        info!("bot runtime started");
        loop {
            match rx.recv().await {
                Ok(envelope) => self.handle_envelope(&envelope).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event bus lagged, updates dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("bot runtime stopped");
    }

    pub async fn handle_envelope(&self, envelope: &Envelope) {
        debug!(trace_id = %envelope.trace_id, "handling envelope");
        match &envelope.kind {
            MessageKind::Command { name, .. } => self.handle_command(envelope, name).await,
            MessageKind::Callback { query_id, data } => {
                self.handle_callback(envelope, query_id, data).await
            }
            MessageKind::Message { text } => self.handle_text(envelope, text).await,
        }
    }

    fn session_key(envelope: &Envelope) -> Option<SessionKey> {
        Some(SessionKey {
            chat_id: envelope.chat_id?,
            user_id: envelope.from_user_id?,
        })
    }

    fn command_by_name(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.iter().find(|c| c.spec().command == name)
    }

    fn command_by_id(&self, wizard_id: &str) -> Option<&Arc<dyn Command>> {
        self.commands.iter().find(|c| c.spec().id == wizard_id)
    }

    fn help_text(&self) -> String {
        let mut text = String::from("Available commands:\n\n");
        for command in &self.commands {
            let spec = command.spec();
            text.push_str(&format!("/{} - {}\n", spec.command, spec.description));
        }
        text
    }

    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(error) = self.transport.send_message(chat_id, text, None).await {
            warn!(%error, chat_id, "failed to send message");
        }
    }

    async fn handle_command(&self, envelope: &Envelope, name: &str) {
        let Some(chat_id) = envelope.chat_id else {
            return;
        };

        if name == "start" || name == "help" {
            self.send(chat_id, &self.help_text()).await;
            return;
        }

        let Some(command) = self.command_by_name(name) else {
            debug!(name, "unknown command");
            return;
        };
        let Some(key) = Self::session_key(envelope) else {
            return;
        };

        let spec = command.spec();
        let (text, keyboard) = {
            let mut stores = self.stores.lock().await;
            let state = stores.config_mut(key, spec);
            (render_text(spec, state), render_keyboard(spec, state))
        };
        if let Err(error) = self
            .transport
            .send_message(chat_id, &text, Some(keyboard))
            .await
        {
            warn!(%error, wizard = spec.id, "failed to open wizard");
        }
    }

    async fn handle_callback(&self, envelope: &Envelope, query_id: &str, data: &str) {
        // Always acknowledge, even when the action goes nowhere, so the
        // client never shows a stuck loading state.
        let result = self.dispatch_callback(envelope, data).await;
        if let Err(error) = result {
            warn!(%error, data, "callback handler failed");
        }
        if let Err(error) = self.transport.answer_callback(query_id, None).await {
            debug!(%error, "failed to answer callback query");
        }
    }

    async fn dispatch_callback(&self, envelope: &Envelope, data: &str) -> anyhow::Result<()> {
        let Some((wizard_id, action)) = parse_callback(data) else {
            debug!(data, "unparseable callback data");
            return Ok(());
        };
        let Some(command) = self.command_by_id(wizard_id) else {
            debug!(wizard_id, "callback for unknown wizard");
            return Ok(());
        };
        let (Some(key), Some(chat_id)) = (Self::session_key(envelope), envelope.chat_id) else {
            return Ok(());
        };

        let spec = command.spec();
        let outcome = {
            let mut stores = self.stores.lock().await;
            handle_action(spec, stores.config_mut(key, spec), &action)
        };

        match outcome {
            ActionOutcome::Ignored => {}
            ActionOutcome::Refresh => {
                if let Some(message_id) = envelope.message_id {
                    self.refresh_wizard(key, chat_id, message_id, spec).await;
                }
            }
            ActionOutcome::Prompt { field, prompt } => {
                let prompt_message_id =
                    self.transport.send_message(chat_id, prompt, None).await?;
                let mut stores = self.stores.lock().await;
                stores.set_pending(
                    key,
                    PendingInput {
                        wizard: spec.id,
                        field,
                        prompt_message_id,
                        wizard_message_id: envelope.message_id.unwrap_or(0),
                    },
                );
            }
            ActionOutcome::Search => {
                self.run_search(key, chat_id, command).await;
            }
        }
        Ok(())
    }

    async fn run_search(&self, key: SessionKey, chat_id: i64, command: &Arc<dyn Command>) {
        let spec = command.spec();
        let state = {
            let stores = self.stores.lock().await;
            stores
                .config(key, spec.id)
                .cloned()
                .unwrap_or_else(|| ConfigState::new(spec))
        };

        if let Some(message) = command.missing_input(&state) {
            self.send(chat_id, message).await;
            return;
        }

        match command.search(&self.client, &state).await {
            Ok(text) => self.send(chat_id, &text).await,
            Err(error) => {
                warn!(%error, wizard = spec.id, "upstream query failed");
                self.send(chat_id, command.failure_text()).await;
            }
        }
    }

    async fn handle_text(&self, envelope: &Envelope, text: &str) {
        let (Some(key), Some(chat_id)) = (Self::session_key(envelope), envelope.chat_id) else {
            return;
        };

        let pending = {
            let stores = self.stores.lock().await;
            stores.pending(key).cloned()
        };
        let Some(pending) = pending else {
            return;
        };

        // The user's raw input and our prompt are both cleaned up; either
        // may already be gone.
        if let Some(message_id) = envelope.message_id {
            if let Err(error) = self.transport.delete_message(chat_id, message_id).await {
                debug!(%error, "failed to delete input message");
            }
        }
        if let Err(error) = self
            .transport
            .delete_message(chat_id, pending.prompt_message_id)
            .await
        {
            debug!(%error, "failed to delete prompt message");
        }

        let Some(command) = self.command_by_id(pending.wizard) else {
            return;
        };
        let spec = command.spec();
        let Some(field) = spec.field(pending.field) else {
            return;
        };

        let result = {
            let mut stores = self.stores.lock().await;
            stores.config_mut(key, spec).set_from_text(field, text)
        };

        match result {
            Ok(()) => {
                {
                    let mut stores = self.stores.lock().await;
                    stores.take_pending(key);
                }
                if pending.wizard_message_id != 0 {
                    self.refresh_wizard(key, chat_id, pending.wizard_message_id, spec)
                        .await;
                }
            }
            // The pending input stays registered so the user can retry
            // without tapping the button again.
            Err(error) => self.send(chat_id, &error.to_string()).await,
        }
    }

    async fn refresh_wizard(
        &self,
        key: SessionKey,
        chat_id: i64,
        message_id: i64,
        spec: &'static WizardSpec,
    ) {
        let (text, keyboard) = {
            let mut stores = self.stores.lock().await;
            let state = stores.config_mut(key, spec);
            (render_text(spec, state), render_keyboard(spec, state))
        };
        if let Err(error) = self
            .transport
            .edit_message(chat_id, message_id, &text, Some(keyboard))
            .await
        {
            debug!(%error, "failed to refresh wizard message");
        }
    }
}
