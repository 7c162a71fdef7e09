//! Vybot IPC
//!
//! Event envelope and bus for adapter-to-runtime communication, plus the
//! `ChatTransport` seam the runtime uses to talk back to the chat platform.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;

static NEXT_TRACE_COUNTER: AtomicU64 = AtomicU64::new(1);

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn generate_trace_id() -> String {
    let ts = now_unix_secs();
    let n = NEXT_TRACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("trace-{}-{}", ts, n)
}

fn default_trace_id() -> String {
    generate_trace_id()
}

/// One inbound chat update, normalized away from the transport's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_trace_id")]
    pub trace_id: String,
    pub channel: String,
    pub kind: MessageKind,
    pub chat_id: Option<i64>,
    pub message_id: Option<i64>,
    pub from_user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageKind {
    /// Free-form text from the user.
    #[serde(rename = "message")]
    Message { text: String },

    /// A slash command, e.g. `/balances arg1 arg2`.
    #[serde(rename = "command")]
    Command { name: String, args: Vec<String> },

    /// An inline-button tap carrying its opaque action tag.
    #[serde(rename = "callback")]
    Callback { query_id: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl Envelope {
    pub fn new(channel: &str, kind: MessageKind) -> Self {
        Self {
            trace_id: generate_trace_id(),
            channel: channel.to_string(),
            kind,
            chat_id: None,
            message_id: None,
            from_user_id: None,
        }
    }

    pub fn with_chat_id(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    pub fn with_message_id(mut self, message_id: i64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_from_user_id(mut self, user_id: i64) -> Self {
        self.from_user_id = Some(user_id);
        self
    }
}

pub const EVENT_BUS_CAPACITY: usize = 256;

/// Broadcast channel carrying inbound envelopes from adapters to the runtime.
#[derive(Clone)]
pub struct EventBus {
    inbound: broadcast::Sender<Envelope>,
}

impl EventBus {
    pub fn new() -> Self {
        let (inbound_tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            inbound: inbound_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.inbound.subscribe()
    }

    pub fn publish(&self, envelope: Envelope) -> anyhow::Result<()> {
        self.inbound.send(envelope)?;
        Ok(())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Outbound side of the chat platform.
///
/// `send_message` returns the platform message id so wizards can later edit
/// or delete what they sent. Delete failures are expected (messages the user
/// already removed) and callers treat them as best-effort.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        inline_keyboard: Option<Vec<Vec<InlineButton>>>,
    ) -> anyhow::Result<i64>;

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        inline_keyboard: Option<Vec<Vec<InlineButton>>>,
    ) -> anyhow::Result<()>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> anyhow::Result<()>;

    async fn answer_callback(&self, query_id: &str, text: Option<&str>) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_trace_id() {
        let env = Envelope::new(
            "telegram",
            MessageKind::Message {
                text: "hello".to_string(),
            },
        );
        assert!(env.trace_id.starts_with("trace-"));
    }

    #[test]
    fn trace_id_different_for_each_envelope() {
        let env1 = Envelope::new(
            "telegram",
            MessageKind::Message {
                text: "hello".to_string(),
            },
        );
        let env2 = Envelope::new(
            "telegram",
            MessageKind::Message {
                text: "hello".to_string(),
            },
        );
        assert_ne!(env1.trace_id, env2.trace_id);
    }

    #[test]
    fn builder_sets_routing_fields() {
        let env = Envelope::new(
            "telegram",
            MessageKind::Callback {
                query_id: "q1".to_string(),
                data: "pnl:search".to_string(),
            },
        )
        .with_chat_id(42)
        .with_message_id(7)
        .with_from_user_id(99);

        assert_eq!(env.chat_id, Some(42));
        assert_eq!(env.message_id, Some(7));
        assert_eq!(env.from_user_id, Some(99));
    }

    #[test]
    fn deserialize_without_trace_id_generates_one() {
        let json = r#"{
            "channel": "telegram",
            "kind": {"type": "message", "text": "hi"},
            "chat_id": 1,
            "message_id": 2,
            "from_user_id": 3
        }"#;
        let env: Envelope = serde_json::from_str(json).expect("deserialize");
        assert!(!env.trace_id.is_empty());
    }

    #[tokio::test]
    async fn event_bus_delivers_to_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(Envelope::new(
            "telegram",
            MessageKind::Command {
                name: "balances".to_string(),
                args: vec![],
            },
        ))
        .expect("publish");

        let env = rx.recv().await.expect("recv");
        match env.kind {
            MessageKind::Command { name, .. } => assert_eq!(name, "balances"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }
}
