//! Vybot Telegram Adapter
//!
//! Telegram Bot API long-polling with offset persistence, inline keyboards,
//! callback queries, HTML fallback, and message chunking.

use anyhow::{anyhow, Result};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};
use vybot_config::TelegramConfig;
use vybot_ipc::{ChatTransport, Envelope, EventBus, InlineButton, MessageKind};

const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub text: Option<String>,
    pub chat: TelegramChat,
    pub from: Option<TelegramUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramCallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    pub message: Option<TelegramMessage>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: T,
}

pub struct TelegramAdapter {
    client: Client,
    bot_token: String,
    api_url: String,
    allowed_chats: Option<HashSet<i64>>,
    data_dir: PathBuf,
    poll_timeout_secs: u64,
    bot_commands: Vec<(String, String)>,
    event_bus: Option<EventBus>,
}

impl TelegramAdapter {
    pub fn new(config: &TelegramConfig, data_dir: PathBuf) -> Self {
        let api_url = format!("https://api.telegram.org/bot{}", config.bot_token);
        let allowed_chats = config
            .allowed_chats
            .clone()
            .filter(|items| !items.is_empty())
            .map(|items| items.into_iter().collect());

        Self {
            client: Self::build_client(),
            bot_token: config.bot_token.clone(),
            api_url,
            allowed_chats,
            data_dir,
            poll_timeout_secs: config.poll_timeout_secs.unwrap_or(60),
            bot_commands: Vec::new(),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Commands advertised via setMyCommands at poll startup.
    pub fn with_bot_commands(mut self, commands: Vec<(String, String)>) -> Self {
        self.bot_commands = commands;
        self
    }

    fn build_client() -> Client {
        ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(600))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .timeout(Duration::from_secs(180))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client")
    }

    fn offset_path(&self) -> PathBuf {
        let runtime_dir = self.data_dir.join("runtime");
        let bot_id = self.bot_token.split(':').next().unwrap_or("default");
        runtime_dir.join(format!("telegram.{}.offset", bot_id))
    }

    fn is_chat_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&chat_id))
    }

    async fn read_offset(&self) -> Option<i64> {
        match fs::read_to_string(self.offset_path()).await {
            Ok(content) => content.trim().parse().ok(),
            Err(_) => None,
        }
    }

    async fn write_offset(&self, offset: i64) {
        let p = self.offset_path();
        if let Some(parent) = p.parent() {
            let _ = fs::create_dir_all(parent).await;
        }
        let _ = fs::write(&p, format!("{}\n", offset)).await;
    }

    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<TelegramUpdate>> {
        let url = format!("{}/getUpdates", self.api_url);

        let mut payload = serde_json::json!({
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            payload["offset"] = serde_json::json!(offset);
        }

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("telegram getUpdates request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("telegram getUpdates HTTP error: {}", e))?;

        let parsed: ApiResponse<Vec<TelegramUpdate>> = resp
            .json()
            .await
            .map_err(|e| anyhow!("telegram getUpdates decode failed: {}", e))?;

        if !parsed.ok {
            return Err(anyhow!("telegram getUpdates returned ok=false"));
        }

        Ok(parsed.result)
    }

    fn keyboard_markup(keyboard: &[Vec<InlineButton>]) -> serde_json::Value {
        serde_json::json!({
            "inline_keyboard": keyboard.iter().map(|row| {
                row.iter().map(|btn| serde_json::json!({
                    "text": btn.text,
                    "callback_data": btn.callback_data
                })).collect::<Vec<_>>()
            }).collect::<Vec<_>>()
        })
    }

    /// Send, preferring HTML; a payload Telegram rejects is retried without
    /// parse_mode so the user still gets the text.
    async fn send_with_html_fallback(
        &self,
        url: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let endpoint = url.rsplit('/').next().unwrap_or("telegram");

        let first_resp = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("telegram {} request failed: {}", endpoint, e))?;

        if first_resp.status().is_success() {
            let parsed: ApiResponse<serde_json::Value> = first_resp
                .json()
                .await
                .map_err(|e| anyhow!("telegram {} decode failed: {}", endpoint, e))?;
            if parsed.ok {
                return Ok(parsed.result);
            }
            warn!(
                "telegram {} returned ok=false with HTML payload, retrying without parse_mode",
                endpoint
            );
        } else {
            let status = first_resp.status();
            let body = first_resp.text().await.unwrap_or_default();
            warn!(
                "telegram {} HTTP {} with HTML payload, retrying without parse_mode: {}",
                endpoint, status, body
            );
        }

        let mut fallback_payload = payload;
        if let Some(obj) = fallback_payload.as_object_mut() {
            obj.remove("parse_mode");
        }

        let fallback_resp = self
            .client
            .post(url)
            .json(&fallback_payload)
            .send()
            .await
            .map_err(|e| anyhow!("telegram {} fallback request failed: {}", endpoint, e))?;

        if !fallback_resp.status().is_success() {
            let status = fallback_resp.status();
            let body = fallback_resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "telegram {} fallback HTTP {}: {}",
                endpoint,
                status,
                body
            ));
        }

        let parsed: ApiResponse<serde_json::Value> = fallback_resp
            .json()
            .await
            .map_err(|e| anyhow!("telegram {} fallback decode failed: {}", endpoint, e))?;
        if !parsed.ok {
            return Err(anyhow!("telegram {} fallback returned ok=false", endpoint));
        }

        Ok(parsed.result)
    }

    async fn sync_bot_commands(&self) -> Result<()> {
        if self.bot_commands.is_empty() {
            return Ok(());
        }

        let url = format!("{}/setMyCommands", self.api_url);
        let commands: Vec<serde_json::Value> = self
            .bot_commands
            .iter()
            .map(|(command, description)| {
                serde_json::json!({ "command": command, "description": description })
            })
            .collect();
        let payload = serde_json::json!({ "commands": commands });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("telegram setMyCommands request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("telegram setMyCommands HTTP {}: {}", status, body));
        }

        let parsed: ApiResponse<serde_json::Value> = resp
            .json()
            .await
            .map_err(|e| anyhow!("telegram setMyCommands decode failed: {}", e))?;
        if !parsed.ok {
            return Err(anyhow!("telegram setMyCommands returned ok=false"));
        }

        Ok(())
    }

    pub async fn poll(&self) -> Result<()> {
        let mut offset: Option<i64> = self.read_offset().await;

        info!(offset = ?offset, "Telegram polling started");

        if let Err(err) = self.sync_bot_commands().await {
            warn!("Failed to sync Telegram bot commands: {}", err);
        } else {
            info!("Telegram bot commands synced");
        }

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(v) => v,
                Err(err) => {
                    warn!("Telegram polling error: {}", err);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                self.write_offset(update.update_id + 1).await;

                if let Some(message) = &update.message {
                    self.handle_message(message).await;
                }
                if let Some(callback) = &update.callback_query {
                    self.handle_callback(callback).await;
                }
            }
        }
    }

    async fn handle_message(&self, message: &TelegramMessage) {
        let chat_id = message.chat.id;

        if !self.is_chat_allowed(chat_id) {
            info!("Skipping message from unauthorized chat {}", chat_id);
            return;
        }

        let Some(text) = &message.text else {
            return;
        };

        let from_username = message
            .from
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .unwrap_or("unknown");
        info!("Received message from {}: {}", from_username, text);

        let Some(event_bus) = &self.event_bus else {
            info!("No event bus configured, message not forwarded");
            return;
        };

        let mut envelope = Envelope::new("telegram", parse_inbound_text(text))
            .with_chat_id(chat_id)
            .with_message_id(message.message_id);
        if let Some(from) = &message.from {
            envelope = envelope.with_from_user_id(from.id);
        }

        if let Err(e) = event_bus.publish(envelope) {
            warn!("Failed to publish message to event bus: {}", e);
        }
    }

    async fn handle_callback(&self, callback: &TelegramCallbackQuery) {
        let chat_id = callback.message.as_ref().map(|m| m.chat.id);
        let message_id = callback.message.as_ref().map(|m| m.message_id);
        let data = callback.data.clone().unwrap_or_default();

        info!("Received callback query: {}", data);

        if let Some(chat_id) = chat_id {
            if !self.is_chat_allowed(chat_id) {
                info!("Skipping callback from unauthorized chat {}", chat_id);
                return;
            }
        }

        let Some(event_bus) = &self.event_bus else {
            return;
        };
        let Some(chat_id) = chat_id else {
            // Callbacks from inaccessible messages cannot be routed; ack only.
            let _ = self.answer_callback(&callback.id, None).await;
            return;
        };

        let mut envelope = Envelope::new(
            "telegram",
            MessageKind::Callback {
                query_id: callback.id.clone(),
                data,
            },
        )
        .with_chat_id(chat_id)
        .with_from_user_id(callback.from.id);
        if let Some(message_id) = message_id {
            envelope = envelope.with_message_id(message_id);
        }

        if let Err(e) = event_bus.publish(envelope) {
            warn!("Failed to publish callback to event bus: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for TelegramAdapter {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        inline_keyboard: Option<Vec<Vec<InlineButton>>>,
    ) -> Result<i64> {
        let chunks = chunk_message(text);
        let url = format!("{}/sendMessage", self.api_url);
        let mut last_message_id = 0;

        for (i, chunk) in chunks.iter().enumerate() {
            let mut payload = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "HTML",
            });

            // The keyboard goes on the last chunk, which is also the message
            // the caller gets back to edit or delete later.
            if i == chunks.len() - 1 {
                if let Some(keyboard) = &inline_keyboard {
                    payload["reply_markup"] = Self::keyboard_markup(keyboard);
                }
            }

            let result = self.send_with_html_fallback(&url, payload).await?;
            last_message_id = result
                .get("message_id")
                .and_then(|v| v.as_i64())
                .ok_or_else(|| anyhow!("telegram sendMessage result missing message_id"))?;
        }

        Ok(last_message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        inline_keyboard: Option<Vec<Vec<InlineButton>>>,
    ) -> Result<()> {
        // editMessageText cannot be chunked: fall back to a new message if too long.
        if text.chars().count() > TELEGRAM_MAX_MESSAGE_LEN {
            self.send_message(chat_id, text, inline_keyboard).await?;
            return Ok(());
        }

        let url = format!("{}/editMessageText", self.api_url);
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = &inline_keyboard {
            payload["reply_markup"] = Self::keyboard_markup(keyboard);
        }

        self.send_with_html_fallback(&url, payload).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        let url = format!("{}/deleteMessage", self.api_url);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("telegram deleteMessage request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("telegram deleteMessage HTTP {}: {}", status, body));
        }

        Ok(())
    }

    async fn answer_callback(&self, query_id: &str, text: Option<&str>) -> Result<()> {
        let url = format!("{}/answerCallbackQuery", self.api_url);
        let mut payload = serde_json::json!({
            "callback_query_id": query_id,
        });
        if let Some(t) = text {
            payload["text"] = serde_json::json!(t);
        }

        let _ = self.client.post(&url).json(&payload).send().await;
        Ok(())
    }
}

/// Classify an inbound message: `/command[@bot] args...` or plain text.
fn parse_inbound_text(text: &str) -> MessageKind {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        if let Some(first) = parts.next() {
            let name = first.split('@').next().unwrap_or(first).to_string();
            if !name.is_empty() {
                return MessageKind::Command {
                    name,
                    args: parts.map(str::to_string).collect(),
                };
            }
        }
    }
    MessageKind::Message {
        text: text.to_string(),
    }
}

fn chunk_message(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= TELEGRAM_MAX_MESSAGE_LEN {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let mut end = (start + TELEGRAM_MAX_MESSAGE_LEN).min(chars.len());

        if end < chars.len() {
            let mut split = end;
            for i in (start..end).rev() {
                let c = chars[i];
                if c == '\n' || c == ' ' || c == '.' || c == '!' || c == '?' {
                    split = i + 1;
                    break;
                }
            }
            if split > start {
                end = split;
            }
        }

        chunks.push(chars[start..end].iter().collect::<String>());
        start = end;
    }

    chunks
}
