//! Vybot Configuration
//!
//! TOML configuration loading with environment variable overrides for
//! secrets (bot token, upstream API key).

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://api.vybenetwork.xyz";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub vybe: VybeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoreConfig {
    pub data_dir: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Chats the bot answers in. Empty/absent means all chats are allowed.
    pub allowed_chats: Option<Vec<i64>>,
    pub poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VybeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for VybeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text and apply environment overrides.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).context("invalid config file")?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Load from an explicit path, or the default location. A missing
    /// default file yields a default config (env vars can still fill in
    /// the secrets).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    let mut config = Config::default();
                    config.apply_env_overrides();
                    Ok(config)
                }
            }
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("no config directory available"))?;
        Ok(base.join("vybot").join("config.toml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.core.data_dir {
            return Ok(PathBuf::from(dir));
        }
        let base = dirs::data_dir().ok_or_else(|| anyhow!("no data directory available"))?;
        Ok(base.join("vybot"))
    }

    pub fn log_level(&self) -> &str {
        self.core.log_level.as_deref().unwrap_or("info")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("VYBOT_BOT_TOKEN") {
            if !token.is_empty() {
                self.telegram.bot_token = token;
            }
        }
        if let Ok(key) = std::env::var("VYBE_API_KEY") {
            if !key.is_empty() {
                self.vybe.api_key = key;
            }
        }
    }

    /// Everything `start` needs before spawning the adapters.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            return Err(anyhow!(
                "telegram.bot_token is not set (config file or VYBOT_BOT_TOKEN)"
            ));
        }
        if self.vybe.api_key.is_empty() {
            return Err(anyhow!("vybe.api_key is not set (config file or VYBE_API_KEY)"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let text = r#"
            [core]
            data_dir = "/tmp/vybot"
            log_level = "debug"

            [telegram]
            bot_token = "123:ABC"
            allowed_chats = [1, 2, 3]
            poll_timeout_secs = 30

            [vybe]
            api_key = "k"
            base_url = "http://localhost:9999"
        "#;
        let config: Config = toml::from_str(text).expect("parse");
        assert_eq!(config.core.log_level.as_deref(), Some("debug"));
        assert_eq!(config.telegram.bot_token, "123:ABC");
        assert_eq!(config.telegram.allowed_chats, Some(vec![1, 2, 3]));
        assert_eq!(config.vybe.base_url, "http://localhost:9999");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert!(config.telegram.bot_token.is_empty());
        assert_eq!(config.vybe.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn validate_rejects_missing_secrets() {
        let config: Config = toml::from_str("").expect("parse");
        assert!(config.validate().is_err());

        let text = r#"
            [telegram]
            bot_token = "123:ABC"

            [vybe]
            api_key = "k"
        "#;
        let config: Config = toml::from_str(text).expect("parse");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let text = r#"
            [core]
            data_dir = "/srv/vybot-data"
        "#;
        let config: Config = toml::from_str(text).expect("parse");
        assert_eq!(
            config.data_dir().expect("data dir"),
            PathBuf::from("/srv/vybot-data")
        );
    }
}
