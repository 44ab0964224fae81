use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::settings::{BotMode, BotSettings};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub bot_mode: BotMode,
    pub safe_mode: bool,
    pub log_interactions: bool,
    pub interaction_log_path: PathBuf,
    pub seen_followers_path: PathBuf,
    /// Present only when INSTAGRAM_REAL_MODE is on.
    pub instagram_gateway_url: Option<String>,
    pub llm_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let real_mode = parse_bool("INSTAGRAM_REAL_MODE", &var("INSTAGRAM_REAL_MODE", "false"))?;
        let instagram_gateway_url = if real_mode {
            Some(require(&lookup, "INSTAGRAM_GATEWAY_URL")?)
        } else {
            None
        };

        Ok(Config {
            anthropic_api_key: require(&lookup, "ANTHROPIC_API_KEY")?,
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            bot_mode: var("BOT_MODE", "sassy")
                .parse::<BotMode>()
                .map_err(anyhow::Error::msg)
                .context("BOT_MODE is invalid")?,
            safe_mode: parse_bool("ENABLE_SAFE_MODE", &var("ENABLE_SAFE_MODE", "true"))?,
            log_interactions: parse_bool("LOG_INTERACTIONS", &var("LOG_INTERACTIONS", "true"))?,
            interaction_log_path: var("INTERACTION_LOG_PATH", "interactions.json").into(),
            seen_followers_path: var("SEEN_FOLLOWERS_PATH", "seen_followers.json").into(),
            instagram_gateway_url,
            llm_max_attempts: var("LLM_MAX_ATTEMPTS", "1")
                .parse::<u32>()
                .context("LLM_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
        })
    }

    /// Initial runtime settings; `update_bot_settings` may change them later.
    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            bot_mode: self.bot_mode,
            safe_mode: self.safe_mode,
            log_interactions: self.log_interactions,
        }
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("{key} must be true or false, got '{other}'"),
    }
}
