//! Runtime bot settings shared by the generator and the dispatcher.
//!
//! Seeded from `Config` at startup and handed to the generator and dispatcher at
//! construction. The `update_bot_settings` tool mutates the shared copy for the
//! lifetime of the process; nothing here reads process environment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Personality mode for generated replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotMode {
    #[default]
    Sassy,
    Neutral,
    Unhinged,
}

impl BotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotMode::Sassy => "sassy",
            BotMode::Neutral => "neutral",
            BotMode::Unhinged => "unhinged",
        }
    }
}

impl fmt::Display for BotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sassy" => Ok(BotMode::Sassy),
            "neutral" => Ok(BotMode::Neutral),
            "unhinged" => Ok(BotMode::Unhinged),
            other => Err(format!(
                "unknown bot mode '{other}' (expected sassy, neutral or unhinged)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    pub bot_mode: BotMode,
    /// Sensitive topics get the soft tone. When off they fall back to neutral, never sassy.
    pub safe_mode: bool,
    pub log_interactions: bool,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            bot_mode: BotMode::Sassy,
            safe_mode: true,
            log_interactions: true,
        }
    }
}

/// Partial update applied by `update_bot_settings`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub bot_mode: Option<BotMode>,
    pub safe_mode: Option<bool>,
    pub log_interactions: Option<bool>,
}

impl BotSettings {
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(mode) = update.bot_mode {
            self.bot_mode = mode;
        }
        if let Some(safe) = update.safe_mode {
            self.safe_mode = safe;
        }
        if let Some(log) = update.log_interactions {
            self.log_interactions = log;
        }
    }
}

/// Settings shared between the generator and the dispatcher.
pub type SharedSettings = Arc<RwLock<BotSettings>>;

pub fn shared(settings: BotSettings) -> SharedSettings {
    Arc::new(RwLock::new(settings))
}
