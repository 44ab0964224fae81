//! Messaging transport: the send/receive boundary with Instagram.
//!
//! The bot core never calls this; only the dispatcher relays generated text
//! through it. `DemoTransport` serves canned data, `GatewayTransport` talks to
//! a real Instagram DM gateway over HTTP.

pub mod demo;
pub mod gateway;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use demo::DemoTransport;
pub use gateway::GatewayTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected {operation}: {message}")]
    Rejected { operation: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Demo,
    Real,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Demo => "demo",
            TransportMode::Real => "real",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TransportMode::Demo => "Demo",
            TransportMode::Real => "Real",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound DM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub username: String,
    pub message: String,
    pub timestamp: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_business: bool,
}

/// Outcome of a send. Failures are data, not errors: the caller always gets a status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub mode: TransportMode,
    pub status_text: String,
    pub sent_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationStatus {
    pub mode: TransportMode,
    pub features: Vec<String>,
    pub note: String,
}

#[async_trait]
pub trait MessagingTransport: Send + Sync {
    fn mode(&self) -> TransportMode;

    async fn send(&self, username: &str, message: &str) -> SendOutcome;

    async fn list_recent(&self, limit: usize) -> Result<Vec<DirectMessage>, TransportError>;

    async fn get_profile(&self, username: &str) -> Result<Profile, TransportError>;

    fn status(&self) -> IntegrationStatus {
        let mode = self.mode();
        let label = mode.label();
        IntegrationStatus {
            mode,
            features: vec![
                format!("✅ {label} Instagram DM sending"),
                format!("✅ {label} Instagram DM monitoring"),
                format!("✅ {label} user profile analysis"),
                "✅ Sassy fact-check responses".to_string(),
                "✅ Content safety filtering".to_string(),
                "✅ Citation integration".to_string(),
            ],
            note: match mode {
                TransportMode::Demo => {
                    "Currently in DEMO mode. Set INSTAGRAM_REAL_MODE=true and INSTAGRAM_GATEWAY_URL to go live."
                        .to_string()
                }
                TransportMode::Real => {
                    "Currently in REAL mode, relaying through the Instagram DM gateway.".to_string()
                }
            },
        }
    }
}
