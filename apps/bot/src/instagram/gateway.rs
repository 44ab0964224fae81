//! HTTP client for an Instagram DM gateway service.
//!
//! Every call is a JSON POST to `{base}/{operation}`; the gateway answers with
//! `{"success": bool, "data"?: .., "message"?: "..", "error"?: ".."}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::instagram::{
    DirectMessage, MessagingTransport, Profile, SendOutcome, TransportError, TransportMode,
};

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GatewayReply<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct GatewayTransport {
    client: Client,
    base_url: String,
}

impl GatewayTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(GATEWAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, T>(&self, operation: &str, body: &B) -> Result<GatewayReply<T>, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, operation);
        debug!("Gateway call: {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                operation: operation.to_string(),
                message: format!("status {status}: {body}"),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch<B, T>(&self, operation: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let reply: GatewayReply<T> = self.post(operation, body).await?;
        match (reply.success, reply.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(TransportError::Rejected {
                operation: operation.to_string(),
                message: reply
                    .error
                    .or(reply.message)
                    .unwrap_or_else(|| "no data returned".to_string()),
            }),
        }
    }
}

#[async_trait]
impl MessagingTransport for GatewayTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Real
    }

    async fn send(&self, username: &str, message: &str) -> SendOutcome {
        let body = json!({ "username": username, "message": message });
        let (success, status_text) =
            match self.post::<_, serde_json::Value>("send_message", &body).await {
                Ok(reply) if reply.success => (
                    true,
                    format!("✅ Real DM sent to @{username}! Message delivered via Instagram."),
                ),
                Ok(reply) => {
                    let reason = reply
                        .error
                        .or(reply.message)
                        .unwrap_or_else(|| "unknown error".to_string());
                    warn!("Gateway refused DM to @{username}: {reason}");
                    (false, format!("❌ Failed to send DM to @{username}: {reason}"))
                }
                Err(e) => {
                    warn!("Gateway send to @{username} failed: {e}");
                    (false, format!("❌ Error sending DM to @{username}: {e}"))
                }
            };

        SendOutcome {
            success,
            mode: TransportMode::Real,
            status_text,
            sent_at: Local::now(),
        }
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<DirectMessage>, TransportError> {
        let mut messages: Vec<DirectMessage> =
            self.fetch("list_chats", &json!({ "limit": limit })).await?;
        messages.truncate(limit);
        Ok(messages)
    }

    async fn get_profile(&self, username: &str) -> Result<Profile, TransportError> {
        self.fetch("get_user_info", &json!({ "username": username }))
            .await
    }
}
