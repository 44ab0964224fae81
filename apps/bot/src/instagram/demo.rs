//! Demo transport: fixed DMs and profiles, sends that always succeed.

use async_trait::async_trait;
use chrono::Local;
use tracing::info;

use crate::instagram::{
    DirectMessage, MessagingTransport, Profile, SendOutcome, TransportError, TransportMode,
};

pub struct DemoTransport {
    inbox: Vec<DirectMessage>,
}

impl Default for DemoTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoTransport {
    pub fn new() -> Self {
        Self {
            inbox: vec![
                dm(
                    "wellness_guru_fake",
                    "Apple cider vinegar burns belly fat instantly! 🔥",
                    "2025-01-27T13:30:00Z",
                    "demo_thread_001",
                ),
                dm(
                    "fitness_influencer",
                    "Lemon water detoxes your liver completely!",
                    "2025-01-27T13:25:00Z",
                    "demo_thread_002",
                ),
                dm(
                    "health_coach_sus",
                    "Essential oils cure everything! Big pharma doesn't want you to know!",
                    "2025-01-27T13:20:00Z",
                    "demo_thread_003",
                ),
            ],
        }
    }
}

fn dm(username: &str, message: &str, timestamp: &str, thread_id: &str) -> DirectMessage {
    DirectMessage {
        username: username.to_string(),
        message: message.to_string(),
        timestamp: timestamp.to_string(),
        thread_id: thread_id.to_string(),
    }
}

#[async_trait]
impl MessagingTransport for DemoTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Demo
    }

    async fn send(&self, username: &str, _message: &str) -> SendOutcome {
        info!("Demo send to @{username}");
        SendOutcome {
            success: true,
            mode: TransportMode::Demo,
            status_text: format!("✅ Demo: Sassy response sent to @{username} via Instagram DM!"),
            sent_at: Local::now(),
        }
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<DirectMessage>, TransportError> {
        Ok(self.inbox.iter().take(limit).cloned().collect())
    }

    async fn get_profile(&self, username: &str) -> Result<Profile, TransportError> {
        let (followers, following, bio, is_verified, is_business) = match username {
            "wellness_guru_fake" => (
                45_000,
                1_200,
                "🌱 Wellness coach | Natural healing ✨ | DM for detox tips",
                false,
                true,
            ),
            "fitness_influencer" => (
                125_000,
                890,
                "💪 Fitness coach | Transform your body naturally! 🔥",
                true,
                true,
            ),
            _ => (15_000, 500, "Living my best life 💫", false, false),
        };

        Ok(Profile {
            username: username.to_string(),
            followers,
            following,
            bio: bio.to_string(),
            is_verified,
            is_business,
        })
    }
}
