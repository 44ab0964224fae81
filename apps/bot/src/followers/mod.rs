//! Follower welcoming: remembers who has been greeted and picks welcome DMs.
//!
//! The seen set lives in a small JSON file `{followers, last_updated}` that is
//! rewritten whenever a new follower is seen. Save failures are logged and
//! otherwise ignored; the in-memory set stays authoritative for the process.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::generation::canned::Picker;
use crate::storage::{read_json, write_json};

pub const WELCOME_MESSAGES: &[&str] = &[
    "Hey! 👋 I'm your new favorite fact-checking bestie! Send me some questionable health claims and watch me roast them with CITATIONS 🔥📚",
    "Welcome to the fact-check squad! 💅 I specialize in destroying bad takes with sass and science. DM me your wildest health 'facts' and let's see what happens! ✨",
    "New follower alert! 🚨 I'm here to serve facts with a side of attitude. Send me those 'doctors hate this one trick' posts and watch me work my magic! 🎭",
    "Hi gorgeous! 💖 I fact-check nonsense for a living and I'm REALLY good at it. Try me with your most unhinged health claims - I dare you! 😈",
    "Welcome to the chaos! 🌪️ I'm the bot that makes misinformation cry. DM me anything that sounds too good to be true and I'll tell you why it probably is! 💯",
];

const HEALTH_HANDLE_WORDS: &[&str] = &["health", "wellness", "fitness", "nutrition"];
const PARENT_HANDLE_WORDS: &[&str] = &["mama", "mom", "mother"];

const HEALTH_BONUS: &str =
    " I see you're in the health space - perfect! I LIVE for debunking wellness myths! 💪";
const PARENT_BONUS: &str = " Fellow parent vibes! I'm here to help you sort through all that parenting 'advice' floating around! 👶✨";

/// A follower as reported by the messaging platform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Follower {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// On-disk layout of the seen-followers store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SeenFollowers {
    followers: BTreeSet<String>,
    last_updated: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowerStats {
    pub total_seen_followers: usize,
    pub messages_available: usize,
    pub last_updated: Option<DateTime<Local>>,
}

pub struct FollowerWelcomer {
    path: PathBuf,
    seen: Mutex<SeenFollowers>,
    picker: Picker,
}

impl FollowerWelcomer {
    /// Loads the seen set from `path`. An unreadable file starts an empty set.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let seen = match read_json::<SeenFollowers>(&path).await {
            Ok(seen) => seen.unwrap_or_default(),
            Err(e) => {
                warn!("Error loading seen followers, starting fresh: {e}");
                SeenFollowers::default()
            }
        };

        Self {
            path,
            seen: Mutex::new(seen),
            picker: Picker::from_entropy(),
        }
    }

    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    /// Returns the usernames never seen before, in input order, and marks them seen.
    pub async fn check_for_new_followers(&self, current: &[Follower]) -> Vec<String> {
        let mut seen = self.seen.lock().await;

        let mut new_followers = Vec::new();
        for follower in current {
            let username = follower.username.trim();
            if username.is_empty() {
                continue;
            }
            if seen.followers.insert(username.to_string()) {
                new_followers.push(username.to_string());
            }
        }

        if !new_followers.is_empty() {
            seen.last_updated = Some(Local::now());
            if let Err(e) = write_json(&self.path, &*seen).await {
                warn!("Error saving seen followers: {e}");
            }
            info!(
                "Found {} new followers: {:?}",
                new_followers.len(),
                new_followers
            );
        }

        new_followers
    }

    /// A random welcome message, with a bonus line for health or parent handles.
    pub fn welcome_message_for(&self, username: &str) -> String {
        let mut message = self.picker.pick(WELCOME_MESSAGES).to_string();

        let handle = username.to_lowercase();
        if HEALTH_HANDLE_WORDS.iter().any(|w| handle.contains(w)) {
            message.push_str(HEALTH_BONUS);
        } else if PARENT_HANDLE_WORDS.iter().any(|w| handle.contains(w)) {
            message.push_str(PARENT_BONUS);
        }

        message
    }

    pub async fn stats(&self) -> FollowerStats {
        let seen = self.seen.lock().await;
        FollowerStats {
            total_seen_followers: seen.followers.len(),
            messages_available: WELCOME_MESSAGES.len(),
            last_updated: seen.last_updated,
        }
    }
}
