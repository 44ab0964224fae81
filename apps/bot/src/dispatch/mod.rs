//! Command surface: named tools that take JSON arguments and answer with a
//! human-readable text block.
//!
//! The dispatcher owns the composition. The generator decides what to say, the
//! transport decides how it travels, and this module glues them to a tool name.

pub mod format;
pub mod handlers;

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::filter::ContentCategory;
use crate::followers::{Follower, FollowerWelcomer};
use crate::generation::generator::{FactCheckResult, MessageType, ResponseGenerator};
use crate::generation::sources::extract_sources;
use crate::instagram::MessagingTransport;
use crate::interactions::InteractionLog;
use crate::settings::{SettingsUpdate, SharedSettings};

const DEFAULT_USERNAME: &str = "unknown_user";
const DEFAULT_DM_LIMIT: usize = 5;
const FILTER_PROBE: &str = "This is a test message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    FactCheckDm,
    SendSassyInstagramDm,
    CheckInstagramDms,
    GetInstagramUserProfile,
    InstagramIntegrationStatus,
    WelcomeNewFollowers,
    GetBotStats,
    TestBotSystem,
    UpdateBotSettings,
}

impl Tool {
    pub const ALL: [Tool; 9] = [
        Tool::FactCheckDm,
        Tool::SendSassyInstagramDm,
        Tool::CheckInstagramDms,
        Tool::GetInstagramUserProfile,
        Tool::InstagramIntegrationStatus,
        Tool::WelcomeNewFollowers,
        Tool::GetBotStats,
        Tool::TestBotSystem,
        Tool::UpdateBotSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::FactCheckDm => "fact_check_dm",
            Tool::SendSassyInstagramDm => "send_sassy_instagram_dm",
            Tool::CheckInstagramDms => "check_instagram_dms",
            Tool::GetInstagramUserProfile => "get_instagram_user_profile",
            Tool::InstagramIntegrationStatus => "instagram_integration_status",
            Tool::WelcomeNewFollowers => "welcome_new_followers",
            Tool::GetBotStats => "get_bot_stats",
            Tool::TestBotSystem => "test_bot_system",
            Tool::UpdateBotSettings => "update_bot_settings",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::FactCheckDm => "Fact-check content from Instagram DMs with sassy responses",
            Tool::SendSassyInstagramDm => {
                "Send a sassy fact-check response via Instagram DM"
            }
            Tool::CheckInstagramDms => "📱 Check Instagram DMs for new fact-check requests",
            Tool::GetInstagramUserProfile => "👤 Get an Instagram user's profile for context",
            Tool::InstagramIntegrationStatus => {
                "🔍 Show Instagram integration status and capabilities"
            }
            Tool::WelcomeNewFollowers => "Send welcome messages to new Instagram followers",
            Tool::GetBotStats => "Get daily statistics and analytics for the bot",
            Tool::TestBotSystem => "Test all bot components (completion service, filters, logging)",
            Tool::UpdateBotSettings => "Update bot personality and behavior settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tool arguments
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FactCheckArgs {
    #[serde(default)]
    content: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    message_type: MessageType,
}

#[derive(Debug, Deserialize)]
struct SendDmArgs {
    #[serde(default)]
    username: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    custom_response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckDmsArgs {
    #[serde(default = "default_dm_limit")]
    limit: usize,
}

fn default_dm_limit() -> usize {
    DEFAULT_DM_LIMIT
}

#[derive(Debug, Deserialize)]
struct ProfileArgs {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct WelcomeArgs {
    #[serde(default)]
    followers_list: Vec<Follower>,
}

#[derive(Debug, Deserialize)]
struct StatsArgs {
    #[serde(default)]
    date: Option<String>,
}

/// Outcome of the system self-test, one flag per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemCheck {
    pub completion_service: bool,
    pub content_filter: bool,
    pub interaction_log: bool,
}

impl SystemCheck {
    pub fn all_passed(&self) -> bool {
        self.completion_service && self.content_filter && self.interaction_log
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

pub struct Dispatcher {
    generator: Arc<ResponseGenerator>,
    transport: Arc<dyn MessagingTransport>,
    welcomer: Arc<FollowerWelcomer>,
    interactions: Arc<InteractionLog>,
    settings: SharedSettings,
}

impl Dispatcher {
    pub fn new(
        generator: Arc<ResponseGenerator>,
        transport: Arc<dyn MessagingTransport>,
        welcomer: Arc<FollowerWelcomer>,
        interactions: Arc<InteractionLog>,
        settings: SharedSettings,
    ) -> Self {
        Self {
            generator,
            transport,
            welcomer,
            interactions,
            settings,
        }
    }

    /// Runs the tool called `name` with JSON `args` and returns its text block.
    ///
    /// Unknown names are `NotFound`; arguments that do not decode are `Validation`.
    /// Missing required input is answered with a ❌ text, not an error.
    pub async fn call(&self, name: &str, args: Value) -> Result<String, AppError> {
        let tool = Tool::from_name(name)
            .ok_or_else(|| AppError::NotFound(format!("Unknown tool: {name}")))?;
        info!("Dispatching tool {tool}");

        match tool {
            Tool::FactCheckDm => self.fact_check_dm(parse_args(tool, args)?).await,
            Tool::SendSassyInstagramDm => self.send_sassy_dm(parse_args(tool, args)?).await,
            Tool::CheckInstagramDms => self.check_dms(parse_args(tool, args)?).await,
            Tool::GetInstagramUserProfile => self.user_profile(parse_args(tool, args)?).await,
            Tool::InstagramIntegrationStatus => {
                Ok(format::integration_status(&self.transport.status()))
            }
            Tool::WelcomeNewFollowers => self.welcome_followers(parse_args(tool, args)?).await,
            Tool::GetBotStats => self.bot_stats(parse_args(tool, args)?).await,
            Tool::TestBotSystem => Ok(format::system_check(&self.self_test().await)),
            Tool::UpdateBotSettings => self.update_settings(parse_args(tool, args)?).await,
        }
    }

    async fn fact_check_dm(&self, args: FactCheckArgs) -> Result<String, AppError> {
        if args.content.trim().is_empty() && args.message_type == MessageType::Text {
            return Ok(format::NO_CONTENT.to_string());
        }

        let username = non_empty_or(&args.username, DEFAULT_USERNAME);
        let result = self
            .generator
            .respond(username, &args.content, args.message_type)
            .await;

        Ok(format::fact_check(username, args.message_type, &result))
    }

    async fn send_sassy_dm(&self, args: SendDmArgs) -> Result<String, AppError> {
        let username = args.username.trim();
        if username.is_empty() || args.content.trim().is_empty() {
            return Ok(format::DM_INPUT_REQUIRED.to_string());
        }

        let result = match args.custom_response.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => self.custom_reply(&args.content, custom),
            _ => {
                self.generator
                    .respond(username, &args.content, MessageType::Text)
                    .await
            }
        };

        let outcome = if result.should_send {
            Some(self.transport.send(username, &result.response_text).await)
        } else {
            info!("Not relaying {} reply to @{username}", result.category);
            None
        };

        Ok(format::sent_dm(
            username,
            &args.content,
            &result,
            outcome.as_ref(),
        ))
    }

    /// An operator-written reply still passes through the filter so blocked
    /// content is never relayed.
    fn custom_reply(&self, content: &str, custom: &str) -> FactCheckResult {
        let filter = self.generator.filter();
        let classification = filter.classify(content);
        FactCheckResult {
            response_text: custom.to_string(),
            tone_used: classification.tone.into(),
            category: classification.category.into(),
            sources: extract_sources(custom),
            should_send: filter.should_respond(classification.category),
        }
    }

    async fn check_dms(&self, args: CheckDmsArgs) -> Result<String, AppError> {
        let messages = match self.transport.list_recent(args.limit).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Listing DMs failed: {e}");
                return Ok(format!("❌ Could not check Instagram DMs: {e}"));
            }
        };

        if messages.is_empty() {
            return Ok(format::NO_NEW_DMS.to_string());
        }

        // Previews are not replies, so they stay out of the interaction log.
        let mut previews = Vec::with_capacity(messages.len());
        for dm in messages {
            let preview = self.generator.generate(&dm.message, MessageType::Text).await;
            previews.push((dm, preview));
        }

        Ok(format::dm_previews(&previews))
    }

    async fn user_profile(&self, args: ProfileArgs) -> Result<String, AppError> {
        let username = args.username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Ok(format::PROFILE_INPUT_REQUIRED.to_string());
        }

        match self.transport.get_profile(username).await {
            Ok(profile) => Ok(format::profile(&profile)),
            Err(e) => {
                warn!("Profile lookup for @{username} failed: {e}");
                Ok(format!("❌ Could not fetch profile for @{username}: {e}"))
            }
        }
    }

    async fn welcome_followers(&self, args: WelcomeArgs) -> Result<String, AppError> {
        if args.followers_list.is_empty() {
            return Ok(format::NO_FOLLOWERS_LIST.to_string());
        }

        let new_followers = self
            .welcomer
            .check_for_new_followers(&args.followers_list)
            .await;
        if new_followers.is_empty() {
            return Ok(format::NO_NEW_FOLLOWERS.to_string());
        }

        let welcomes: Vec<(String, String)> = new_followers
            .into_iter()
            .map(|username| {
                let message = self.welcomer.welcome_message_for(&username);
                (username, message)
            })
            .collect();

        Ok(format::welcomes(&welcomes))
    }

    async fn bot_stats(&self, args: StatsArgs) -> Result<String, AppError> {
        let date = match args.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| {
                    AppError::Validation(format!("date must be YYYY-MM-DD, got '{raw}'"))
                })?,
            _ => Local::now().date_naive(),
        };

        let daily = self.interactions.daily_stats(date).await?;
        let followers = self.welcomer.stats().await;

        Ok(format::bot_stats(&daily, &followers))
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<String, AppError> {
        let current = {
            let mut settings = self.settings.write().await;
            settings.apply(&update);
            *settings
        };
        info!(
            "Settings updated: mode={} safe_mode={} log_interactions={}",
            current.bot_mode, current.safe_mode, current.log_interactions
        );

        Ok(format::settings_updated(&current))
    }

    /// Pings the completion service, classifies a probe text and touches the
    /// interaction log without adding a record.
    pub async fn self_test(&self) -> SystemCheck {
        let completion_service = match self.generator.completion().ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Completion service check failed: {e}");
                false
            }
        };

        let content_filter =
            self.generator.filter().classify(FILTER_PROBE).category == ContentCategory::Safe;

        let interaction_log = match self.interactions.probe().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Interaction log check failed: {e}");
                false
            }
        };

        SystemCheck {
            completion_service,
            content_filter,
            interaction_log,
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: Tool, args: Value) -> Result<T, AppError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AppError::Validation(format!("Invalid arguments for {tool}: {e}")))
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::canned::Picker;
    use crate::instagram::DemoTransport;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::settings::{shared, BotMode, BotSettings};
    use serde_json::json;
    use tempfile::TempDir;

    struct Harness {
        dispatcher: Dispatcher,
        completion: Arc<ScriptedCompletion>,
        interactions: Arc<InteractionLog>,
        settings: SharedSettings,
        _dir: TempDir,
    }

    async fn harness(completion: ScriptedCompletion) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let settings = shared(BotSettings::default());
        let completion = Arc::new(completion);
        let interactions = Arc::new(InteractionLog::new(dir.path().join("interactions.json")));
        let generator = ResponseGenerator::new(completion.clone(), settings.clone())
            .with_interaction_log(interactions.clone())
            .with_picker(Picker::seeded(7));
        let welcomer = FollowerWelcomer::load(dir.path().join("seen_followers.json"))
            .await
            .with_picker(Picker::seeded(7));

        let dispatcher = Dispatcher::new(
            Arc::new(generator),
            Arc::new(DemoTransport::new()),
            Arc::new(welcomer),
            interactions.clone(),
            settings.clone(),
        );

        Harness {
            dispatcher,
            completion,
            interactions,
            settings,
            _dir: dir,
        }
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("drop_tables"), None);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let err = h.dispatcher.call("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_undecodable_arguments_are_validation_errors() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let err = h
            .dispatcher
            .call("check_instagram_dms", json!({"limit": "lots"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = h
            .dispatcher
            .call("update_bot_settings", json!({"bot_mode": "feral"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fact_check_without_content_makes_no_calls() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("fact_check_dm", json!({"content": "   ", "username": "bob"}))
            .await
            .unwrap();
        assert!(text.starts_with("❌"));
        assert_eq!(h.completion.calls(), 0);
        assert!(h.interactions.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fact_check_renders_result_and_logs() {
        let h = harness(ScriptedCompletion::replying(&[
            "Bestie, no 💀 ACV doesn't melt fat. Source: Mayo Clinic",
        ]))
        .await;
        let text = h
            .dispatcher
            .call(
                "fact_check_dm",
                json!({"content": "Apple cider vinegar burns belly fat", "username": "wellness_guru_fake"}),
            )
            .await
            .unwrap();

        assert!(text.contains("@wellness_guru_fake"));
        assert!(text.contains("**Tone Used:** sassy"));
        assert!(text.contains("Mayo Clinic"));
        assert!(text.contains("✅ Yes"));

        let log = h.interactions.load().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].username, "wellness_guru_fake");
    }

    #[tokio::test]
    async fn test_fact_check_photo_without_caption_uses_canned_reply() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call(
                "fact_check_dm",
                json!({"content": "", "message_type": "photo"}),
            )
            .await
            .unwrap();
        assert!(text.contains("@unknown_user"));
        assert!(text.contains("no_text"));
        assert_eq!(h.completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_requires_username_and_content() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("send_sassy_instagram_dm", json!({"username": "bob"}))
            .await
            .unwrap();
        assert!(text.starts_with("❌"));
        assert_eq!(h.completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_relays_generated_reply() {
        let h = harness(ScriptedCompletion::replying(&["Lemon water is just water, babe 🍋"])).await;
        let text = h
            .dispatcher
            .call(
                "send_sassy_instagram_dm",
                json!({"username": "fitness_influencer", "content": "Lemon water detoxes your liver"}),
            )
            .await
            .unwrap();
        assert!(text.contains("Lemon water is just water"));
        assert!(text.contains("Sent: ✅"));
        assert!(text.contains("DEMO"));
    }

    #[tokio::test]
    async fn test_send_never_relays_blocked_content() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call(
                "send_sassy_instagram_dm",
                json!({"username": "troll", "content": "The flat earth truth they hide from you"}),
            )
            .await
            .unwrap();
        assert!(text.contains("Sent: ❌"));
        assert!(text.contains("Not relayed"));
        assert_eq!(h.completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_with_custom_response_skips_generation() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call(
                "send_sassy_instagram_dm",
                json!({
                    "username": "health_coach_sus",
                    "content": "Essential oils cure everything",
                    "custom_response": "Oils are for salads, sweetie. Source: FDA"
                }),
            )
            .await
            .unwrap();
        assert!(text.contains("Oils are for salads"));
        assert!(text.contains("FDA"));
        assert!(text.contains("Sent: ✅"));
        assert_eq!(h.completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_check_dms_previews_without_logging() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("check_instagram_dms", json!({"limit": 2}))
            .await
            .unwrap();
        assert!(text.contains("(2 messages)"));
        assert!(text.contains("@wellness_guru_fake"));
        assert!(!text.contains("@health_coach_sus"));
        assert_eq!(h.completion.calls(), 2);
        assert!(h.interactions.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_dms_defaults_limit() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("check_instagram_dms", Value::Null)
            .await
            .unwrap();
        assert!(text.contains("(3 messages)"));
    }

    #[tokio::test]
    async fn test_profile_lookup() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("get_instagram_user_profile", json!({"username": "@fitness_influencer"}))
            .await
            .unwrap();
        assert!(text.contains("@fitness_influencer"));
        assert!(text.contains("125000"));

        let missing = h
            .dispatcher
            .call("get_instagram_user_profile", json!({}))
            .await
            .unwrap();
        assert!(missing.starts_with("❌"));
    }

    #[tokio::test]
    async fn test_integration_status_mentions_demo_mode() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("instagram_integration_status", json!({}))
            .await
            .unwrap();
        assert!(text.contains("DEMO"));
    }

    #[tokio::test]
    async fn test_welcome_followers_only_greets_new_ones() {
        let h = harness(ScriptedCompletion::replying(&[])).await;

        let empty = h
            .dispatcher
            .call("welcome_new_followers", json!({"followers_list": []}))
            .await
            .unwrap();
        assert!(empty.starts_with("❌"));

        let first = h
            .dispatcher
            .call(
                "welcome_new_followers",
                json!({"followers_list": [{"username": "alice"}, {"username": "fitmama", "user_id": "2"}]}),
            )
            .await
            .unwrap();
        assert!(first.contains("Found 2 new followers"));
        assert!(first.contains("@alice"));
        assert!(first.contains("Fellow parent vibes"));

        let again = h
            .dispatcher
            .call(
                "welcome_new_followers",
                json!({"followers_list": [{"username": "alice"}]}),
            )
            .await
            .unwrap();
        assert!(again.starts_with("✅"));
    }

    #[tokio::test]
    async fn test_bot_stats_counts_todays_interactions() {
        let h = harness(ScriptedCompletion::replying(&["Nope. Source: CDC"])).await;
        h.dispatcher
            .call(
                "fact_check_dm",
                json!({"content": "Vaccines contain microchips", "username": "carol"}),
            )
            .await
            .unwrap();

        let text = h.dispatcher.call("get_bot_stats", json!({})).await.unwrap();
        assert!(text.contains("Total Interactions: 1"));
        assert!(text.contains("safe (1)"));
        assert!(text.contains("@carol"));
    }

    #[tokio::test]
    async fn test_bot_stats_for_other_day_and_bad_date() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("get_bot_stats", json!({"date": "2001-01-01"}))
            .await
            .unwrap();
        assert!(text.contains("Total Interactions: 0"));
        assert!(text.contains("No sassy responses yet"));

        let err = h
            .dispatcher
            .call("get_bot_stats", json!({"date": "yesterday"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_settings_is_partial() {
        let h = harness(ScriptedCompletion::replying(&[])).await;
        let text = h
            .dispatcher
            .call("update_bot_settings", json!({"bot_mode": "unhinged"}))
            .await
            .unwrap();
        assert!(text.contains("UNHINGED"));

        let settings = *h.settings.read().await;
        assert_eq!(settings.bot_mode, BotMode::Unhinged);
        assert!(settings.safe_mode);
        assert!(settings.log_interactions);
    }

    #[tokio::test]
    async fn test_self_test_passes_with_working_components() {
        let h = harness(ScriptedCompletion::replying(&["Hello"])).await;
        let check = h.dispatcher.self_test().await;
        assert!(check.all_passed());
        assert!(h.interactions.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_self_test_reports_completion_failure() {
        let h = harness(ScriptedCompletion::failing()).await;
        let text = h.dispatcher.call("test_bot_system", json!({})).await.unwrap();
        assert!(text.contains("❌ Completion Service: FAIL"));
        assert!(text.contains("✅ Content Filter: PASS"));
        assert!(text.contains("Some issues detected"));
    }
}
