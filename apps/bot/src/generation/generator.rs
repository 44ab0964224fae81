//! Response generation: turns one inbound message into a `FactCheckResult`.
//!
//! Flow: clean caption → empty check → classify → should_respond →
//!       tone policy → one completion call → extract sources → log.
//!
//! Every path ends in a `FactCheckResult`. Completion failures degrade to a
//! canned reply in the same tone; they are never returned as errors.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::filter::{ClassificationResult, ContentCategory, ContentFilter, ToneMode};
use crate::generation::canned::{Picker, EMPTY_RESPONSES, PHOTO_RESPONSES, VIDEO_RESPONSES};
use crate::generation::caption::clean_caption;
use crate::generation::prompts::{
    FACT_CHECK_MAX_TOKENS, FACT_CHECK_PROMPT_TEMPLATE, FACT_CHECK_TEMPERATURE,
    NEUTRAL_ERROR_RESPONSE, SASSY_ERROR_RESPONSE, SOFT_ERROR_RESPONSE, UNHINGED_ADDENDUM,
};
use crate::generation::sources::extract_sources;
use crate::interactions::{InteractionLog, InteractionRecord};
use crate::llm_client::{CompletionRequest, CompletionService};
use crate::settings::{BotMode, BotSettings, SharedSettings};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Kind of Instagram message the content came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Photo,
    Video,
    Reel,
    Story,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Photo => "photo",
            MessageType::Video => "video",
            MessageType::Reel => "reel",
            MessageType::Story => "story",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category reported on a result: a content category, or one of the
/// no-payload buckets that bypass the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCategory {
    Safe,
    Sensitive,
    Blocked,
    HealthPanic,
    Spam,
    /// Photo or video without caption text.
    NoText,
    /// Nothing at all.
    Empty,
}

impl ResultCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCategory::Safe => "safe",
            ResultCategory::Sensitive => "sensitive",
            ResultCategory::Blocked => "blocked",
            ResultCategory::HealthPanic => "health_panic",
            ResultCategory::Spam => "spam",
            ResultCategory::NoText => "no_text",
            ResultCategory::Empty => "empty",
        }
    }
}

impl From<ContentCategory> for ResultCategory {
    fn from(category: ContentCategory) -> Self {
        match category {
            ContentCategory::Safe => ResultCategory::Safe,
            ContentCategory::Sensitive => ResultCategory::Sensitive,
            ContentCategory::Blocked => ResultCategory::Blocked,
            ContentCategory::HealthPanic => ResultCategory::HealthPanic,
            ContentCategory::Spam => ResultCategory::Spam,
        }
    }
}

impl fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone reported on a result. `Error` marks a degraded reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneUsed {
    Sassy,
    Neutral,
    Soft,
    Blocked,
    Error,
}

impl ToneUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneUsed::Sassy => "sassy",
            ToneUsed::Neutral => "neutral",
            ToneUsed::Soft => "soft",
            ToneUsed::Blocked => "blocked",
            ToneUsed::Error => "error",
        }
    }
}

impl From<ToneMode> for ToneUsed {
    fn from(tone: ToneMode) -> Self {
        match tone {
            ToneMode::Sassy => ToneUsed::Sassy,
            ToneMode::Neutral => ToneUsed::Neutral,
            ToneMode::Soft => ToneUsed::Soft,
            ToneMode::Blocked => ToneUsed::Blocked,
        }
    }
}

impl fmt::Display for ToneUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reply produced for one inbound message.
///
/// CRITICAL: `should_send` is false only for blocked content, and `sources`
/// holds at most three distinct names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub response_text: String,
    pub tone_used: ToneUsed,
    pub category: ResultCategory,
    pub sources: Vec<String>,
    pub should_send: bool,
}

impl FactCheckResult {
    fn canned(response_text: &str, category: ResultCategory) -> Self {
        Self {
            response_text: response_text.to_string(),
            tone_used: ToneUsed::Sassy,
            category,
            sources: Vec::new(),
            should_send: true,
        }
    }

    /// True for the local no-payload replies that never reach the filter.
    pub fn is_no_payload(&self) -> bool {
        matches!(self.category, ResultCategory::NoText | ResultCategory::Empty)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

pub struct ResponseGenerator {
    completion: Arc<dyn CompletionService>,
    filter: ContentFilter,
    settings: SharedSettings,
    interaction_log: Option<Arc<InteractionLog>>,
    picker: Picker,
}

impl ResponseGenerator {
    pub fn new(completion: Arc<dyn CompletionService>, settings: SharedSettings) -> Self {
        Self {
            completion,
            filter: ContentFilter::new(),
            settings,
            interaction_log: None,
            picker: Picker::from_entropy(),
        }
    }

    pub fn with_interaction_log(mut self, log: Arc<InteractionLog>) -> Self {
        self.interaction_log = Some(log);
        self
    }

    /// Replaces the random source used for the canned pools.
    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    pub fn completion(&self) -> &dyn CompletionService {
        self.completion.as_ref()
    }

    /// Produces the reply for `content` without logging it.
    pub async fn generate(&self, content: &str, message_type: MessageType) -> FactCheckResult {
        let settings = *self.settings.read().await;

        let content = match message_type {
            MessageType::Text => content.trim().to_string(),
            _ => clean_caption(content),
        };

        if content.is_empty() {
            return self.no_payload_reply(message_type);
        }

        let classification = self.filter.classify(&content);
        debug!(
            "Classified as {} / {}: {}",
            classification.category, classification.tone, classification.reason
        );

        if !self.filter.should_respond(classification.category) {
            info!("Not generating for {} content", classification.category);
            return FactCheckResult {
                response_text: self
                    .filter
                    .fallback_response(classification.category)
                    .to_string(),
                tone_used: ToneUsed::Blocked,
                category: classification.category.into(),
                sources: Vec::new(),
                should_send: false,
            };
        }

        let tone = effective_tone(&classification, &settings);
        let request = self.build_request(&content, tone, classification.category, settings.bot_mode);

        let generated = match self.completion.complete(&request).await {
            Ok(completion) => completion.generated_text.trim().to_string(),
            Err(e) => {
                warn!("Fact-check completion failed, sending canned reply: {e}");
                String::new()
            }
        };

        if generated.is_empty() {
            return FactCheckResult {
                response_text: error_response(tone).to_string(),
                tone_used: ToneUsed::Error,
                category: classification.category.into(),
                sources: Vec::new(),
                should_send: true,
            };
        }

        let sources = extract_sources(&generated);
        FactCheckResult {
            response_text: generated,
            tone_used: tone.into(),
            category: classification.category.into(),
            sources,
            should_send: true,
        }
    }

    /// Generates the reply for a DM from `username` and appends it to the
    /// interaction log. Logging failures are reported and otherwise ignored.
    pub async fn respond(
        &self,
        username: &str,
        content: &str,
        message_type: MessageType,
    ) -> FactCheckResult {
        info!("Processing {} from @{}", message_type, username);

        let result = self.generate(content, message_type).await;

        if !result.is_no_payload() {
            self.record(username, content, message_type, &result).await;
        }

        result
    }

    fn no_payload_reply(&self, message_type: MessageType) -> FactCheckResult {
        match message_type {
            MessageType::Photo => {
                FactCheckResult::canned(self.picker.pick(PHOTO_RESPONSES), ResultCategory::NoText)
            }
            MessageType::Video | MessageType::Reel => {
                FactCheckResult::canned(self.picker.pick(VIDEO_RESPONSES), ResultCategory::NoText)
            }
            MessageType::Text | MessageType::Story => {
                FactCheckResult::canned(self.picker.pick(EMPTY_RESPONSES), ResultCategory::Empty)
            }
        }
    }

    fn build_request(
        &self,
        content: &str,
        tone: ToneMode,
        category: ContentCategory,
        mode: BotMode,
    ) -> CompletionRequest {
        let mut system_prompt = self.filter.tone_prompt(tone, category);
        if mode == BotMode::Unhinged && tone == ToneMode::Sassy {
            system_prompt.push_str("\n\n");
            system_prompt.push_str(UNHINGED_ADDENDUM);
        }

        CompletionRequest {
            system_prompt,
            user_prompt: FACT_CHECK_PROMPT_TEMPLATE.replace("{claim}", content),
            max_output_tokens: FACT_CHECK_MAX_TOKENS,
            temperature: FACT_CHECK_TEMPERATURE,
        }
    }

    async fn record(
        &self,
        username: &str,
        content: &str,
        message_type: MessageType,
        result: &FactCheckResult,
    ) {
        if !self.settings.read().await.log_interactions {
            return;
        }
        let Some(log) = &self.interaction_log else {
            return;
        };

        let record = InteractionRecord {
            timestamp: Local::now(),
            username: username.to_string(),
            content: content.to_string(),
            message_type,
            response_text: result.response_text.clone(),
            tone_used: result.tone_used,
            category: result.category,
            sources: result.sources.clone(),
        };

        if let Err(e) = log.append(record).await {
            warn!("Failed to log interaction: {e}");
        }
    }
}

/// Applies the runtime settings on top of the classified tone.
///
/// Blocked stays blocked. Sensitive is soft in safe mode and neutral otherwise,
/// never sassy. Neutral mode turns every remaining sassy tone neutral.
fn effective_tone(classification: &ClassificationResult, settings: &BotSettings) -> ToneMode {
    match classification.category {
        ContentCategory::Blocked => ToneMode::Blocked,
        ContentCategory::Sensitive if settings.safe_mode => ToneMode::Soft,
        ContentCategory::Sensitive => ToneMode::Neutral,
        _ if settings.bot_mode == BotMode::Neutral => ToneMode::Neutral,
        _ => classification.tone,
    }
}

fn error_response(tone: ToneMode) -> &'static str {
    match tone {
        ToneMode::Sassy => SASSY_ERROR_RESPONSE,
        ToneMode::Soft => SOFT_ERROR_RESPONSE,
        ToneMode::Neutral | ToneMode::Blocked => NEUTRAL_ERROR_RESPONSE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
