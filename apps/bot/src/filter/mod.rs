//! Content filter: the rule-based classifier at the heart of the bot.
//!
//! Maps raw text to a `ClassificationResult` (category, tone, reason) and builds
//! the system prompt for a `(tone, category)` pair. Pure and total: every input,
//! including the empty string, maps to exactly one category.

pub mod prompts;
pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::prompts::{
    BASE_INSTRUCTION, BLOCKED_BLOCK, BLOCKED_FALLBACK, GENERIC_FALLBACK, HEALTH_PANIC_ADDENDUM,
    NEUTRAL_BLOCK, SASSY_BLOCK, SENSITIVE_FALLBACK, SOFT_BLOCK, SPAM_ADDENDUM, SPAM_FALLBACK,
};
use crate::filter::rules::{default_rules, Rule};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Safety/content bucket assigned to inbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Safe,
    Sensitive,
    Blocked,
    HealthPanic,
    Spam,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 5] = [
        ContentCategory::Safe,
        ContentCategory::Sensitive,
        ContentCategory::Blocked,
        ContentCategory::HealthPanic,
        ContentCategory::Spam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Safe => "safe",
            ContentCategory::Sensitive => "sensitive",
            ContentCategory::Blocked => "blocked",
            ContentCategory::HealthPanic => "health_panic",
            ContentCategory::Spam => "spam",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice and length envelope for a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMode {
    Sassy,
    Neutral,
    Soft,
    Blocked,
}

impl ToneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneMode::Sassy => "sassy",
            ToneMode::Neutral => "neutral",
            ToneMode::Soft => "soft",
            ToneMode::Blocked => "blocked",
        }
    }

    fn instruction_block(&self) -> &'static str {
        match self {
            ToneMode::Sassy => SASSY_BLOCK,
            ToneMode::Neutral => NEUTRAL_BLOCK,
            ToneMode::Soft => SOFT_BLOCK,
            ToneMode::Blocked => BLOCKED_BLOCK,
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `ContentFilter::classify`. `reason` is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub category: ContentCategory,
    pub tone: ToneMode,
    pub reason: &'static str,
}

const DEFAULT_REASON: &str = "Safe content ready for sassy fact-checking";

// ────────────────────────────────────────────────────────────────────────────
// Filter
// ────────────────────────────────────────────────────────────────────────────

/// Keyword/pattern classifier. Holds the ordered rule chain.
#[derive(Debug)]
pub struct ContentFilter {
    rules: Vec<Rule>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFilter {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// First-match-wins classification over the lower-cased text.
    /// Falls through to `(Safe, Sassy)` when no rule applies.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map(|rule| ClassificationResult {
                category: rule.category,
                tone: rule.tone,
                reason: rule.reason,
            })
            .unwrap_or(ClassificationResult {
                category: ContentCategory::Safe,
                tone: ToneMode::Sassy,
                reason: DEFAULT_REASON,
            })
    }

    /// Spam and sensitive content still get a reply; blocked content never does.
    pub fn should_respond(&self, category: ContentCategory) -> bool {
        category != ContentCategory::Blocked
    }

    pub fn fallback_response(&self, category: ContentCategory) -> &'static str {
        match category {
            ContentCategory::Blocked => BLOCKED_FALLBACK,
            ContentCategory::Spam => SPAM_FALLBACK,
            ContentCategory::Sensitive => SENSITIVE_FALLBACK,
            ContentCategory::Safe | ContentCategory::HealthPanic => GENERIC_FALLBACK,
        }
    }

    /// System instruction for the completion service: base persona, then the
    /// tone block, then the category addendum if the category has one.
    pub fn tone_prompt(&self, tone: ToneMode, category: ContentCategory) -> String {
        let mut prompt = format!("{BASE_INSTRUCTION}\n\n{}", tone.instruction_block());

        if let Some(addendum) = category_addendum(category) {
            prompt.push_str("\n\n");
            prompt.push_str(addendum);
        }

        prompt
    }
}

fn category_addendum(category: ContentCategory) -> Option<&'static str> {
    match category {
        ContentCategory::HealthPanic => Some(HEALTH_PANIC_ADDENDUM),
        ContentCategory::Spam => Some(SPAM_ADDENDUM),
        _ => None,
    }
}
