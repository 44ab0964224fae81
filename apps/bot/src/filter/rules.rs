//! Ordered classification rules.
//!
//! CRITICAL: order is precedence. The first rule that matches decides the
//! category and tone, even when later rules would also match. Blocked terms come
//! first so nothing is ever generated for them; sensitive topics come before
//! health panic so grief-adjacent content never gets a sassy tone.
//!
//! Keyword matching is plain substring containment on lower-cased text. It is
//! not word-boundary aware: "war" also matches "award".

use regex::Regex;

use crate::filter::{ContentCategory, ToneMode};

/// Hate speech and conspiracy theories. Never engaged with.
pub const BLOCKED_KEYWORDS: &[&str] = &[
    "nazi",
    "hitler",
    "holocaust denial",
    "qanon",
    "pizzagate",
    "flat earth",
    "chemtrails",
    "lizard people",
    "illuminati",
];

/// Promotional phrases, bare URLs and "DM me" style solicitation.
pub const SPAM_PATTERNS: &[&str] = &[
    r"\b(?:buy now|click here|limited time|act fast)\b",
    r"\b(?:make money|earn \$|work from home)\b",
    r"(?:https?://|www\.)[^\s]+",
    r"\b(?:dm me|message me|link in bio)\b",
];

/// Bereavement, violence, self-harm, serious illness and mental-health crisis terms.
///
/// Illness is phrased in the first/third person ("has cancer") so a bare
/// miracle-cure claim about cancer stays in the health-panic bucket.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "war",
    "death",
    "suicide",
    "trauma",
    "grief",
    "funeral",
    "shooting",
    "terrorism",
    "murder",
    "has cancer",
    "have cancer",
    "had cancer",
    "with cancer",
    "cancer diagnosis",
    "terminal",
    "dying",
    "miscarriage",
    "abuse",
    "violence",
    "assault",
    "rape",
    "depression",
    "anxiety",
    "mental health crisis",
    "self harm",
    "cutting",
    "overdose",
];

/// Detox, cleanse, miracle-cure and alternative-medicine framing.
pub const HEALTH_PANIC_KEYWORDS: &[&str] = &[
    "detox",
    "cleanse",
    "toxins",
    "miracle cure",
    "doctors hate",
    "big pharma",
    "natural healing",
    "alternative medicine gone wrong",
    "essential oils cure",
    "alkaline water",
    "raw diet",
    "juice cleanse",
];

/// How a rule decides whether it applies to lower-cased text.
#[derive(Debug)]
pub enum Matcher {
    Keywords(&'static [&'static str]),
    Patterns(Vec<Regex>),
}

impl Matcher {
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Keywords(words) => words.iter().any(|w| lowered.contains(w)),
            Matcher::Patterns(patterns) => patterns.iter().any(|p| p.is_match(lowered)),
        }
    }
}

/// One entry in the precedence chain.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub category: ContentCategory,
    pub tone: ToneMode,
    pub reason: &'static str,
}

/// The default precedence chain: blocked, spam, sensitive, health panic.
pub fn default_rules() -> Vec<Rule> {
    let spam = SPAM_PATTERNS
        .iter()
        // Compile-time constants; a bad pattern is a programming error.
        .map(|p| Regex::new(p).expect("spam pattern must compile"))
        .collect();

    vec![
        Rule {
            name: "blocked",
            matcher: Matcher::Keywords(BLOCKED_KEYWORDS),
            category: ContentCategory::Blocked,
            tone: ToneMode::Blocked,
            reason: "Content contains blocked conspiracy theories or hate speech",
        },
        Rule {
            name: "spam",
            matcher: Matcher::Patterns(spam),
            category: ContentCategory::Spam,
            tone: ToneMode::Sassy,
            reason: "Content appears to be spam or promotional",
        },
        Rule {
            name: "sensitive",
            matcher: Matcher::Keywords(SENSITIVE_KEYWORDS),
            category: ContentCategory::Sensitive,
            tone: ToneMode::Soft,
            reason: "Content contains sensitive topics requiring gentle approach",
        },
        Rule {
            name: "health_panic",
            matcher: Matcher::Keywords(HEALTH_PANIC_KEYWORDS),
            category: ContentCategory::HealthPanic,
            tone: ToneMode::Sassy,
            reason: "Health misinformation detected - sass mode with facts",
        },
    ]
}
