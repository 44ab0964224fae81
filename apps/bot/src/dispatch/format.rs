//! Text rendering for tool results. Markdown-ish blocks meant for a chat client.

use crate::dispatch::{SystemCheck, Tool};
use crate::followers::FollowerStats;
use crate::generation::generator::{FactCheckResult, MessageType};
use crate::instagram::{DirectMessage, IntegrationStatus, Profile, SendOutcome};
use crate::interactions::stats::DailyStats;
use crate::settings::BotSettings;

pub const NO_CONTENT: &str = "❌ No content provided to fact-check. Send me some juicy claims! 🔥";
pub const DM_INPUT_REQUIRED: &str = "❌ Username and content required for Instagram DM!";
pub const PROFILE_INPUT_REQUIRED: &str = "❌ Username required to look up a profile!";
pub const NO_FOLLOWERS_LIST: &str = "❌ No followers list provided";
pub const NO_NEW_FOLLOWERS: &str =
    "✅ No new followers to welcome! Everyone's already been greeted 👋";
pub const NO_NEW_DMS: &str = "✅ No new Instagram DMs to fact-check!";

const STATS_SHOWN: usize = 3;

fn sources_line(result: &FactCheckResult) -> String {
    if result.sources.is_empty() {
        "None cited".to_string()
    } else {
        result.sources.join(", ")
    }
}

fn check_mark(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "Enabled"
    } else {
        "Disabled"
    }
}

pub fn fact_check(username: &str, message_type: MessageType, result: &FactCheckResult) -> String {
    format!(
        "🤖 **Sassy Fact Check Response** 💅\n\n\
         **For:** @{username}\n\
         **Content Type:** {message_type}\n\
         **Tone Used:** {tone}\n\
         **Category:** {category}\n\n\
         **Response:**\n{response}\n\n\
         **Sources Found:** {sources}\n\
         **Should Send:** {should_send}\n",
        tone = result.tone_used,
        category = result.category,
        response = result.response_text,
        sources = sources_line(result),
        should_send = if result.should_send { "✅ Yes" } else { "❌ No" },
    )
}

/// `outcome` is `None` when the reply was withheld.
pub fn sent_dm(
    username: &str,
    content: &str,
    result: &FactCheckResult,
    outcome: Option<&SendOutcome>,
) -> String {
    let status = match outcome {
        Some(outcome) => format!(
            "• Sent: {}\n• Mode: {}\n• Status: {}",
            check_mark(outcome.success),
            outcome.mode.as_str().to_uppercase(),
            outcome.status_text
        ),
        None => format!(
            "• Sent: ❌\n• Status: Not relayed, {} content is never sent",
            result.category
        ),
    };

    format!(
        "💌 **Instagram DM** 💅\n\n\
         **Fact-Check Request:**\n\
         • From: @{username}\n\
         • Claim: \"{content}\"\n\n\
         **Sassy Response Generated:**\n\"{response}\"\n\n\
         **Instagram DM Status:**\n{status}\n\n\
         **Details:**\n\
         • Tone Used: {tone}\n\
         • Sources: {sources}\n\
         • Category: {category}",
        response = result.response_text,
        tone = result.tone_used,
        sources = sources_line(result),
        category = result.category,
    )
}

pub fn dm_previews(previews: &[(DirectMessage, FactCheckResult)]) -> String {
    let mut text = format!(
        "📱 **New Instagram DMs Found!** ({} messages)\n\n",
        previews.len()
    );

    for (i, (dm, preview)) in previews.iter().enumerate() {
        text.push_str(&format!(
            "**{}. @{}:**\nClaim: \"{}\"\nSassy Preview: \"{}\"\nTone: {}\n\n",
            i + 1,
            dm.username,
            dm.message,
            preview.response_text,
            preview.tone_used
        ));
    }

    text.push_str("💅 Use `send_sassy_instagram_dm` to reply to any of these!");
    text
}

pub fn profile(profile: &Profile) -> String {
    format!(
        "👤 **Instagram Profile: @{username}**\n\n\
         • Followers: {followers}\n\
         • Following: {following}\n\
         • Bio: {bio}\n\
         • Verified: {verified}\n\
         • Business Account: {business}",
        username = profile.username,
        followers = profile.followers,
        following = profile.following,
        bio = if profile.bio.is_empty() { "(none)" } else { profile.bio.as_str() },
        verified = check_mark(profile.is_verified),
        business = check_mark(profile.is_business),
    )
}

pub fn integration_status(status: &IntegrationStatus) -> String {
    let features: Vec<String> = status.features.iter().map(|f| format!("• {f}")).collect();
    let tools: Vec<String> = Tool::ALL
        .iter()
        .map(|t| format!("• `{}` - {}", t.name(), t.description()))
        .collect();

    format!(
        "🔍 **Instagram Integration Status**\n\n\
         **Transport Mode:** {mode}\n\n\
         **Available Features:**\n{features}\n\n\
         **Available Tools:**\n{tools}\n\n\
         **Integration Note:**\n{note}",
        mode = status.mode.as_str().to_uppercase(),
        features = features.join("\n"),
        tools = tools.join("\n"),
        note = status.note,
    )
}

pub fn welcomes(welcomes: &[(String, String)]) -> String {
    let mut text = format!(
        "🎉 **New Followers Detected!** 🎉\n\nFound {} new followers to welcome:\n\n",
        welcomes.len()
    );

    for (username, message) in welcomes {
        text.push_str(&format!("**@{username}:**\n{message}\n\n"));
    }

    text.push_str(&format!(
        "💅 Ready to slide into {} DMs with sass and science!",
        welcomes.len()
    ));
    text
}

pub fn bot_stats(daily: &DailyStats, followers: &FollowerStats) -> String {
    let top: Vec<String> = daily
        .top_categories
        .iter()
        .take(STATS_SHOWN)
        .map(|c| format!("{} ({})", c.category, c.count))
        .collect();
    let last_updated = followers
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_string());
    let date = daily
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".to_string());

    let mut text = format!(
        "📊 **Sassy Fact Check Bot Stats** ({date}) 📊\n\n\
         **Daily Activity:**\n\
         • Total Interactions: {total}\n\
         • Top Categories: {top}\n\n\
         **Follower Management:**\n\
         • Total Followers Seen: {seen}\n\
         • Welcome Messages Available: {available}\n\
         • Last Updated: {last_updated}\n\n\
         **Recent Sassy Responses:**\n",
        total = daily.total_interactions,
        top = if top.is_empty() {
            "None yet".to_string()
        } else {
            top.join(", ")
        },
        seen = followers.total_seen_followers,
        available = followers.messages_available,
    );

    if daily.sassiest_responses.is_empty() {
        text.push_str("No sassy responses yet today - send me some bad takes! 🔥\n");
    }
    for (i, response) in daily.sassiest_responses.iter().take(STATS_SHOWN).enumerate() {
        text.push_str(&format!(
            "{}. @{}: {}\n",
            i + 1,
            response.username,
            response.response
        ));
    }

    text.push_str("\n🤖 Bot Status: Ready to roast misinformation! 💅");
    text
}

pub fn system_check(check: &SystemCheck) -> String {
    let mut text = "🧪 **Bot System Test Results** 🧪\n\n".to_string();

    for (component, ok) in [
        ("Completion Service", check.completion_service),
        ("Content Filter", check.content_filter),
        ("Interaction Log", check.interaction_log),
    ] {
        text.push_str(&format!(
            "{} {component}: {}\n",
            check_mark(ok),
            if ok { "PASS" } else { "FAIL" }
        ));
    }

    if check.all_passed() {
        text.push_str("\n✅ **Overall Status:** All systems operational!\n");
        text.push_str("\n💅 Ready to serve facts with maximum sass!");
    } else {
        text.push_str("\n⚠️ **Overall Status:** Some issues detected\n");
        text.push_str("\n🔧 Check your .env file and API keys if tests are failing.");
    }
    text
}

pub fn settings_updated(settings: &BotSettings) -> String {
    format!(
        "⚙️ **Bot Settings Updated** ⚙️\n\n\
         **Personality Mode:** {mode} 💅\n\
         **Safe Mode:** {safe} 🛡️\n\
         **Interaction Logging:** {log} 📝\n\n\
         Settings apply until restart. Update your .env file to make them permanent.\n",
        mode = settings.bot_mode.as_str().to_uppercase(),
        safe = enabled(settings.safe_mode),
        log = enabled(settings.log_interactions),
    )
}
