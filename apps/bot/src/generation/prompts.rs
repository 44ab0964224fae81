// Prompt constants for fact-check generation.
// The system prompt comes from `ContentFilter::tone_prompt`; this file holds
// the user-side template and the degraded replies.

/// Replace `{claim}` before sending.
pub const FACT_CHECK_PROMPT_TEMPLATE: &str = r#"Fact-check the following claim.

Claim: "{claim}"

Reply in the required tone and format. ALWAYS end with 'Source: [Authority]', e.g. 'Source: Mayo Clinic'."#;

/// Appended to the system prompt in unhinged mode.
pub const UNHINGED_ADDENDUM: &str = "\
Turn the attitude all the way up: dramatic, Gen Z, maximum sass. Facts stay accurate.";

/// Creative phrasing, short replies.
pub const FACT_CHECK_TEMPERATURE: f32 = 0.8;
pub const FACT_CHECK_MAX_TOKENS: u32 = 150;

pub const SASSY_ERROR_RESPONSE: &str = "Oops! My fact-checking brain had a glitch. Try again! 🤖";

pub const NEUTRAL_ERROR_RESPONSE: &str =
    "Sorry, I couldn't check that claim right now. Please try again in a moment.";

pub const SOFT_ERROR_RESPONSE: &str = "I'm sorry, I wasn't able to look into this right now. \
    Please try again a little later, and take care.";
