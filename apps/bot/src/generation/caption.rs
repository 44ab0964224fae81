//! Caption cleanup for photo/video/reel/story messages.

use std::sync::OnceLock;

use regex::Regex;

struct CaptionPatterns {
    hashtag: Regex,
    mention: Regex,
    emoji_run: Regex,
}

fn patterns() -> &'static CaptionPatterns {
    static PATTERNS: OnceLock<CaptionPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CaptionPatterns {
        hashtag: Regex::new(r"#\w+").expect("hashtag pattern must compile"),
        mention: Regex::new(r"@\w+").expect("mention pattern must compile"),
        emoji_run: Regex::new(
            r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]{3,}",
        )
        .expect("emoji pattern must compile"),
    })
}

/// Strips hashtags and mentions, collapses runs of three or more emoji into a
/// single ✨, and normalises whitespace.
pub fn clean_caption(caption: &str) -> String {
    let p = patterns();
    let text = p.hashtag.replace_all(caption, "");
    let text = p.mention.replace_all(&text, "");
    let text = p.emoji_run.replace_all(&text, "✨");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
