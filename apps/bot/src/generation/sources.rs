//! Source extraction: pulls cited authority names out of generated text.
//!
//! Two signals: a fixed vocabulary of recognised institutions, and explicit
//! `Source: <name>` citations. Results are de-duplicated case-insensitively,
//! kept in first-seen order, and capped at `MAX_SOURCES`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

pub const MAX_SOURCES: usize = 3;

/// Recognised health/science authorities, in canonical spelling.
pub const KNOWN_AUTHORITIES: &[&str] = &[
    "Mayo Clinic",
    "Cleveland Clinic",
    "Johns Hopkins",
    "Harvard Health",
    "CDC",
    "NIH",
    "FDA",
    "NHS",
    "World Health Organization",
    "American Cancer Society",
    "American Heart Association",
    "American Academy of Pediatrics",
    "National Cancer Institute",
    "Cochrane",
    "PubMed",
    "WebMD",
    "NASA",
    "NOAA",
    "USDA",
    "EPA",
];

struct Patterns {
    authorities: Regex,
    citation: Regex,
    separator: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let alternation = KNOWN_AUTHORITIES
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        Patterns {
            authorities: Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                .expect("authority vocabulary must compile"),
            citation: Regex::new(r"(?i)\bsources?:\s*([^.!?\n]+)")
                .expect("citation pattern must compile"),
            separator: Regex::new(r"(?i)\s*(?:[,;/&]|\band\b)\s*")
                .expect("separator pattern must compile"),
        }
    })
}

/// Returns up to three distinct source names in order of first appearance.
pub fn extract_sources(text: &str) -> Vec<String> {
    let patterns = patterns();

    let mut hits: Vec<(usize, String)> = patterns
        .authorities
        .find_iter(text)
        .map(|m| (m.start(), canonical_name(m.as_str())))
        .collect();

    // Citations naming a known authority are already covered by the vocabulary hits.
    for caps in patterns.citation.captures_iter(text) {
        let Some(list) = caps.get(1) else {
            continue;
        };
        let names = list.as_str();
        let separators = patterns
            .separator
            .find_iter(names)
            .map(|m| (m.start(), m.end()))
            .chain(std::iter::once((names.len(), names.len())));

        let mut part_start = 0;
        for (sep_start, sep_end) in separators {
            let name = clean_citation(&names[part_start..sep_start]);
            if !name.is_empty() && !patterns.authorities.is_match(name) {
                hits.push((list.start() + part_start, name.to_string()));
            }
            part_start = sep_end;
        }
    }

    hits.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    hits.into_iter()
        .map(|(_, name)| name)
        .filter(|name| seen.insert(name.to_lowercase()))
        .take(MAX_SOURCES)
        .collect()
}

/// Canonical vocabulary spelling when the name is a known authority.
fn canonical_name(name: &str) -> String {
    KNOWN_AUTHORITIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .map(|known| known.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Trims quotes, brackets, emoji and trailing punctuation around a cited name.
fn clean_citation(raw: &str) -> &str {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == ')'))
        .trim_start_matches(')')
        .trim()
}
