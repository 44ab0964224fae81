//! Daily interaction statistics.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::generation::generator::ToneUsed;
use crate::interactions::InteractionRecord;

const TOP_CATEGORIES: usize = 5;
const SASSIEST_RESPONSES: usize = 5;
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SassyResponse {
    pub username: String,
    pub response: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: Option<NaiveDate>,
    pub total_interactions: usize,
    /// Most frequent first; ties broken by name.
    pub top_categories: Vec<CategoryCount>,
    pub sassiest_responses: Vec<SassyResponse>,
}

/// Aggregates the records whose local timestamp falls on `date`.
pub fn compute_daily_stats(records: &[InteractionRecord], date: NaiveDate) -> DailyStats {
    let todays: Vec<&InteractionRecord> = records
        .iter()
        .filter(|r| r.timestamp.date_naive() == date)
        .collect();

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for record in &todays {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    let mut top_categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    top_categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    top_categories.truncate(TOP_CATEGORIES);

    let sassiest_responses = todays
        .iter()
        .filter(|r| r.tone_used == ToneUsed::Sassy)
        .take(SASSIEST_RESPONSES)
        .map(|r| SassyResponse {
            username: r.username.clone(),
            response: preview(&r.response_text),
            category: r.category.as_str().to_string(),
        })
        .collect();

    DailyStats {
        date: Some(date),
        total_interactions: todays.len(),
        top_categories,
        sassiest_responses,
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
