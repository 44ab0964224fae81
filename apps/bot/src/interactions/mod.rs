//! Interaction log: append-only JSON record of every processed message.
//!
//! The whole file is read, appended to, trimmed to the most recent
//! `MAX_INTERACTIONS` entries (oldest first out), and rewritten. Acceptable only
//! because of the cap; this is not a transactional store.

pub mod stats;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::generation::generator::{MessageType, ResultCategory, ToneUsed};
use crate::interactions::stats::{compute_daily_stats, DailyStats};
use crate::storage::{read_json, write_json, StoreError};

pub const MAX_INTERACTIONS: usize = 1000;

/// One processed message and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    pub username: String,
    pub content: String,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(alias = "response")]
    pub response_text: String,
    pub tone_used: ToneUsed,
    pub category: ResultCategory,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Accepts RFC 3339 and offset-less ISO 8601 timestamps; the latter are local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()?
        .and_local_timezone(Local)
        .earliest()
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Local>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
}

pub struct InteractionLog {
    path: PathBuf,
    capacity: usize,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl InteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: MAX_INTERACTIONS,
            lock: Mutex::new(()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty log.
    pub async fn load(&self) -> Result<Vec<InteractionRecord>, StoreError> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    pub async fn append(&self, record: InteractionRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut records = self.load().await?;
        records.push(record);

        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }

        write_json(&self.path, &records).await?;
        debug!(
            "Interaction log now holds {} records ({})",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Round-trips the file unchanged to prove it is readable and writable.
    pub async fn probe(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        write_json(&self.path, &records).await
    }

    pub async fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(compute_daily_stats(&records, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, tone: ToneUsed, category: ResultCategory) -> InteractionRecord {
        InteractionRecord {
            timestamp: Local::now(),
            username: username.to_string(),
            content: "Lemon water detoxes your liver".to_string(),
            message_type: MessageType::Text,
            response_text: "Your liver called, it said no 💀 Source: Mayo Clinic".to_string(),
            tone_used: tone,
            category,
            sources: vec!["Mayo Clinic".to_string()],
        }
    }

    #[tokio::test]
    async fn test_append_creates_file_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::new(dir.path().join("interactions.json"));

        log.append(record("alice", ToneUsed::Sassy, ResultCategory::HealthPanic))
            .await
            .unwrap();
        log.append(record("bob", ToneUsed::Soft, ResultCategory::Sensitive))
            .await
            .unwrap();

        let records = log.load().await.unwrap();
        let names: Vec<_> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::new(dir.path().join("interactions.json")).with_capacity(5);

        for i in 0..8 {
            log.append(record(&format!("user{i}"), ToneUsed::Sassy, ResultCategory::Safe))
                .await
                .unwrap();
        }

        let records = log.load().await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].username, "user3");
        assert_eq!(records[4].username, "user7");
    }

    #[tokio::test]
    async fn test_default_cap_is_one_thousand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.json");
        let seeded: Vec<_> = (0..MAX_INTERACTIONS)
            .map(|i| record(&format!("user{i}"), ToneUsed::Sassy, ResultCategory::Safe))
            .collect();
        write_json(&path, &seeded).await.unwrap();

        let log = InteractionLog::new(&path);
        log.append(record("late1", ToneUsed::Sassy, ResultCategory::Safe))
            .await
            .unwrap();
        log.append(record("late2", ToneUsed::Sassy, ResultCategory::Safe))
            .await
            .unwrap();

        let records = log.load().await.unwrap();
        assert_eq!(records.len(), MAX_INTERACTIONS);
        assert_eq!(records[0].username, "user2");
        assert_eq!(records.last().unwrap().username, "late2");
    }

    #[tokio::test]
    async fn test_corrupt_log_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.json");
        tokio::fs::write(&path, b"{oops").await.unwrap();

        let log = InteractionLog::new(&path);
        let err = log
            .append(record("alice", ToneUsed::Sassy, ResultCategory::Safe))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"{oops");
    }

    #[tokio::test]
    async fn test_probe_creates_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::new(dir.path().join("interactions.json"));
        log.probe().await.unwrap();
        assert!(log.load().await.unwrap().is_empty());
        assert!(log.path().exists());
    }

    #[test]
    fn test_record_accepts_legacy_response_key() {
        let json = r#"{
            "timestamp": "2025-01-27T13:30:00.123456",
            "username": "wellness_guru_fake",
            "content": "ACV burns belly fat",
            "message_type": "text",
            "response": "Bestie, no 💀 Source: Mayo Clinic",
            "tone_used": "sassy",
            "category": "safe",
            "sources": ["Mayo Clinic"]
        }"#;
        let rec: InteractionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.response_text, "Bestie, no 💀 Source: Mayo Clinic");
        assert_eq!(rec.category, ResultCategory::Safe);
        assert_eq!(
            rec.timestamp.naive_local().to_string(),
            "2025-01-27 13:30:00.123456"
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-01-27T13:30:00").is_some());
        assert!(parse_timestamp("2025-01-27T13:30:00+02:00").is_some());
        assert!(parse_timestamp("2025-01-27T13:30:00.5Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[tokio::test]
    async fn test_offsetless_log_keeps_accepting_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.json");
        tokio::fs::write(
            &path,
            r#"[{"timestamp":"2025-01-27T13:30:00.123456","username":"old","content":"c",
                "message_type":"text","response":"r","tone_used":"sassy","category":"safe","sources":[]}]"#,
        )
        .await
        .unwrap();

        let log = InteractionLog::new(&path);
        log.append(record("new", ToneUsed::Sassy, ResultCategory::Safe))
            .await
            .unwrap();

        let records = log.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].username, "old");

        let day = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        assert_eq!(log.daily_stats(day).await.unwrap().total_interactions, 1);
    }

    #[tokio::test]
    async fn test_stats_read_concurrently_with_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = std::sync::Arc::new(InteractionLog::new(dir.path().join("interactions.json")));
        let today = Local::now().date_naive();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let log = log.clone();
            tasks.push(tokio::spawn(async move {
                log.append(record(&format!("user{i}"), ToneUsed::Sassy, ResultCategory::Safe))
                    .await
                    .unwrap();
                log.daily_stats(today).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(log.daily_stats(today).await.unwrap().total_interactions, 20);
    }
}
