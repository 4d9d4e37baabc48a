//! Persisted topic history
//!
//! Tracks which distinct days each topic was active on, so recurrence
//! trends survive across runs. Storage goes through the `HistoryStore`
//! trait; the file implementation treats a missing or corrupt document
//! as an empty history rather than failing the run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::Result;

/// Append-only record of distinct active days per topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicHistory {
    #[serde(default)]
    days: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl TopicHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a topic was active on a day
    pub fn record(&mut self, topic: &str, day: NaiveDate) {
        self.days.entry(topic.to_string()).or_default().insert(day);
    }

    /// Record a whole day's topic set
    pub fn record_day<'a>(&mut self, day: NaiveDate, topics: impl IntoIterator<Item = &'a str>) {
        for topic in topics {
            self.record(topic, day);
        }
    }

    pub fn days_for(&self, topic: &str) -> Option<&BTreeSet<NaiveDate>> {
        self.days.get(topic)
    }

    /// Distinct days a topic has been seen on
    pub fn day_count(&self, topic: &str) -> usize {
        self.days.get(topic).map_or(0, BTreeSet::len)
    }

    /// Most recent sighting strictly before `day`
    pub fn last_seen_before(&self, topic: &str, day: NaiveDate) -> Option<NaiveDate> {
        self.days
            .get(topic)?
            .iter()
            .rev()
            .find(|d| **d < day)
            .copied()
    }

    /// Whether the topic was seen on any day before `day`
    pub fn seen_before(&self, topic: &str, day: NaiveDate) -> bool {
        self.last_seen_before(topic, day).is_some()
    }

    /// Distinct days seen within `[day - (window_days - 1), day]`
    pub fn days_in_trailing_window(&self, topic: &str, day: NaiveDate, window_days: i64) -> usize {
        let Some(days) = self.days.get(topic) else {
            return 0;
        };
        days.iter()
            .filter(|d| {
                let age = day.signed_duration_since(**d).num_days();
                (0..window_days).contains(&age)
            })
            .count()
    }

    pub fn topic_count(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Persistence interface for the topic history.
///
/// `load` never fails: unreadable state degrades to an empty history
/// so a damaged file cannot take the pipeline down.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> TopicHistory;

    async fn save(&self, history: &TopicHistory) -> Result<()>;
}

/// On-disk document wrapper; unknown extra fields are ignored on read
#[derive(Debug, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    history: TopicHistory,
}

fn default_version() -> u32 {
    1
}

/// JSON-file backed history store
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> TopicHistory {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no topic history at {}, starting empty", self.path.display());
                return TopicHistory::new();
            }
            Err(e) => {
                warn!(
                    "failed to read topic history {}: {}, starting empty",
                    self.path.display(),
                    e
                );
                return TopicHistory::new();
            }
        };

        match serde_json::from_str::<HistoryDocument>(&content) {
            Ok(doc) => doc.history,
            Err(e) => {
                warn!(
                    "corrupt topic history {}: {}, starting empty",
                    self.path.display(),
                    e
                );
                TopicHistory::new()
            }
        }
    }

    async fn save(&self, history: &TopicHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let doc = HistoryDocument {
            version: 1,
            history: history.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// In-memory history store
#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: RwLock<TopicHistory>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: TopicHistory) -> Self {
        Self {
            inner: RwLock::new(history),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> TopicHistory {
        self.inner.read().await.clone()
    }

    async fn save(&self, history: &TopicHistory) -> Result<()> {
        *self.inner.write().await = history.clone();
        Ok(())
    }
}
