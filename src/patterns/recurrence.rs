//! Cross-day topic recurrence
//!
//! Classifies each of today's topics against the persisted history:
//!
//! 1. **New**: never seen on any earlier day.
//! 2. **Returning**: seen before, but the gap since the last sighting
//!    exceeds 7 days.
//! 3. **Stable**: active on at least 3 distinct days within the
//!    trailing 7 (today included).
//! 4. **Rising**: everything else, seen recently but not yet settled.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::history::TopicHistory;

const RETURNING_GAP_DAYS: i64 = 7;
const STABLE_WINDOW_DAYS: i64 = 7;
const STABLE_MIN_DAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicTrend {
    New,
    Rising,
    Stable,
    Returning,
}

impl TopicTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Rising => "rising",
            Self::Stable => "stable",
            Self::Returning => "returning",
        }
    }
}

impl std::fmt::Display for TopicTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence signal for one of today's topics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecurrence {
    pub topic: String,
    pub trend: TopicTrend,
    /// Distinct days this topic has been active on, today included
    pub day_count: usize,
}

/// Compute recurrence for today's topics.
///
/// `history` must already include today's sightings.
pub fn compute_recurrence(
    topics: &BTreeSet<String>,
    today: NaiveDate,
    history: &TopicHistory,
) -> Vec<TopicRecurrence> {
    topics
        .iter()
        .map(|topic| TopicRecurrence {
            topic: topic.clone(),
            trend: trend_for(topic, today, history),
            day_count: history.day_count(topic).max(1),
        })
        .collect()
}

fn trend_for(topic: &str, today: NaiveDate, history: &TopicHistory) -> TopicTrend {
    let Some(last_seen) = history.last_seen_before(topic, today) else {
        return TopicTrend::New;
    };

    let gap = today.signed_duration_since(last_seen).num_days();
    if gap > RETURNING_GAP_DAYS {
        return TopicTrend::Returning;
    }

    if history.days_in_trailing_window(topic, today, STABLE_WINDOW_DAYS) >= STABLE_MIN_DAYS {
        return TopicTrend::Stable;
    }

    TopicTrend::Rising
}
