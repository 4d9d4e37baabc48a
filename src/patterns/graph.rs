//! Topic and entity co-occurrence
//!
//! Pairs of events whose timestamps fall within the configured window
//! accumulate counts for every cross-event topic (or entity) pair. One
//! event pair contributes at most once to a given pair. Strengths are
//! normalized into [0, 1] by the maximum pair count.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityType, StructuredEvent};

/// Two topics repeatedly active close together in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCooccurrence {
    pub topic_a: String,
    pub topic_b: String,
    pub shared_events: usize,
    /// Normalized strength in [0, 1]
    pub strength: f32,
    /// Window the pair was accumulated under
    pub window_minutes: i64,
}

/// Two entities appearing in nearby events, with the activity types
/// they were seen under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRelation {
    pub entity_a: String,
    pub entity_b: String,
    pub shared_events: usize,
    pub contexts: BTreeSet<ActivityType>,
}

/// Compute topic co-occurrence over timestamp-ordered events
pub fn topic_cooccurrence(
    events: &[StructuredEvent],
    window_minutes: i64,
) -> Vec<TopicCooccurrence> {
    let counts = pair_counts(events, window_minutes, |e| &e.topics);

    let max_count = counts.values().max().copied().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }

    let mut result: Vec<TopicCooccurrence> = counts
        .into_iter()
        .map(|((a, b), count)| TopicCooccurrence {
            topic_a: a,
            topic_b: b,
            shared_events: count,
            strength: count as f32 / max_count as f32,
            window_minutes,
        })
        .collect();

    result.sort_by(|a, b| {
        b.shared_events
            .cmp(&a.shared_events)
            .then_with(|| a.topic_a.cmp(&b.topic_a))
            .then_with(|| a.topic_b.cmp(&b.topic_b))
    });
    result
}

/// Compute entity relations over timestamp-ordered events
pub fn entity_relations(events: &[StructuredEvent], window_minutes: i64) -> Vec<EntityRelation> {
    let window = Duration::minutes(window_minutes.max(0));
    let mut counts: BTreeMap<(String, String), (usize, BTreeSet<ActivityType>)> = BTreeMap::new();

    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            if b.timestamp.signed_duration_since(a.timestamp) > window {
                break;
            }
            for pair in cross_pairs(&a.entities, &b.entities) {
                let entry = counts.entry(pair).or_default();
                entry.0 += 1;
                entry.1.insert(a.activity_type);
                entry.1.insert(b.activity_type);
            }
        }
    }

    let mut result: Vec<EntityRelation> = counts
        .into_iter()
        .map(|((a, b), (count, contexts))| EntityRelation {
            entity_a: a,
            entity_b: b,
            shared_events: count,
            contexts,
        })
        .collect();

    result.sort_by(|a, b| {
        b.shared_events
            .cmp(&a.shared_events)
            .then_with(|| a.entity_a.cmp(&b.entity_a))
            .then_with(|| a.entity_b.cmp(&b.entity_b))
    });
    result
}

fn pair_counts<F>(
    events: &[StructuredEvent],
    window_minutes: i64,
    items: F,
) -> BTreeMap<(String, String), usize>
where
    F: Fn(&StructuredEvent) -> &BTreeSet<String>,
{
    let window = Duration::minutes(window_minutes.max(0));
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();

    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            if b.timestamp.signed_duration_since(a.timestamp) > window {
                break;
            }
            for pair in cross_pairs(items(a), items(b)) {
                *counts.entry(pair).or_default() += 1;
            }
        }
    }

    counts
}

/// Unordered cross pairs between two sets, deduplicated per call
fn cross_pairs(left: &BTreeSet<String>, right: &BTreeSet<String>) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for a in left {
        for b in right {
            if a == b {
                continue;
            }
            let pair = if a < b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            pairs.insert(pair);
        }
    }
    pairs
}
