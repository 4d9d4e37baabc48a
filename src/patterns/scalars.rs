//! Aggregate scalars over a day of events
//!
//! Concentration scores are Herfindahl sums of squared shares: 1.0
//! when all weight sits on a single topic or activity type, tending
//! toward 0 as attention spreads out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityType, StructuredEvent};

/// Share of the day taken by one activity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityShare {
    pub activity_type: ActivityType,
    pub count: usize,
    /// Percentage of all events, 0-100
    pub pct: f32,
}

/// Concentration of attention across topics
pub fn focus_score(events: &[StructuredEvent]) -> f32 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        for topic in &event.topics {
            *counts.entry(topic.as_str()).or_default() += 1;
        }
    }
    herfindahl(counts.values().copied())
}

/// Concentration of events across activity types
pub fn activity_concentration(events: &[StructuredEvent]) -> f32 {
    herfindahl(type_counts(events).values().copied())
}

/// Activity types by descending event count
pub fn top_activity_types(events: &[StructuredEvent]) -> Vec<ActivityShare> {
    let total = events.len();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<ActivityShare> = type_counts(events)
        .into_iter()
        .map(|(activity_type, count)| ActivityShare {
            activity_type,
            count,
            pct: count as f32 * 100.0 / total as f32,
        })
        .collect();

    shares.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.activity_type.cmp(&b.activity_type))
    });
    shares
}

/// Up to three busiest hours, busiest first; ties go to the earlier hour
pub fn peak_hours(events: &[StructuredEvent]) -> Vec<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.hour()).or_default() += 1;
    }

    let mut hours: Vec<(u32, usize)> = counts.into_iter().collect();
    hours.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    hours.into_iter().take(3).map(|(hour, _)| hour).collect()
}

fn type_counts(events: &[StructuredEvent]) -> BTreeMap<ActivityType, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.activity_type).or_default() += 1;
    }
    counts
}

fn herfindahl(counts: impl Iterator<Item = usize>) -> f32 {
    let counts: Vec<usize> = counts.collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .iter()
        .map(|&c| {
            let share = c as f32 / total as f32;
            share * share
        })
        .sum()
}
