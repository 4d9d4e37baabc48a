//! Temporal activity clustering
//!
//! Groups events into contiguous hour blocks. A run of adjacent hours
//! that each have at least one event forms a candidate cluster; it is
//! kept when its total event count reaches the configured minimum.
//! Labels are built from the dominant activity type and topics only.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityType, StructuredEvent};

/// A block of sustained activity within the day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCluster {
    pub label: String,
    /// First hour of the block (UTC, 0-23)
    pub start_hour: u32,
    /// Last hour of the block, inclusive
    pub end_hour: u32,
    pub event_count: usize,
    pub dominant_type: ActivityType,
    pub topics: BTreeSet<String>,
    pub entities: BTreeSet<String>,
    /// Events per hour across the block
    pub intensity: f32,
}

impl ActivityCluster {
    pub fn duration_hours(&self) -> u32 {
        self.end_hour - self.start_hour + 1
    }
}

/// Build clusters from timestamp-ordered events
pub fn build_clusters(events: &[StructuredEvent], min_cluster_size: usize) -> Vec<ActivityCluster> {
    let min_cluster_size = min_cluster_size.max(1);

    let mut by_hour: BTreeMap<u32, Vec<&StructuredEvent>> = BTreeMap::new();
    for event in events {
        by_hour.entry(event.hour()).or_default().push(event);
    }

    let mut clusters = Vec::new();
    let mut run: Vec<u32> = Vec::new();

    for hour in 0..24 {
        if by_hour.contains_key(&hour) {
            run.push(hour);
            continue;
        }
        if !run.is_empty() {
            if let Some(cluster) = finish_run(&run, &by_hour, min_cluster_size) {
                clusters.push(cluster);
            }
            run.clear();
        }
    }
    if !run.is_empty() {
        if let Some(cluster) = finish_run(&run, &by_hour, min_cluster_size) {
            clusters.push(cluster);
        }
    }

    clusters
}

fn finish_run(
    run: &[u32],
    by_hour: &BTreeMap<u32, Vec<&StructuredEvent>>,
    min_cluster_size: usize,
) -> Option<ActivityCluster> {
    let block: Vec<&StructuredEvent> = run
        .iter()
        .flat_map(|h| by_hour.get(h).into_iter().flatten().copied())
        .collect();

    if block.len() < min_cluster_size {
        return None;
    }

    let mut type_counts: BTreeMap<ActivityType, usize> = BTreeMap::new();
    let mut topics = BTreeSet::new();
    let mut entities = BTreeSet::new();
    for event in &block {
        *type_counts.entry(event.activity_type).or_default() += 1;
        topics.extend(event.topics.iter().cloned());
        entities.extend(event.entities.iter().cloned());
    }

    // Ties break toward the lower-ordered variant for determinism
    let dominant_type = type_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(ty, _)| *ty)?;

    let start_hour = *run.first()?;
    let end_hour = *run.last()?;
    let hours = (end_hour - start_hour + 1) as f32;

    Some(ActivityCluster {
        label: label_for(dominant_type, &topics),
        start_hour,
        end_hour,
        event_count: block.len(),
        dominant_type,
        topics,
        entities,
        intensity: block.len() as f32 / hours,
    })
}

/// Cluster label from the dominant type and leading topics only
fn label_for(dominant_type: ActivityType, topics: &BTreeSet<String>) -> String {
    let leading: Vec<&str> = topics.iter().take(2).map(String::as_str).collect();
    if leading.is_empty() {
        format!("{} block", dominant_type)
    } else {
        format!("{} around {}", dominant_type, leading.join(", "))
    }
}
