//! Pattern extraction over a classified day
//!
//! Applies each analysis independently and combines the results into
//! one `PatternAnalysis`. Recurrence updates the passed-in history
//! first, so trends always see today's sightings.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::ClassificationResult;
use crate::config::PatternConfig;

use super::clusters::{build_clusters, ActivityCluster};
use super::graph::{entity_relations, topic_cooccurrence, EntityRelation, TopicCooccurrence};
use super::history::TopicHistory;
use super::recurrence::{compute_recurrence, TopicRecurrence, TopicTrend};
use super::scalars::{
    activity_concentration, focus_score, peak_hours, top_activity_types, ActivityShare,
};

const MAX_CONNECTIONS: usize = 3;

/// What changed in the day's knowledge landscape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDelta {
    pub new_topics: BTreeSet<String>,
    pub recurring_topics: BTreeSet<String>,
    /// Entities first seen alongside a new topic
    pub novel_entities: BTreeSet<String>,
    /// Short cross-topic connection phrases from the strongest pairs
    pub connections: Vec<String>,
}

/// Aggregate pattern output for one day.
///
/// Contains no raw URLs, commands, or per-event timestamps; hours are
/// the finest temporal grain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub clusters: Vec<ActivityCluster>,
    pub topic_cooccurrence: Vec<TopicCooccurrence>,
    pub entity_relations: Vec<EntityRelation>,
    pub recurrence: Vec<TopicRecurrence>,
    pub knowledge_delta: KnowledgeDelta,
    pub focus_score: f32,
    pub activity_concentration: f32,
    pub top_activity_types: Vec<ActivityShare>,
    pub peak_hours: Vec<u32>,
}

impl PatternAnalysis {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
            && self.topic_cooccurrence.is_empty()
            && self.recurrence.is_empty()
            && self.top_activity_types.is_empty()
    }
}

pub struct PatternExtractor {
    config: PatternConfig,
}

impl PatternExtractor {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Extract patterns from a classified day.
    ///
    /// Mutates `history` by appending today's topics when recurrence
    /// tracking is enabled; the caller persists it afterwards.
    pub fn extract(
        &self,
        result: &ClassificationResult,
        today: NaiveDate,
        history: &mut TopicHistory,
    ) -> PatternAnalysis {
        let events = &result.events;
        let topics = result.all_topics();

        let clusters = build_clusters(events, self.config.min_cluster_size);
        let cooccurrence = topic_cooccurrence(events, self.config.cooccurrence_window_minutes);
        let relations = entity_relations(events, self.config.cooccurrence_window_minutes);

        let recurrence = if self.config.track_recurrence {
            history.record_day(today, topics.iter().map(String::as_str));
            compute_recurrence(&topics, today, history)
        } else {
            Vec::new()
        };

        let knowledge_delta = build_knowledge_delta(result, &recurrence, &cooccurrence);

        debug!(
            clusters = clusters.len(),
            topic_pairs = cooccurrence.len(),
            entity_pairs = relations.len(),
            recurring_topics = recurrence.len(),
            "pattern extraction complete"
        );

        PatternAnalysis {
            clusters,
            topic_cooccurrence: cooccurrence,
            entity_relations: relations,
            recurrence,
            knowledge_delta,
            focus_score: focus_score(events),
            activity_concentration: activity_concentration(events),
            top_activity_types: top_activity_types(events),
            peak_hours: peak_hours(events),
        }
    }
}

fn build_knowledge_delta(
    result: &ClassificationResult,
    recurrence: &[TopicRecurrence],
    cooccurrence: &[TopicCooccurrence],
) -> KnowledgeDelta {
    let new_topics: BTreeSet<String> = recurrence
        .iter()
        .filter(|r| r.trend == TopicTrend::New)
        .map(|r| r.topic.clone())
        .collect();

    let recurring_topics: BTreeSet<String> = recurrence
        .iter()
        .filter(|r| r.trend != TopicTrend::New)
        .map(|r| r.topic.clone())
        .collect();

    // Entities are novel when their event carries a topic first seen today
    let novel_entities: BTreeSet<String> = result
        .events
        .iter()
        .filter(|e| e.topics.iter().any(|t| new_topics.contains(t)))
        .flat_map(|e| e.entities.iter().cloned())
        .collect();

    let connections: Vec<String> = cooccurrence
        .iter()
        .take(MAX_CONNECTIONS)
        .map(|pair| format!("{} with {}", pair.topic_a, pair.topic_b))
        .collect();

    KnowledgeDelta {
        new_topics,
        recurring_topics,
        novel_entities,
        connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivitySource, ActivityType, StructuredEvent};
    use chrono::{TimeZone, Utc};

    fn event(hour: u32, ty: ActivityType, topics: &[&str], entities: &[&str]) -> StructuredEvent {
        StructuredEvent::new(
            Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap(),
            ActivitySource::Browser,
            ty,
            0.6,
            "Worked through the day's material",
        )
        .with_topics(topics.iter().map(|t| t.to_string()))
        .with_entities(entities.iter().map(|e| e.to_string()))
    }

    fn classified(events: Vec<StructuredEvent>) -> ClassificationResult {
        ClassificationResult {
            total_processed: events.len(),
            rule_classified: events.len(),
            llm_classified: 0,
            processing_time_ms: 1,
            events,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_extract_produces_all_sections() {
        let result = classified(vec![
            event(9, ActivityType::Coding, &["rust"], &["cargo"]),
            event(9, ActivityType::Coding, &["rust"], &["tokio"]),
            event(9, ActivityType::Debugging, &["rust", "databases"], &[]),
        ]);

        let extractor = PatternExtractor::new(PatternConfig::default());
        let mut history = TopicHistory::new();
        let analysis = extractor.extract(&result, today(), &mut history);

        assert_eq!(analysis.clusters.len(), 1);
        assert!(!analysis.topic_cooccurrence.is_empty());
        assert!(!analysis.recurrence.is_empty());
        assert!(analysis.focus_score > 0.0);
        assert_eq!(analysis.peak_hours[0], 9);
        assert!(!analysis.is_empty());
    }

    #[test]
    fn test_history_updated_with_todays_topics() {
        let result = classified(vec![event(9, ActivityType::Coding, &["rust"], &[])]);

        let extractor = PatternExtractor::new(PatternConfig::default());
        let mut history = TopicHistory::new();
        extractor.extract(&result, today(), &mut history);

        assert_eq!(history.day_count("rust"), 1);
    }

    #[test]
    fn test_recurrence_disabled_leaves_history_untouched() {
        let result = classified(vec![event(9, ActivityType::Coding, &["rust"], &[])]);

        let config = PatternConfig {
            track_recurrence: false,
            ..Default::default()
        };
        let extractor = PatternExtractor::new(config);
        let mut history = TopicHistory::new();
        let analysis = extractor.extract(&result, today(), &mut history);

        assert!(history.is_empty());
        assert!(analysis.recurrence.is_empty());
        assert!(analysis.knowledge_delta.new_topics.is_empty());
    }

    #[test]
    fn test_knowledge_delta_novel_entities() {
        // rust was seen yesterday; observability is new today
        let mut history = TopicHistory::new();
        history.record("rust", NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());

        let result = classified(vec![
            event(9, ActivityType::Coding, &["rust"], &["cargo"]),
            event(10, ActivityType::Research, &["observability"], &["grafana.ini"]),
        ]);

        let extractor = PatternExtractor::new(PatternConfig::default());
        let analysis = extractor.extract(&result, today(), &mut history);

        assert!(analysis.knowledge_delta.new_topics.contains("observability"));
        assert!(analysis.knowledge_delta.recurring_topics.contains("rust"));
        assert!(analysis
            .knowledge_delta
            .novel_entities
            .contains("grafana.ini"));
        assert!(!analysis.knowledge_delta.novel_entities.contains("cargo"));
    }

    #[test]
    fn test_connections_come_from_strongest_pairs() {
        let result = classified(vec![
            event(9, ActivityType::Coding, &["rust"], &[]),
            event(9, ActivityType::Coding, &["databases"], &[]),
            event(9, ActivityType::Coding, &["rust"], &[]),
        ]);

        let extractor = PatternExtractor::new(PatternConfig::default());
        let mut history = TopicHistory::new();
        let analysis = extractor.extract(&result, today(), &mut history);

        assert!(!analysis.knowledge_delta.connections.is_empty());
        assert!(analysis.knowledge_delta.connections[0].contains("databases"));
        assert!(analysis.knowledge_delta.connections[0].contains("rust"));
    }

    #[test]
    fn test_empty_day() {
        let result = classified(Vec::new());
        let extractor = PatternExtractor::new(PatternConfig::default());
        let mut history = TopicHistory::new();
        let analysis = extractor.extract(&result, today(), &mut history);

        assert!(analysis.is_empty());
        assert_eq!(analysis.focus_score, 0.0);
        assert!(analysis.peak_hours.is_empty());
    }
}
