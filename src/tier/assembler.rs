//! Prompt assembly
//!
//! Renders the permitted layers into one templated prompt with tagged
//! sections. The assembler re-applies `filter_by_tier` on entry, so a
//! caller can never hand it more context than the tier allows. When
//! the tier's primary layer is missing the remaining sections stand in
//! and the prompt is never empty.

use serde::{Deserialize, Serialize};

use crate::activity::ClassificationResult;
use crate::patterns::PatternAnalysis;

use super::layers::{ContextLayers, RawLayer};
use super::resolver::PrivacyTier;

pub const CAPABILITY_DAILY_DIGEST: &str = "daily_digest";

/// Maximum classified event lines rendered before eliding
const MAX_EVENT_LINES: usize = 50;

/// Maximum entity relation lines rendered
const MAX_RELATION_LINES: usize = 10;

/// Envelope handed to the provider transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
    pub prompt: String,
    pub tier: PrivacyTier,
    pub capability: String,
    /// Rough size heuristic: one token per four characters
    pub token_estimate: usize,
}

pub struct PromptAssembler;

impl PromptAssembler {
    pub fn assemble(tier: PrivacyTier, layers: &ContextLayers) -> AssembledPrompt {
        let layers = layers.clone().filter_by_tier(tier);

        let mut body = String::new();
        if let Some(raw) = &layers.raw {
            render_raw(&mut body, raw);
        }
        if let Some(condensed) = &layers.condensed {
            section(&mut body, "condensed_context", condensed);
        }
        if let Some(classification) = &layers.classification {
            render_classification(&mut body, classification);
        }
        if let Some(patterns) = &layers.patterns {
            render_patterns(&mut body, patterns);
        }

        let mut prompt = String::new();
        prompt.push_str(instruction(tier));
        prompt.push_str("\n\n");
        if body.is_empty() {
            prompt.push_str("No activity was recorded for this period.\n");
        } else {
            prompt.push_str(&body);
        }

        let token_estimate = prompt.chars().count() / 4;
        AssembledPrompt {
            prompt,
            tier,
            capability: CAPABILITY_DAILY_DIGEST.to_string(),
            token_estimate,
        }
    }
}

fn instruction(tier: PrivacyTier) -> &'static str {
    match tier {
        PrivacyTier::FullContext => {
            "Summarize this person's working day from their full activity \
             context below. Ground every statement in the records provided."
        }
        PrivacyTier::Condensed => {
            "Summarize this person's working day from the condensed activity \
             digest below. Ground every statement in the digest."
        }
        PrivacyTier::Abstractions => {
            "Summarize this person's working day from the classified activity \
             abstractions below. Do not reproduce or invent URLs, page titles, \
             or verbatim search queries."
        }
        PrivacyTier::Aggregates => {
            "Summarize the shape of this person's working day from the \
             aggregated statistics below. Describe only what the aggregates \
             support. Do not invent specific pages, commands, timestamps, or \
             any other detail that is not present."
        }
    }
}

fn section(out: &mut String, tag: &str, content: &str) {
    if content.trim().is_empty() {
        return;
    }
    out.push_str(&format!("<{}>\n", tag));
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("</{}>\n\n", tag));
}

fn render_raw(out: &mut String, raw: &RawLayer) {
    let mut visits = String::new();
    for v in &raw.visits {
        visits.push_str(&format!(
            "- {} {} | {}\n",
            v.timestamp.format("%H:%M"),
            v.url,
            v.title
        ));
    }
    section(out, "visits", &visits);

    let mut searches = String::new();
    for s in &raw.searches {
        match &s.engine {
            Some(engine) => searches.push_str(&format!(
                "- {} ({}) {}\n",
                s.timestamp.format("%H:%M"),
                engine,
                s.query
            )),
            None => {
                searches.push_str(&format!("- {} {}\n", s.timestamp.format("%H:%M"), s.query))
            }
        }
    }
    section(out, "searches", &searches);

    let mut prompts = String::new();
    for p in &raw.prompts {
        prompts.push_str(&format!("- {} {}\n", p.timestamp.format("%H:%M"), p.prompt));
    }
    section(out, "assistant_prompts", &prompts);

    let mut commits = String::new();
    for c in &raw.commits {
        match &c.repo {
            Some(repo) => commits.push_str(&format!(
                "- {} ({}) {}\n",
                c.timestamp.format("%H:%M"),
                repo,
                c.message
            )),
            None => {
                commits.push_str(&format!("- {} {}\n", c.timestamp.format("%H:%M"), c.message))
            }
        }
    }
    section(out, "commits", &commits);
}

fn render_classification(out: &mut String, result: &ClassificationResult) {
    let mut events = String::new();
    for event in result.events.iter().take(MAX_EVENT_LINES) {
        let topics = if event.topics.is_empty() {
            String::new()
        } else {
            format!(
                " (topics: {})",
                event
                    .topics
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        events.push_str(&format!(
            "- {:02}h [{}] {}: {}{}\n",
            event.hour(),
            event.source,
            event.activity_type,
            event.summary,
            topics
        ));
    }
    if result.events.len() > MAX_EVENT_LINES {
        events.push_str(&format!(
            "(+{} more events)\n",
            result.events.len() - MAX_EVENT_LINES
        ));
    }
    section(out, "classified_events", &events);
}

fn render_patterns(out: &mut String, patterns: &PatternAnalysis) {
    let mut distribution = String::new();
    for share in &patterns.top_activity_types {
        distribution.push_str(&format!(
            "{}: {} events ({:.1}%)\n",
            share.activity_type, share.count, share.pct
        ));
    }
    if !patterns.top_activity_types.is_empty() {
        distribution.push_str(&format!("focus score: {:.2}\n", patterns.focus_score));
        distribution.push_str(&format!(
            "activity concentration: {:.2}\n",
            patterns.activity_concentration
        ));
    }
    section(out, "activity_distribution", &distribution);

    let peaks = patterns
        .peak_hours
        .iter()
        .map(|h| format!("{:02}:00", h))
        .collect::<Vec<_>>()
        .join(", ");
    section(out, "peak_hours", &peaks);

    let mut trends = String::new();
    for r in &patterns.recurrence {
        trends.push_str(&format!(
            "{}: {} ({} active days)\n",
            r.topic, r.trend, r.day_count
        ));
    }
    section(out, "topic_trends", &trends);

    let mut clusters = String::new();
    for c in &patterns.clusters {
        clusters.push_str(&format!(
            "{:02}:00-{:02}:59 {}: {} events, {:.1} per hour\n",
            c.start_hour, c.end_hour, c.label, c.event_count, c.intensity
        ));
    }
    section(out, "activity_clusters", &clusters);

    let mut relations = String::new();
    for r in patterns.entity_relations.iter().take(MAX_RELATION_LINES) {
        let contexts = r
            .contexts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        relations.push_str(&format!(
            "{} with {} ({} shared events; {})\n",
            r.entity_a, r.entity_b, r.shared_events, contexts
        ));
    }
    section(out, "entity_relations", &relations);

    let delta = &patterns.knowledge_delta;
    let mut knowledge = String::new();
    if !delta.new_topics.is_empty() {
        knowledge.push_str(&format!(
            "new topics: {}\n",
            delta.new_topics.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    if !delta.recurring_topics.is_empty() {
        knowledge.push_str(&format!(
            "recurring topics: {}\n",
            delta
                .recurring_topics
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !delta.novel_entities.is_empty() {
        knowledge.push_str(&format!(
            "novel entities: {}\n",
            delta
                .novel_entities
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !delta.connections.is_empty() {
        knowledge.push_str(&format!("connections: {}\n", delta.connections.join("; ")));
    }
    section(out, "knowledge_delta", &knowledge);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{
        ActivityRecord, ActivitySource, ActivityType, SearchRecord, StructuredEvent, VisitRecord,
    };
    use crate::config::PatternConfig;
    use crate::patterns::{PatternExtractor, TopicHistory};
    use crate::tier::layers::condense;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn records() -> Vec<ActivityRecord> {
        vec![
            ActivityRecord::Visit(VisitRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 9, 14, 0).unwrap(),
                url: "https://docs.rs/tokio".to_string(),
                title: "tokio - Rust".to_string(),
                category: None,
            }),
            ActivityRecord::Search(SearchRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 9, 40, 0).unwrap(),
                query: "rust async cancellation".to_string(),
                engine: None,
            }),
        ]
    }

    fn event(hour: u32, summary: &str, topic: &str) -> StructuredEvent {
        StructuredEvent::new(
            Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap(),
            ActivitySource::Browser,
            ActivityType::Learning,
            0.7,
            summary,
        )
        .with_topics([topic.to_string()])
    }

    fn full_layers() -> ContextLayers {
        let recs = records();
        let classification = ClassificationResult {
            events: vec![
                event(9, "Read rust material on docs.rs", "rust"),
                event(9, "Searched the web about rust", "rust"),
                event(9, "Read database material", "databases"),
            ],
            total_processed: 3,
            rule_classified: 3,
            llm_classified: 0,
            processing_time_ms: 2,
        };

        let extractor = PatternExtractor::new(PatternConfig::default());
        let mut history = TopicHistory::new();
        let patterns = extractor.extract(
            &classification,
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            &mut history,
        );

        ContextLayers {
            raw: Some(RawLayer::from_records(&recs)),
            condensed: Some(condense(&recs)),
            classification: Some(classification),
            patterns: Some(patterns),
        }
    }

    #[test]
    fn test_tier4_prompt_contains_only_aggregates() {
        let assembled = PromptAssembler::assemble(PrivacyTier::Aggregates, &full_layers());

        assert_eq!(assembled.tier, PrivacyTier::Aggregates);
        assert!(assembled.prompt.contains("<activity_distribution>"));
        assert!(assembled.prompt.contains("<topic_trends>"));
        // Nothing event-level or raw leaks through
        assert!(!assembled.prompt.contains("https://"));
        assert!(!assembled.prompt.contains("docs.rs"));
        assert!(!assembled.prompt.contains("Read rust material"));
        assert!(!assembled.prompt.contains("rust async cancellation"));
        assert!(!assembled.prompt.contains("2024-"));
        assert!(!assembled.prompt.contains("<classified_events>"));
    }

    #[test]
    fn test_tier3_prompt_has_abstractions_but_no_raw() {
        let assembled = PromptAssembler::assemble(PrivacyTier::Abstractions, &full_layers());

        assert!(assembled.prompt.contains("<classified_events>"));
        assert!(assembled.prompt.contains("Read rust material on docs.rs"));
        assert!(!assembled.prompt.contains("https://"));
        assert!(!assembled.prompt.contains("rust async cancellation"));
        assert!(!assembled.prompt.contains("tokio - Rust"));
        assert!(!assembled.prompt.contains("<condensed_context>"));
    }

    #[test]
    fn test_tier2_prompt_has_condensed_but_no_raw_arrays() {
        let assembled = PromptAssembler::assemble(PrivacyTier::Condensed, &full_layers());

        assert!(assembled.prompt.contains("<condensed_context>"));
        assert!(!assembled.prompt.contains("<visits>"));
        assert!(!assembled.prompt.contains("<searches>"));
    }

    #[test]
    fn test_tier1_prompt_has_raw_but_no_condensed() {
        let assembled = PromptAssembler::assemble(PrivacyTier::FullContext, &full_layers());

        assert!(assembled.prompt.contains("<visits>"));
        assert!(assembled.prompt.contains("https://docs.rs/tokio"));
        assert!(assembled.prompt.contains("<searches>"));
        assert!(assembled.prompt.contains("rust async cancellation"));
        assert!(!assembled.prompt.contains("<condensed_context>"));
    }

    #[test]
    fn test_degrades_when_primary_layer_missing() {
        let mut layers = full_layers();
        layers.raw = None;
        let assembled = PromptAssembler::assemble(PrivacyTier::FullContext, &layers);

        assert!(assembled.prompt.contains("<classified_events>"));
        assert!(!assembled.prompt.trim().is_empty());
    }

    #[test]
    fn test_empty_layers_still_non_empty_prompt() {
        let assembled =
            PromptAssembler::assemble(PrivacyTier::Aggregates, &ContextLayers::default());

        assert!(assembled
            .prompt
            .contains("No activity was recorded for this period."));
        assert!(assembled.token_estimate > 0);
    }

    #[test]
    fn test_token_estimate_is_quarter_of_chars() {
        let assembled = PromptAssembler::assemble(PrivacyTier::Aggregates, &full_layers());
        assert_eq!(
            assembled.token_estimate,
            assembled.prompt.chars().count() / 4
        );
    }

    #[test]
    fn test_assembler_filters_even_unfiltered_input() {
        // Hand the assembler everything at tier 4; it must filter itself
        let assembled = PromptAssembler::assemble(PrivacyTier::Aggregates, &full_layers());
        assert!(!assembled.prompt.contains("<visits>"));
        assert!(!assembled.prompt.contains("<classified_events>"));
    }

    #[test]
    fn test_envelope_serialization() {
        let assembled = PromptAssembler::assemble(PrivacyTier::Abstractions, &full_layers());
        let json = serde_json::to_string(&assembled).unwrap();
        assert!(json.contains("\"tier\":3"));
        assert!(json.contains("\"capability\":\"daily_digest\""));
        assert!(json.contains("\"tokenEstimate\""));
    }
}
