//! Structured events
//!
//! Output types of the event classifier: each raw record becomes one
//! `StructuredEvent` with a closed activity-type vocabulary, topic and
//! entity sets, and a paraphrased summary safe to ship at tier 3.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::ActivitySource;

/// Closed vocabulary of activity types.
///
/// The classifier and pattern extractor match this exhaustively; adding a
/// variant is a compile-visible change everywhere it is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Coding,
    Debugging,
    Research,
    Learning,
    Review,
    Planning,
    Writing,
    Browsing,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Debugging => "debugging",
            Self::Research => "research",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Planning => "planning",
            Self::Writing => "writing",
            Self::Browsing => "browsing",
        }
    }

    /// Default intent for events of this type
    pub fn intent(&self) -> Intent {
        match self {
            Self::Coding | Self::Writing => Intent::Building,
            Self::Debugging | Self::Research => Intent::Investigating,
            Self::Learning => Intent::Learning,
            Self::Review => Intent::Reviewing,
            Self::Planning => Intent::Organizing,
            Self::Browsing => Intent::Exploring,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coding" => Ok(Self::Coding),
            "debugging" => Ok(Self::Debugging),
            "research" => Ok(Self::Research),
            "learning" => Ok(Self::Learning),
            "review" => Ok(Self::Review),
            "planning" => Ok(Self::Planning),
            "writing" => Ok(Self::Writing),
            "browsing" => Ok(Self::Browsing),
            other => Err(format!("unknown activity type: {}", other)),
        }
    }
}

/// Coarse intent behind an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Building,
    Investigating,
    Learning,
    Reviewing,
    Organizing,
    Exploring,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Investigating => "investigating",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Organizing => "organizing",
            Self::Exploring => "exploring",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified activity event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredEvent {
    pub timestamp: DateTime<Utc>,
    pub source: ActivitySource,
    pub activity_type: ActivityType,
    pub topics: BTreeSet<String>,
    pub entities: BTreeSet<String>,
    pub intent: Intent,
    /// Classification confidence, always within [0.0, 1.0]
    pub confidence: f32,
    /// Paraphrased description; never verbatim titles or query text
    pub summary: String,
}

impl StructuredEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        source: ActivitySource,
        activity_type: ActivityType,
        confidence: f32,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            source,
            activity_type,
            topics: BTreeSet::new(),
            entities: BTreeSet::new(),
            intent: activity_type.intent(),
            confidence: confidence.clamp(0.0, 1.0),
            summary: summary.into(),
        }
    }

    pub fn with_topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
        self.topics.extend(topics);
        self
    }

    pub fn with_entities(mut self, entities: impl IntoIterator<Item = String>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Replace the confidence, clamped into [0.0, 1.0]
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = confidence.clamp(0.0, 1.0);
    }

    /// Hour of day (UTC) this event occurred in
    pub fn hour(&self) -> u32 {
        use chrono::Timelike;
        self.timestamp.time().hour()
    }
}

/// Classifier output envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub events: Vec<StructuredEvent>,
    pub total_processed: usize,
    /// Events whose topics/entities were refined by the LLM path
    pub llm_classified: usize,
    /// Events carrying rule-path results only
    pub rule_classified: usize,
    pub processing_time_ms: u64,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Union of all topics across events
    pub fn all_topics(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .flat_map(|e| e.topics.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_confidence_clamped_at_construction() {
        let event = StructuredEvent::new(
            ts(9),
            ActivitySource::Browser,
            ActivityType::Learning,
            1.7,
            "Read library documentation",
        );
        assert_eq!(event.confidence, 1.0);

        let mut event = StructuredEvent::new(
            ts(9),
            ActivitySource::Browser,
            ActivityType::Learning,
            -0.3,
            "Read library documentation",
        );
        assert_eq!(event.confidence, 0.0);

        event.set_confidence(2.0);
        assert_eq!(event.confidence, 1.0);
    }

    #[test]
    fn test_intent_follows_activity_type() {
        let event = StructuredEvent::new(
            ts(10),
            ActivitySource::Git,
            ActivityType::Debugging,
            0.6,
            "Fixed a test failure",
        );
        assert_eq!(event.intent, Intent::Investigating);
        assert_eq!(ActivityType::Browsing.intent(), Intent::Exploring);
    }

    #[test]
    fn test_activity_type_round_trip() {
        for ty in [
            ActivityType::Coding,
            ActivityType::Debugging,
            ActivityType::Research,
            ActivityType::Learning,
            ActivityType::Review,
            ActivityType::Planning,
            ActivityType::Writing,
            ActivityType::Browsing,
        ] {
            assert_eq!(ty.as_str().parse::<ActivityType>().unwrap(), ty);
        }
        assert!("idle".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_all_topics_union() {
        let mut result = ClassificationResult::default();
        result.events.push(
            StructuredEvent::new(
                ts(9),
                ActivitySource::Browser,
                ActivityType::Research,
                0.6,
                "Researched database internals",
            )
            .with_topics(["databases".to_string(), "rust".to_string()]),
        );
        result.events.push(
            StructuredEvent::new(
                ts(10),
                ActivitySource::Search,
                ActivityType::Research,
                0.5,
                "Searched for database material",
            )
            .with_topics(["databases".to_string()]),
        );

        let topics = result.all_topics();
        assert_eq!(topics.len(), 2);
        assert!(topics.contains("rust"));
    }

    #[test]
    fn test_hour_extraction() {
        let event = StructuredEvent::new(
            ts(22),
            ActivitySource::Assistant,
            ActivityType::Coding,
            0.6,
            "Worked through an implementation question",
        );
        assert_eq!(event.hour(), 22);
    }
}
