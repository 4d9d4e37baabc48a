//! Raw activity records
//!
//! Wire types for the per-source records collectors hand to the pipeline.
//! All records use camelCase JSON serialization and carry a UTC timestamp;
//! the union is tagged by a `kind` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source an activity record was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Browser,
    Search,
    Assistant,
    Git,
}

impl ActivitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Search => "search",
            Self::Assistant => "assistant",
            Self::Git => "git",
        }
    }
}

impl std::fmt::Display for ActivitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivitySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "browser" => Ok(Self::Browser),
            "search" => Ok(Self::Search),
            "assistant" => Ok(Self::Assistant),
            "git" => Ok(Self::Git),
            other => Err(format!("unknown activity source: {}", other)),
        }
    }
}

/// A single page visit from the browser collector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub title: String,
    /// Category label attached upstream (browser categorization), if any
    #[serde(default)]
    pub category: Option<String>,
}

/// A search query from the search collector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    #[serde(default)]
    pub engine: Option<String>,
}

/// A prompt sent during an AI-assistant session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// A version-control commit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub repo: Option<String>,
}

/// Tagged union over the per-source record types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityRecord {
    Visit(VisitRecord),
    Search(SearchRecord),
    Prompt(PromptRecord),
    Commit(CommitRecord),
}

impl ActivityRecord {
    pub fn source(&self) -> ActivitySource {
        match self {
            Self::Visit(_) => ActivitySource::Browser,
            Self::Search(_) => ActivitySource::Search,
            Self::Prompt(_) => ActivitySource::Assistant,
            Self::Commit(_) => ActivitySource::Git,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Visit(v) => v.timestamp,
            Self::Search(s) => s.timestamp,
            Self::Prompt(p) => p.timestamp,
            Self::Commit(c) => c.timestamp,
        }
    }

    /// Primary free-text payload of the record
    pub fn text(&self) -> &str {
        match self {
            Self::Visit(v) => &v.title,
            Self::Search(s) => &s.query,
            Self::Prompt(p) => &p.prompt,
            Self::Commit(c) => &c.message,
        }
    }

    /// Mutable references to every free-text field, for in-place scrubbing.
    /// Visit URLs are included; callers that sanitize URLs structurally
    /// should do so before the text pass.
    pub fn texts_mut(&mut self) -> Vec<&mut String> {
        match self {
            Self::Visit(v) => vec![&mut v.url, &mut v.title],
            Self::Search(s) => vec![&mut s.query],
            Self::Prompt(p) => vec![&mut p.prompt],
            Self::Commit(c) => vec![&mut c.message],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_visit_serialization() {
        let record = ActivityRecord::Visit(VisitRecord {
            timestamp: ts(),
            url: "https://docs.rs/tokio".to_string(),
            title: "tokio - Rust".to_string(),
            category: None,
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"kind\":\"visit\""));
        assert!(json.contains("\"url\":\"https://docs.rs/tokio\""));

        let parsed: ActivityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source(), ActivitySource::Browser);
        assert_eq!(parsed.timestamp(), ts());
    }

    #[test]
    fn test_search_missing_engine() {
        let json = r#"{
            "kind": "search",
            "timestamp": "2024-06-12T14:30:00Z",
            "query": "rust lifetimes"
        }"#;

        let parsed: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.source(), ActivitySource::Search);
        assert_eq!(parsed.text(), "rust lifetimes");
    }

    #[test]
    fn test_prompt_session_id_round_trip() {
        let id = Uuid::new_v4();
        let record = ActivityRecord::Prompt(PromptRecord {
            timestamp: ts(),
            prompt: "why does this borrow fail".to_string(),
            session_id: Some(id),
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"sessionId\""));
        let parsed: ActivityRecord = serde_json::from_str(&json).unwrap();
        match parsed {
            ActivityRecord::Prompt(p) => assert_eq!(p.session_id, Some(id)),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_texts_mut_covers_all_fields() {
        let mut record = ActivityRecord::Visit(VisitRecord {
            timestamp: ts(),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            category: None,
        });

        for text in record.texts_mut() {
            *text = "X".to_string();
        }
        match record {
            ActivityRecord::Visit(v) => {
                assert_eq!(v.url, "X");
                assert_eq!(v.title, "X");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_source_display_and_from_str() {
        assert_eq!(ActivitySource::Assistant.to_string(), "assistant");
        assert_eq!("git".parse::<ActivitySource>().unwrap(), ActivitySource::Git);
        assert!("mailbox".parse::<ActivitySource>().is_err());
    }
}
