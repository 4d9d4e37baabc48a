//! Cross-event and cross-day pattern extraction
//!
//! Consumes classified events and produces aggregate signals only:
//! temporal clusters, topic/entity co-occurrence, recurrence trends
//! against persisted history, a knowledge delta, and concentration
//! scalars. Nothing in the output carries raw URLs, commands, or
//! per-event timestamps, so every field is safe at the most private
//! tier.

pub mod clusters;
pub mod extractor;
pub mod graph;
pub mod history;
pub mod recurrence;
pub mod scalars;

pub use clusters::ActivityCluster;
pub use extractor::{KnowledgeDelta, PatternAnalysis, PatternExtractor};
pub use graph::{EntityRelation, TopicCooccurrence};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, TopicHistory};
pub use recurrence::{TopicRecurrence, TopicTrend};
pub use scalars::ActivityShare;
