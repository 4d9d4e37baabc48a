//! Activity data model
//!
//! Defines the raw records collected from each activity source and the
//! structured abstractions the classifier derives from them:
//! - Raw records (browser visits, searches, assistant prompts, commits)
//! - Structured events with a closed activity-type vocabulary
//! - Classification result envelope with per-path counters

pub mod event;
pub mod record;

pub use event::{ActivityType, ClassificationResult, Intent, StructuredEvent};
pub use record::{
    ActivityRecord, ActivitySource, CommitRecord, PromptRecord, SearchRecord, VisitRecord,
};
