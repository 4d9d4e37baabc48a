//! Pluggable topic refinement interface
//!
//! The rule path is always authoritative for structure; a refiner may
//! improve topics, entities, and confidence for a batch of events. The
//! transport client behind the interface is injected by the caller, so
//! the pipeline never talks to a provider directly.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::activity::StructuredEvent;
use crate::error::Result;

/// Partial override for one event, positionally aligned with the batch.
///
/// `None` fields leave the rule-path value in place.
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    pub topics: Option<BTreeSet<String>>,
    pub entities: Option<BTreeSet<String>>,
    pub confidence: Option<f32>,
}

/// Batch refinement backend.
///
/// Implementations receive rule-classified events and return one
/// `Refinement` per event, in order. Returning fewer refinements than
/// events leaves the tail untouched. Any `Err` makes the caller keep
/// the rule results for the whole batch.
#[async_trait]
pub trait TopicRefiner: Send + Sync {
    async fn refine(&self, events: &[StructuredEvent]) -> Result<Vec<Refinement>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Merge a refinement into an event in place
pub fn apply_refinement(event: &mut StructuredEvent, refinement: Refinement) {
    if let Some(topics) = refinement.topics {
        event.topics = topics;
    }
    if let Some(entities) = refinement.entities {
        event.entities = entities;
    }
    if let Some(confidence) = refinement.confidence {
        event.set_confidence(confidence);
    }
}
