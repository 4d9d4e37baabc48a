//! Event classifier
//!
//! Runs the rule path over every record, then optionally refines the
//! results in batches through the injected `TopicRefiner`. Batches run
//! with bounded parallelism and re-apply by index, so event order
//! (ascending timestamp) is stable across both paths.

use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt};
use tracing::{debug, warn};

use crate::activity::{ActivityRecord, ClassificationResult, StructuredEvent};
use crate::classify::refiner::{self, TopicRefiner};
use crate::classify::rules;
use crate::config::ClassificationConfig;
use crate::error::Result;

pub struct EventClassifier {
    config: ClassificationConfig,
    refiner: Option<Arc<dyn TopicRefiner>>,
}

impl EventClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self {
            config,
            refiner: None,
        }
    }

    pub fn with_refiner(mut self, refiner: Arc<dyn TopicRefiner>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    /// Classify a day of records into structured events.
    ///
    /// Never fails on refiner errors; those batches keep rule results.
    pub async fn classify(&self, records: &[ActivityRecord]) -> Result<ClassificationResult> {
        let started = Instant::now();

        let mut events: Vec<StructuredEvent> =
            records.iter().map(rules::classify_rule_only).collect();
        events.sort_by_key(|e| e.timestamp);

        let mut llm_classified = 0;
        if self.config.llm_refinement {
            match &self.refiner {
                Some(refiner) => {
                    llm_classified = self.refine_batches(refiner, &mut events).await;
                }
                None => {
                    debug!("refinement enabled but no refiner configured, keeping rule results");
                }
            }
        }

        Ok(ClassificationResult {
            total_processed: events.len(),
            llm_classified,
            rule_classified: events.len() - llm_classified,
            processing_time_ms: started.elapsed().as_millis() as u64,
            events,
        })
    }

    /// Refine in batches of `batch_size`, `batch_size` batches in flight.
    /// Returns the number of events that received refined results.
    async fn refine_batches(
        &self,
        refiner: &Arc<dyn TopicRefiner>,
        events: &mut [StructuredEvent],
    ) -> usize {
        let batch_size = self.config.batch_size.max(1);

        let batches: Vec<_> = events
            .chunks(batch_size)
            .enumerate()
            .map(|(index, chunk)| {
                let refiner = Arc::clone(refiner);
                let batch = chunk.to_vec();
                async move { (index * batch_size, refiner.refine(&batch).await) }
            })
            .collect();

        let results: Vec<_> = stream::iter(batches).buffered(batch_size).collect().await;

        let mut refined = 0;
        for (start, result) in results {
            match result {
                Ok(refinements) => {
                    for (offset, refinement) in refinements.into_iter().enumerate() {
                        if let Some(event) = events.get_mut(start + offset) {
                            refiner::apply_refinement(event, refinement);
                            refined += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        refiner = refiner.name(),
                        "refinement batch at offset {} failed, keeping rule results: {}", start, e
                    );
                }
            }
        }
        refined
    }
}
