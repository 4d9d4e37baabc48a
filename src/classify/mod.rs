//! Event classification
//!
//! Turns sanitized activity records into structured events through a
//! deterministic rule path, with optional batched refinement by an
//! injected AI backend. The rule path always produces a usable result,
//! so a failed or absent refiner never fails a run.

pub mod classifier;
pub mod refiner;
pub mod rules;

pub use classifier::EventClassifier;
pub use refiner::{Refinement, TopicRefiner};
pub use rules::classify_rule_only;
