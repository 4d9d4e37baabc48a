//! Sensitive domain filtering
//!
//! Second stage of the pipeline: drops or redacts visits and searches that
//! touch sensitive life areas before anything is classified. Includes:
//! - Built-in category catalog (health, finance, job search, ...)
//! - Compiled filter with exact / subdomain / path-prefix precedence
//! - Exact per-category telemetry counts

pub mod catalog;
pub mod filter;

pub use catalog::{all_categories, builtin_entries};
pub use filter::{FilterCounts, SensitivityFilter, REDACTED_PLACEHOLDER};
