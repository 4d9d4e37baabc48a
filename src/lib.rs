//! Dayveil - Privacy-Tiered Activity Digests
//!
//! Dayveil turns one day of personal activity records (browser visits, web
//! searches, AI-assistant prompts, commits) into a summarization prompt an
//! untrusted AI provider can consume, shaped so the provider only ever sees
//! the least revealing layer of context the digest needs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌────────────────────┐
//! │   Scrubber   │──▶│ Sensitive Domain │──▶│  Event Classifier  │
//! │  secrets,    │   │      Filter      │   │  rule path + LLM   │
//! │  PII, URLs   │   │  category rules  │   │     refinement     │
//! └──────────────┘   └──────────────────┘   └─────────┬──────────┘
//!                                                     │
//!                  ┌──────────────────────────────────▼───────────┐
//!                  │             Pattern Extractor                │
//!                  │  clusters, co-occurrence, recurrence trends  │
//!                  │        backed by persisted TopicHistory      │
//!                  └──────────────────────┬───────────────────────┘
//!                                         │
//!                  ┌──────────────────────▼───────────────────────┐
//!                  │      Tier Resolver + Prompt Assembler        │
//!                  │  tiers 1-4, one filter_by_tier choke point   │
//!                  └──────────────────────────────────────────────┘
//! ```
//!
//! ## Privacy Tiers
//!
//! - Tier 1 (full context): sanitized raw records
//! - Tier 2 (condensed): budget-capped text digest of the records
//! - Tier 3 (abstractions): classified events without raw URLs or queries
//! - Tier 4 (aggregates): statistics and pattern signals only
//!
//! Resolution is deterministic: a local provider always gets tier 1, and a
//! remote provider auto-escalates to the most private tier the available
//! layers support unless an operator override (clamped into [1, 4]) says
//! otherwise.
//!
//! ## Modules
//!
//! - [`activity`]: Activity records and structured events
//! - [`scrub`]: Secret and PII scrubbing plus URL sanitization
//! - [`sensitive`]: Sensitive domain filtering by category
//! - [`classify`]: Rule-based classification with optional LLM refinement
//! - [`patterns`]: Cross-event and cross-day pattern extraction
//! - [`tier`]: Tier resolution, layer filtering, and prompt assembly
//! - [`pipeline`]: End-to-end digest runs with telemetry
//! - [`config`]: Configuration management

pub mod activity;
pub mod classify;
pub mod config;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod scrub;
pub mod sensitive;
pub mod tier;

pub use config::DayveilConfig;
pub use error::{Error, Result};
pub use pipeline::{DigestOutcome, DigestPipeline};
