//! Privacy tiers and prompt assembly
//!
//! The tier decides which context layers an AI provider may see:
//!
//! 1. **Tier 1**: full sanitized raw context (local providers).
//! 2. **Tier 2**: budget-condensed context, no raw arrays.
//! 3. **Tier 3**: classified abstractions only.
//! 4. **Tier 4**: aggregated statistics only.
//!
//! `ContextLayers::filter_by_tier` is the single choke point between
//! resolution and assembly; the assembler only ever sees layers that
//! already passed it.

pub mod assembler;
pub mod layers;
pub mod resolver;

pub use assembler::{AssembledPrompt, PromptAssembler, CAPABILITY_DAILY_DIGEST};
pub use layers::{condense, ContextLayers, RawLayer};
pub use resolver::{resolve, PrivacyTier, TierPermissions};
