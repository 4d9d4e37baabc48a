//! Privacy tier model and resolution

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderKind;

use super::layers::ContextLayers;

/// Privacy tier, ordered from least (1) to most (4) private.
///
/// Serialized as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PrivacyTier {
    /// Tier 1: full sanitized raw context
    FullContext,
    /// Tier 2: budget-condensed context, raw arrays withheld
    Condensed,
    /// Tier 3: classified abstractions only
    Abstractions,
    /// Tier 4: aggregated statistics only
    Aggregates,
}

/// Layers a tier permits in the outgoing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPermissions {
    pub raw: bool,
    pub condensed: bool,
    pub classification: bool,
    pub patterns: bool,
    pub clusters: bool,
}

impl PrivacyTier {
    pub fn level(&self) -> u8 {
        match self {
            Self::FullContext => 1,
            Self::Condensed => 2,
            Self::Abstractions => 3,
            Self::Aggregates => 4,
        }
    }

    /// Clamp an operator-supplied level into a valid tier
    pub fn from_level(level: i64) -> Self {
        match level.clamp(1, 4) {
            1 => Self::FullContext,
            2 => Self::Condensed,
            3 => Self::Abstractions,
            _ => Self::Aggregates,
        }
    }

    /// What this tier allows out.
    ///
    /// Tier 1 deliberately excludes the condensed form, so its rendering
    /// is distinguishable from tier 2.
    pub fn permissions(&self) -> TierPermissions {
        match self {
            Self::FullContext => TierPermissions {
                raw: true,
                condensed: false,
                classification: true,
                patterns: true,
                clusters: true,
            },
            Self::Condensed => TierPermissions {
                raw: false,
                condensed: true,
                classification: true,
                patterns: true,
                clusters: true,
            },
            Self::Abstractions => TierPermissions {
                raw: false,
                condensed: false,
                classification: true,
                patterns: true,
                clusters: true,
            },
            Self::Aggregates => TierPermissions {
                raw: false,
                condensed: false,
                classification: false,
                patterns: true,
                clusters: true,
            },
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FullContext => "full sanitized activity context",
            Self::Condensed => "condensed activity context",
            Self::Abstractions => "classified activity abstractions",
            Self::Aggregates => "aggregated activity statistics",
        }
    }
}

impl From<PrivacyTier> for u8 {
    fn from(tier: PrivacyTier) -> u8 {
        tier.level()
    }
}

impl TryFrom<u8> for PrivacyTier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::FullContext),
            2 => Ok(Self::Condensed),
            3 => Ok(Self::Abstractions),
            4 => Ok(Self::Aggregates),
            other => Err(format!("privacy tier out of range: {}", other)),
        }
    }
}

impl std::fmt::Display for PrivacyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {}", self.level())
    }
}

/// Resolve the tier for a run.
///
/// Local providers always get tier 1. A remote provider takes the
/// clamped operator override when present, otherwise the most private
/// tier the available layers support.
pub fn resolve(
    provider: ProviderKind,
    override_level: Option<i64>,
    layers: &ContextLayers,
) -> PrivacyTier {
    if provider == ProviderKind::Local {
        debug!("local provider, resolving tier 1");
        return PrivacyTier::FullContext;
    }

    if let Some(level) = override_level {
        let tier = PrivacyTier::from_level(level);
        debug!(requested = level, resolved = tier.level(), "tier override");
        return tier;
    }

    let tier = if layers.patterns.is_some() {
        PrivacyTier::Aggregates
    } else if layers.classification.is_some() {
        PrivacyTier::Abstractions
    } else if layers.condensed.is_some() {
        PrivacyTier::Condensed
    } else {
        PrivacyTier::FullContext
    };
    debug!(resolved = tier.level(), "tier auto-escalation");
    tier
}
