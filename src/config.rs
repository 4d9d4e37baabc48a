//! Dayveil configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Dayveil configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayveilConfig {
    /// AI provider the digest is rendered for
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Privacy preferences (tier override, condensed context, URL mode)
    #[serde(default)]
    pub privacy: PrivacyPrefs,

    /// Sensitive domain filtering
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Event classification
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Pattern extraction
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Topic history persistence
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Where the assembled prompt will be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// On-device model; sees full context
    Local,
    /// External API; context is tiered
    #[default]
    Remote,
}

/// AI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider locality, drives tier resolution
    pub kind: ProviderKind,

    /// Model identifier, forwarded to the transport client
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Remote,
            model: "claude-haiku-3-5-20241022".to_string(),
        }
    }
}

/// Privacy preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyPrefs {
    /// Operator tier override; out-of-range values are clamped into [1, 4]
    pub tier_override: Option<i64>,

    /// Whether the budget-condensed context layer is produced
    pub condensed_context: bool,

    /// Reduce visit URLs to scheme://host/path instead of parameter filtering
    pub aggressive_urls: bool,
}

impl Default for PrivacyPrefs {
    fn default() -> Self {
        Self {
            tier_override: None,
            condensed_context: true,
            aggressive_urls: false,
        }
    }
}

/// What happens to records matched by the sensitive domain filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    /// Drop the record entirely
    #[default]
    Exclude,
    /// Keep the record with url/title/query replaced
    Redact,
}

/// Sensitive domain filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Comma-delimited category keys from the built-in catalog
    pub enabled_categories: String,

    /// Comma-delimited custom entries: `domain`, `domain/path-prefix`,
    /// or `category:domain/path-prefix`
    pub custom_entries: String,

    /// Exclude or redact matched records
    pub action: FilterAction,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            enabled_categories:
                "health,mental_health,finance,job_search,dating,adult,legal,gambling".to_string(),
            custom_entries: String::new(),
            action: FilterAction::Exclude,
        }
    }
}

impl SensitivityConfig {
    pub fn category_list(&self) -> Vec<String> {
        parse_list(&self.enabled_categories)
    }

    pub fn custom_entry_list(&self) -> Vec<String> {
        parse_list(&self.custom_entries)
    }
}

/// Event classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Refine rule results through the configured AI backend
    pub llm_refinement: bool,

    /// Events per refinement batch; also bounds batch parallelism
    pub batch_size: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            llm_refinement: false,
            batch_size: 20,
        }
    }
}

/// Pattern extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Window for topic/entity co-occurrence, in minutes
    pub cooccurrence_window_minutes: i64,

    /// Minimum events for a temporal cluster to be reported
    pub min_cluster_size: usize,

    /// Track cross-day topic recurrence against persisted history
    pub track_recurrence: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            cooccurrence_window_minutes: 30,
            min_cluster_size: 3,
            track_recurrence: true,
        }
    }
}

/// Topic history persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path of the topic history JSON document
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayveil");

        Self {
            path: base.join("topic_history.json"),
        }
    }
}

/// Split a comma-delimited list, trimming and lower-casing each item
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

// Helper module for default directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DayveilConfig::default();
        assert_eq!(config.provider.kind, ProviderKind::Remote);
        assert_eq!(config.sensitivity.action, FilterAction::Exclude);
        assert!(config.privacy.condensed_context);
        assert!(config.privacy.tier_override.is_none());
        assert_eq!(config.patterns.min_cluster_size, 3);
    }

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        assert_eq!(
            parse_list(" Health, JOB_SEARCH ,finance,,"),
            vec!["health", "job_search", "finance"]
        );
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let config: DayveilConfig = toml::from_str(
            r#"
            [provider]
            kind = "local"

            [privacy]
            tier_override = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Local);
        // Unspecified fields within a section fall back too
        assert_eq!(config.provider.model, "claude-haiku-3-5-20241022");
        assert_eq!(config.privacy.tier_override, Some(6));
        assert!(config.privacy.condensed_context);
        // Untouched sections fall back to defaults
        assert_eq!(config.classification.batch_size, 20);
        assert!(!config.sensitivity.category_list().is_empty());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = DayveilConfig::default();
        config.sensitivity.custom_entries = "tracker.example.com".to_string();
        config.privacy.tier_override = Some(3);

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: DayveilConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.privacy.tier_override, Some(3));
        assert_eq!(
            parsed.sensitivity.custom_entry_list(),
            vec!["tracker.example.com"]
        );
    }

    #[test]
    fn test_filter_action_serialization() {
        let json = serde_json::to_string(&FilterAction::Redact).unwrap();
        assert_eq!(json, "\"redact\"");
        let parsed: FilterAction = serde_json::from_str("\"exclude\"").unwrap();
        assert_eq!(parsed, FilterAction::Exclude);
    }
}
