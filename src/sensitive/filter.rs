//! Sensitive domain filter
//!
//! Compiles enabled catalog categories plus free-form custom entries into a
//! rule list and applies it to a batch of records. Match precedence for
//! visits: exact domain, then subdomain suffix, then path-prefix rules on
//! the matched host or its subdomains. First match wins and its category
//! feeds the telemetry counts. Search queries match by substring containment
//! of a configured domain. Records the filter cannot parse are kept.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::catalog::builtin_entries;
use crate::activity::ActivityRecord;
use crate::config::{FilterAction, SensitivityConfig};

/// Replacement text used when the action is `Redact`
pub const REDACTED_PLACEHOLDER: &str = "[redacted]";

/// One compiled domain rule
#[derive(Debug, Clone)]
struct DomainRule {
    category: String,
    domain: String,
    path_prefix: Option<String>,
}

/// Exact telemetry counts for one filter run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterCounts {
    pub total: u64,
    pub visits: u64,
    pub queries: u64,
    pub by_category: BTreeMap<String, u64>,
}

impl FilterCounts {
    fn record_visit(&mut self, category: &str) {
        self.total += 1;
        self.visits += 1;
        *self.by_category.entry(category.to_string()).or_insert(0) += 1;
    }

    fn record_query(&mut self, category: &str) {
        self.total += 1;
        self.queries += 1;
        *self.by_category.entry(category.to_string()).or_insert(0) += 1;
    }
}

/// Compiled sensitive-domain filter
pub struct SensitivityFilter {
    rules: Vec<DomainRule>,
    action: FilterAction,
}

impl SensitivityFilter {
    /// Compile a filter from category keys and custom entries.
    ///
    /// Custom entries are `domain`, `domain/path-prefix`, or
    /// `category:domain/path-prefix`; entries without an explicit category
    /// land in `custom`. Unknown category keys compile to nothing.
    pub fn new(
        enabled_categories: &[String],
        custom_entries: &[String],
        action: FilterAction,
    ) -> Self {
        let mut rules = Vec::new();

        for category in enabled_categories {
            let category = category.trim().to_lowercase();
            match builtin_entries(&category) {
                Some(entries) => {
                    for entry in entries {
                        if let Some(rule) = parse_entry(entry, &category) {
                            rules.push(rule);
                        }
                    }
                }
                None => debug!(category = %category, "unknown sensitive category, skipping"),
            }
        }

        for raw in custom_entries {
            let raw = raw.trim().to_lowercase();
            if raw.is_empty() {
                continue;
            }
            let (category, entry) = match raw.split_once(':') {
                Some((cat, rest)) if !rest.starts_with("//") => (cat.to_string(), rest.to_string()),
                _ => ("custom".to_string(), raw),
            };
            if let Some(rule) = parse_entry(&entry, &category) {
                rules.push(rule);
            }
        }

        Self { rules, action }
    }

    pub fn from_config(config: &SensitivityConfig) -> Self {
        Self::new(
            &config.category_list(),
            &config.custom_entry_list(),
            config.action,
        )
    }

    pub fn action(&self) -> FilterAction {
        self.action
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Match a visit URL against the rule list. Returns the category.
    pub fn match_visit_url(&self, url: &str) -> Option<&str> {
        let parsed = Url::parse(url).ok()?;
        let host = normalize_host(parsed.host_str()?);
        let path = parsed.path();

        // Exact domain
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.path_prefix.is_none() && r.domain == host)
        {
            return Some(&rule.category);
        }

        // Subdomain suffix
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.path_prefix.is_none() && is_subdomain(&host, &r.domain))
        {
            return Some(&rule.category);
        }

        // Path-prefix rules on the host or its subdomains
        self.rules
            .iter()
            .find(|r| match &r.path_prefix {
                Some(prefix) => {
                    (r.domain == host || is_subdomain(&host, &r.domain))
                        && path_matches(path, prefix)
                }
                None => false,
            })
            .map(|rule| rule.category.as_str())
    }

    /// Match a search query by domain containment. Returns the category.
    pub fn match_query(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.rules
            .iter()
            .find(|r| query.contains(&r.domain))
            .map(|rule| rule.category.as_str())
    }

    /// Apply the filter to a heterogeneous batch. Prompts and commits pass
    /// through untouched; matched visits and searches are excluded or
    /// redacted in place according to the configured action.
    pub fn apply(&self, records: Vec<ActivityRecord>) -> (Vec<ActivityRecord>, FilterCounts) {
        let mut kept = Vec::with_capacity(records.len());
        let mut counts = FilterCounts::default();

        for mut record in records {
            match &mut record {
                ActivityRecord::Visit(visit) => {
                    let category = self.match_visit_url(&visit.url).map(|c| c.to_string());
                    match category {
                        Some(category) => {
                            counts.record_visit(&category);
                            match self.action {
                                FilterAction::Exclude => continue,
                                FilterAction::Redact => {
                                    visit.url = REDACTED_PLACEHOLDER.to_string();
                                    visit.title = REDACTED_PLACEHOLDER.to_string();
                                    visit.category = Some(category);
                                }
                            }
                        }
                        None => {}
                    }
                }
                ActivityRecord::Search(search) => {
                    let category = self.match_query(&search.query).map(|c| c.to_string());
                    match category {
                        Some(category) => {
                            counts.record_query(&category);
                            match self.action {
                                FilterAction::Exclude => continue,
                                FilterAction::Redact => {
                                    search.query = REDACTED_PLACEHOLDER.to_string();
                                }
                            }
                        }
                        None => {}
                    }
                }
                ActivityRecord::Prompt(_) | ActivityRecord::Commit(_) => {}
            }
            kept.push(record);
        }

        (kept, counts)
    }
}

fn normalize_host(host: &str) -> String {
    let lower = host.to_lowercase();
    match lower.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

fn is_subdomain(host: &str, domain: &str) -> bool {
    host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

// Prefix match on path-segment boundaries, so `/jobs` matches `/jobs/view`
// but not `/jobsite`.
fn path_matches(path: &str, prefix: &str) -> bool {
    if !path.starts_with(prefix) {
        return false;
    }
    path.len() == prefix.len()
        || prefix.ends_with('/')
        || path.as_bytes()[prefix.len()] == b'/'
}

fn parse_entry(entry: &str, category: &str) -> Option<DomainRule> {
    let entry = entry.trim().trim_start_matches("https://").trim_start_matches("http://");
    if entry.is_empty() {
        return None;
    }
    let (domain, path) = match entry.split_once('/') {
        Some((domain, path)) if !path.is_empty() => (domain, Some(format!("/{}", path))),
        Some((domain, _)) => (domain, None),
        None => (entry, None),
    };
    let domain = normalize_host(domain);
    if domain.is_empty() {
        return None;
    }
    Some(DomainRule {
        category: category.to_string(),
        domain,
        path_prefix: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{SearchRecord, VisitRecord};
    use chrono::{TimeZone, Utc};

    fn visit(url: &str) -> ActivityRecord {
        ActivityRecord::Visit(VisitRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap(),
            url: url.to_string(),
            title: "page title".to_string(),
            category: None,
        })
    }

    fn search(query: &str) -> ActivityRecord {
        ActivityRecord::Search(SearchRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 12, 11, 0, 0).unwrap(),
            query: query.to_string(),
            engine: None,
        })
    }

    fn filter(categories: &[&str], custom: &[&str], action: FilterAction) -> SensitivityFilter {
        let categories: Vec<String> = categories.iter().map(|s| s.to_string()).collect();
        let custom: Vec<String> = custom.iter().map(|s| s.to_string()).collect();
        SensitivityFilter::new(&categories, &custom, action)
    }

    #[test]
    fn test_exact_domain_match() {
        let f = filter(&["health"], &[], FilterAction::Exclude);
        assert_eq!(f.match_visit_url("https://webmd.com/conditions"), Some("health"));
        assert_eq!(f.match_visit_url("https://example.com/"), None);
    }

    #[test]
    fn test_subdomain_and_www_normalization() {
        let f = filter(&["health"], &[], FilterAction::Exclude);
        assert_eq!(f.match_visit_url("https://WWW.WebMD.com/a"), Some("health"));
        assert_eq!(f.match_visit_url("https://symptoms.webmd.com/b"), Some("health"));
        // Suffix requires a dot boundary
        assert_eq!(f.match_visit_url("https://notwebmd.com/c"), None);
    }

    #[test]
    fn test_path_prefix_segment_boundary() {
        let f = filter(&["job_search"], &[], FilterAction::Exclude);
        assert_eq!(
            f.match_visit_url("https://www.linkedin.com/jobs/view/123"),
            Some("job_search")
        );
        assert_eq!(f.match_visit_url("https://linkedin.com/jobs"), Some("job_search"));
        assert_eq!(f.match_visit_url("https://linkedin.com/jobsite"), None);
        assert_eq!(f.match_visit_url("https://linkedin.com/feed"), None);
    }

    #[test]
    fn test_custom_entries_with_and_without_category() {
        let f = filter(
            &[],
            &["tracker.example.com", "shopping:Amazon.com/gp/cart"],
            FilterAction::Exclude,
        );
        assert_eq!(f.match_visit_url("https://tracker.example.com/x"), Some("custom"));
        assert_eq!(
            f.match_visit_url("https://www.amazon.com/gp/cart/view"),
            Some("shopping")
        );
        assert_eq!(f.match_visit_url("https://amazon.com/gp/product/1"), None);
    }

    #[test]
    fn test_malformed_urls_kept() {
        let f = filter(&["health"], &[], FilterAction::Exclude);
        let (kept, counts) = f.apply(vec![visit("[invalid-url]"), visit("not a url")]);
        assert_eq!(kept.len(), 2);
        assert_eq!(counts.total, 0);
    }

    #[test]
    fn test_exclude_reduces_count_scenario() {
        // Visit list of 3 with one linkedin.com/jobs URL; job_search enabled
        // with exclude drops exactly that one and attributes it.
        let f = filter(&["job_search"], &[], FilterAction::Exclude);
        let records = vec![
            visit("https://www.linkedin.com/jobs/view/456"),
            visit("https://github.com/rust-lang/rust"),
            visit("https://docs.rs/serde"),
        ];
        let (kept, counts) = f.apply(records);
        assert_eq!(kept.len(), 2);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.visits, 1);
        assert_eq!(counts.by_category.get("job_search"), Some(&1));
    }

    #[test]
    fn test_redact_preserves_count_and_replaces_fields() {
        let f = filter(&["health"], &[], FilterAction::Redact);
        let (kept, counts) = f.apply(vec![visit("https://webmd.com/symptoms"), visit("https://docs.rs/")]);
        assert_eq!(kept.len(), 2);
        assert_eq!(counts.total, 1);

        match &kept[0] {
            ActivityRecord::Visit(v) => {
                assert_eq!(v.url, REDACTED_PLACEHOLDER);
                assert_eq!(v.title, REDACTED_PLACEHOLDER);
                assert_eq!(v.category.as_deref(), Some("health"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_query_containment_matching() {
        let f = filter(&["job_search"], &[], FilterAction::Exclude);
        let (kept, counts) = f.apply(vec![
            search("linkedin.com senior rust openings"),
            search("rust lifetimes explained"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(counts.queries, 1);
        assert_eq!(counts.by_category.get("job_search"), Some(&1));
    }

    #[test]
    fn test_prompts_and_commits_pass_through() {
        use crate::activity::{CommitRecord, PromptRecord};
        let f = filter(&["health"], &[], FilterAction::Exclude);
        let records = vec![
            ActivityRecord::Prompt(PromptRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap(),
                prompt: "webmd.com says rest".to_string(),
                session_id: None,
            }),
            ActivityRecord::Commit(CommitRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 6, 12, 9, 5, 0).unwrap(),
                message: "fix webmd.com link in docs".to_string(),
                repo: None,
            }),
        ];
        let (kept, counts) = f.apply(records);
        assert_eq!(kept.len(), 2);
        assert_eq!(counts.total, 0);
    }

    #[test]
    fn test_multiple_categories_counted_separately() {
        let f = filter(&["health", "finance"], &[], FilterAction::Exclude);
        let (kept, counts) = f.apply(vec![
            visit("https://webmd.com/a"),
            visit("https://robinhood.com/b"),
            visit("https://webmd.com/c"),
        ]);
        assert!(kept.is_empty());
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_category.get("health"), Some(&2));
        assert_eq!(counts.by_category.get("finance"), Some(&1));
    }

    #[test]
    fn test_unknown_category_compiles_to_nothing() {
        let f = filter(&["astrology"], &[], FilterAction::Exclude);
        assert_eq!(f.rule_count(), 0);
    }
}
