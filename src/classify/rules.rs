//! Deterministic rule-based classification
//!
//! Pure and synchronous. Maps each record's source and content shape to
//! an activity type, topic set, entity set, and intent, with a fixed
//! confidence range. Summaries are templated so that raw titles and
//! query strings never pass through verbatim.

use crate::activity::{ActivityRecord, ActivityType, StructuredEvent};
use std::collections::BTreeSet;
use url::Url;

/// Keyword fragments mapped to canonical topic labels
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("rust", "rust"),
    ("cargo", "rust"),
    ("rustc", "rust"),
    ("clippy", "rust"),
    ("borrow checker", "rust"),
    ("tokio", "rust"),
    ("python", "python"),
    ("pytest", "python"),
    ("django", "python"),
    ("numpy", "python"),
    ("pandas", "python"),
    ("react", "web-frontend"),
    ("typescript", "web-frontend"),
    ("javascript", "web-frontend"),
    ("css", "web-frontend"),
    ("webpack", "web-frontend"),
    ("vite", "web-frontend"),
    ("frontend", "web-frontend"),
    ("postgres", "databases"),
    ("postgresql", "databases"),
    ("mysql", "databases"),
    ("sqlite", "databases"),
    ("redis", "databases"),
    ("mongodb", "databases"),
    ("sql", "databases"),
    ("machine learning", "machine-learning"),
    ("neural network", "machine-learning"),
    ("pytorch", "machine-learning"),
    ("tensorflow", "machine-learning"),
    ("embedding", "machine-learning"),
    ("transformer", "machine-learning"),
    ("llm", "machine-learning"),
    ("docker", "devops"),
    ("kubernetes", "devops"),
    ("k8s", "devops"),
    ("terraform", "devops"),
    ("ansible", "devops"),
    ("helm", "devops"),
    ("container", "devops"),
    ("deploy", "devops"),
    ("vulnerability", "security"),
    ("cve", "security"),
    ("encryption", "security"),
    ("tls", "security"),
    ("oauth", "security"),
    ("authentication", "security"),
    ("security", "security"),
    ("tcp", "networking"),
    ("udp", "networking"),
    ("dns", "networking"),
    ("websocket", "networking"),
    ("grpc", "networking"),
    ("proxy", "networking"),
    ("unit test", "testing"),
    ("integration test", "testing"),
    ("fuzzing", "testing"),
    ("benchmark", "testing"),
    ("coverage", "testing"),
    ("rebase", "version-control"),
    ("merge conflict", "version-control"),
    ("pull request", "version-control"),
    ("readme", "documentation"),
    ("changelog", "documentation"),
    ("documentation", "documentation"),
];

/// Visit hosts mapped to topic labels
const DOMAIN_TOPICS: &[(&str, &str)] = &[
    ("github.com", "software-development"),
    ("gitlab.com", "software-development"),
    ("stackoverflow.com", "debugging"),
    ("stackexchange.com", "debugging"),
    ("docs.rs", "rust"),
    ("crates.io", "rust"),
    ("rust-lang.org", "rust"),
    ("developer.mozilla.org", "web-frontend"),
    ("npmjs.com", "web-frontend"),
    ("pypi.org", "python"),
    ("arxiv.org", "research-papers"),
    ("scholar.google.com", "research-papers"),
    ("news.ycombinator.com", "tech-news"),
    ("lobste.rs", "tech-news"),
    ("kubernetes.io", "devops"),
    ("docker.com", "devops"),
    ("aws.amazon.com", "cloud-infrastructure"),
    ("cloud.google.com", "cloud-infrastructure"),
    ("postgresql.org", "databases"),
    ("redis.io", "databases"),
    ("wikipedia.org", "general-reference"),
    ("youtube.com", "video-content"),
];

/// Tool names accepted as entities without shape checks
const KNOWN_TOOLS: &[&str] = &[
    "git", "docker", "kubernetes", "cargo", "rustc", "clippy", "tokio", "postgres", "postgresql",
    "redis", "nginx", "terraform", "ansible", "helm", "react", "vue", "webpack", "vite", "pytest",
    "numpy", "pandas", "pytorch", "tensorflow", "grpc", "protobuf", "kafka", "rabbitmq", "sqlite",
    "mysql", "vim", "neovim", "vscode", "tmux", "bash", "zsh", "systemd",
];

const MAX_ENTITIES: usize = 8;
const MAX_ENTITY_LEN: usize = 40;

/// Classify one record through the rule tables alone.
///
/// Always succeeds. Confidence is 0.7 for a domain-table hit, 0.6 when
/// at least one keyword topic matched, 0.5 otherwise.
pub fn classify_rule_only(record: &ActivityRecord) -> StructuredEvent {
    let (activity_type, domain_hit) = activity_type_for(record);
    let text = record.text();
    let lowered = text.to_lowercase();

    let mut topics = keyword_topics(&lowered);
    if let Some(topic) = domain_hit.as_ref().and_then(|host| domain_topic(host)) {
        topics.insert(topic.to_string());
    }

    let entities = extract_entities(text);

    let confidence = if domain_hit.is_some() {
        0.7
    } else if !topics.is_empty() {
        0.6
    } else {
        0.5
    };

    let summary = summarize(record, activity_type, &topics, domain_hit.as_deref());

    StructuredEvent::new(
        record.timestamp(),
        record.source(),
        activity_type,
        confidence,
        summary,
    )
    .with_topics(topics)
    .with_entities(entities)
}

/// Resolve the activity type for a record, returning the matched host
/// for visits whose domain is in the lookup table.
fn activity_type_for(record: &ActivityRecord) -> (ActivityType, Option<String>) {
    match record {
        ActivityRecord::Commit(commit) => {
            let msg = commit.message.to_lowercase();
            let activity = if contains_any(&msg, &["fix", "bug", "crash", "regression", "revert"]) {
                ActivityType::Debugging
            } else if contains_any(&msg, &["review", "merge"]) {
                ActivityType::Review
            } else {
                ActivityType::Coding
            };
            (activity, None)
        }
        ActivityRecord::Prompt(prompt) => {
            let text = prompt.prompt.to_lowercase();
            let activity = if contains_any(&text, &["error", "why", "fail", "debug", "broken"]) {
                ActivityType::Debugging
            } else if contains_any(&text, &["how do i", "what is", "explain", "understand"]) {
                ActivityType::Learning
            } else if contains_any(&text, &["plan", "design", "architect", "roadmap"]) {
                ActivityType::Planning
            } else if contains_any(&text, &["write", "draft", "document", "blog"]) {
                ActivityType::Writing
            } else {
                ActivityType::Coding
            };
            (activity, None)
        }
        ActivityRecord::Search(search) => {
            let query = search.query.to_lowercase();
            let activity = if contains_any(&query, &["how to", "tutorial", "guide", "learn"]) {
                ActivityType::Learning
            } else if contains_any(&query, &["error", "exception", "panic", "fix"]) {
                ActivityType::Debugging
            } else {
                ActivityType::Research
            };
            (activity, None)
        }
        ActivityRecord::Visit(visit) => {
            let host = Url::parse(&visit.url)
                .ok()
                .and_then(|u| u.host_str().map(normalize_host));

            let activity = match host.as_deref() {
                Some(h) => visit_activity(h, &visit.url),
                None => ActivityType::Browsing,
            };

            let known = host.filter(|h| domain_topic(h).is_some());
            (activity, known)
        }
    }
}

fn visit_activity(host: &str, url: &str) -> ActivityType {
    if host_matches(host, "github.com") || host_matches(host, "gitlab.com") {
        if url.contains("/pull/") || url.contains("/merge_requests/") {
            ActivityType::Review
        } else {
            ActivityType::Coding
        }
    } else if host_matches(host, "stackoverflow.com") || host_matches(host, "stackexchange.com") {
        ActivityType::Debugging
    } else if host_matches(host, "docs.rs")
        || host_matches(host, "developer.mozilla.org")
        || host_matches(host, "rust-lang.org")
        || host_matches(host, "kubernetes.io")
        || host.ends_with(".readthedocs.io")
    {
        ActivityType::Learning
    } else if host_matches(host, "arxiv.org") || host_matches(host, "scholar.google.com") {
        ActivityType::Research
    } else {
        ActivityType::Browsing
    }
}

fn domain_topic(host: &str) -> Option<&'static str> {
    DOMAIN_TOPICS
        .iter()
        .find(|(domain, _)| host_matches(host, domain))
        .map(|(_, topic)| *topic)
}

fn keyword_topics(lowered: &str) -> BTreeSet<String> {
    TOPIC_KEYWORDS
        .iter()
        .filter(|(keyword, _)| contains_word(lowered, keyword))
        .map(|(_, topic)| topic.to_string())
        .collect()
}

/// Extract entities: known tool names plus identifier-shaped tokens
/// (dotted file names, snake_case, CamelCase). Free prose cannot enter
/// the entity set except through those shapes.
fn extract_entities(text: &str) -> BTreeSet<String> {
    let mut entities = BTreeSet::new();

    for raw in text.split_whitespace() {
        if entities.len() >= MAX_ENTITIES {
            break;
        }
        // Bracketed tokens are scrub placeholders or markup
        if raw.contains('[') || raw.contains(']') || raw.contains("://") || raw.contains('@') {
            continue;
        }
        let token = raw.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if token.len() < 3 || token.len() > MAX_ENTITY_LEN {
            continue;
        }

        let lowered = token.to_lowercase();
        if KNOWN_TOOLS.contains(&lowered.as_str()) {
            entities.insert(lowered);
        } else if identifier_shaped(token) {
            entities.insert(token.to_string());
        }
    }

    entities
}

fn identifier_shaped(token: &str) -> bool {
    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return false;
    }
    if !token.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    // Dotted name with an extension-like tail: main.rs, config.toml
    if let Some((stem, ext)) = token.rsplit_once('.') {
        if !stem.is_empty()
            && !ext.is_empty()
            && ext.len() <= 5
            && ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return true;
        }
    }

    // snake_case or SCREAMING_SNAKE
    if token.contains('_') && !token.starts_with('_') && !token.ends_with('_') {
        return true;
    }

    // CamelCase: leading capital plus an interior capital and a lowercase
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        if first.is_ascii_uppercase()
            && token.chars().any(|c| c.is_ascii_lowercase())
            && chars.any(|c| c.is_ascii_uppercase())
        {
            return true;
        }
    }

    false
}

/// Build a paraphrased summary. Titles and query strings never appear
/// verbatim; hosts and repo names may.
fn summarize(
    record: &ActivityRecord,
    activity_type: ActivityType,
    topics: &BTreeSet<String>,
    host: Option<&str>,
) -> String {
    let topic_phrase = || {
        topics
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    match record {
        ActivityRecord::Visit(visit) => {
            let host = host
                .map(str::to_string)
                .or_else(|| {
                    Url::parse(&visit.url)
                        .ok()
                        .and_then(|u| u.host_str().map(normalize_host))
                });
            match (host, topics.is_empty()) {
                (Some(h), false) => format!("Read {} material on {}", topic_phrase(), h),
                (Some(h), true) => format!("Browsed a page on {}", h),
                (None, false) => format!("Browsed content about {}", topic_phrase()),
                (None, true) => "Browsed a web page".to_string(),
            }
        }
        ActivityRecord::Search(_) => {
            if topics.is_empty() {
                "Ran a web search".to_string()
            } else {
                format!("Searched the web about {}", topic_phrase())
            }
        }
        ActivityRecord::Prompt(_) => {
            if topics.is_empty() {
                format!(
                    "Worked with an AI assistant on a {} task",
                    activity_type.as_str()
                )
            } else {
                format!("Discussed {} with an AI assistant", topic_phrase())
            }
        }
        ActivityRecord::Commit(commit) => {
            let label = match activity_type {
                ActivityType::Debugging => "bug-fix",
                ActivityType::Review => "review",
                _ => "development",
            };
            match &commit.repo {
                Some(repo) => format!("Committed {} work to {}", label, repo),
                None => format!("Committed {} work", label),
            }
        }
    }
}

fn normalize_host(host: &str) -> String {
    host.to_lowercase()
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or_else(|| host.to_lowercase())
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Substring match with word boundaries on both ends
fn contains_word(haystack: &str, needle: &str) -> bool {
    for (start, matched) in haystack.match_indices(needle) {
        let before_ok = start == 0
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let end = start + matched.len();
        let after_ok = end == haystack.len()
            || !haystack[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
    }
    false
}
