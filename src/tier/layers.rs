//! Context layers handed to the tier machinery
//!
//! Layers are built once per run from already-sanitized records, then
//! pass through `filter_by_tier` before any rendering happens.

use serde::{Deserialize, Serialize};

use crate::activity::{
    ActivityRecord, ClassificationResult, CommitRecord, PromptRecord, SearchRecord, VisitRecord,
};
use crate::patterns::PatternAnalysis;

use super::resolver::PrivacyTier;

/// Character budget for the condensed layer
const CONDENSED_BUDGET_CHARS: usize = 4000;
/// Per-line cap on free text inside the condensed layer
const CONDENSED_LINE_CHARS: usize = 120;

/// Sanitized raw records grouped per source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLayer {
    pub visits: Vec<VisitRecord>,
    pub searches: Vec<SearchRecord>,
    pub prompts: Vec<PromptRecord>,
    pub commits: Vec<CommitRecord>,
}

impl RawLayer {
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let mut layer = Self::default();
        for record in records {
            match record {
                ActivityRecord::Visit(v) => layer.visits.push(v.clone()),
                ActivityRecord::Search(s) => layer.searches.push(s.clone()),
                ActivityRecord::Prompt(p) => layer.prompts.push(p.clone()),
                ActivityRecord::Commit(c) => layer.commits.push(c.clone()),
            }
        }
        layer
    }

    pub fn len(&self) -> usize {
        self.visits.len() + self.searches.len() + self.prompts.len() + self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a run produced, before tier filtering
#[derive(Debug, Clone, Default)]
pub struct ContextLayers {
    pub raw: Option<RawLayer>,
    pub condensed: Option<String>,
    pub classification: Option<ClassificationResult>,
    pub patterns: Option<PatternAnalysis>,
}

impl ContextLayers {
    /// Drop every layer the tier does not permit.
    ///
    /// All rendering downstream consumes the filtered value, so a layer
    /// removed here cannot leak into the prompt.
    pub fn filter_by_tier(self, tier: PrivacyTier) -> ContextLayers {
        let perms = tier.permissions();
        ContextLayers {
            raw: self.raw.filter(|_| perms.raw),
            condensed: self.condensed.filter(|_| perms.condensed),
            classification: self.classification.filter(|_| perms.classification),
            patterns: self.patterns.filter(|_| perms.patterns),
        }
    }
}

/// Compress sanitized records into a budget-capped textual digest.
///
/// One line per record with minute-level time; free text is truncated
/// per line and the whole digest stops at the character budget with an
/// omission marker.
pub fn condense(records: &[ActivityRecord]) -> String {
    let mut out = String::new();
    let mut omitted = 0usize;

    for record in records {
        let time = record.timestamp().format("%H:%M");
        let line = match record {
            ActivityRecord::Visit(v) => format!(
                "{} visit {} | {}",
                time,
                v.url,
                truncate(&v.title, CONDENSED_LINE_CHARS)
            ),
            ActivityRecord::Search(s) => match &s.engine {
                Some(engine) => format!(
                    "{} search ({}) {}",
                    time,
                    engine,
                    truncate(&s.query, CONDENSED_LINE_CHARS)
                ),
                None => format!("{} search {}", time, truncate(&s.query, CONDENSED_LINE_CHARS)),
            },
            ActivityRecord::Prompt(p) => {
                format!("{} prompt {}", time, truncate(&p.prompt, CONDENSED_LINE_CHARS))
            }
            ActivityRecord::Commit(c) => match &c.repo {
                Some(repo) => format!(
                    "{} commit ({}) {}",
                    time,
                    repo,
                    truncate(&c.message, CONDENSED_LINE_CHARS)
                ),
                None => format!("{} commit {}", time, truncate(&c.message, CONDENSED_LINE_CHARS)),
            },
        };

        if out.len() + line.len() + 1 > CONDENSED_BUDGET_CHARS {
            omitted += 1;
            continue;
        }
        out.push_str(&line);
        out.push('\n');
    }

    if omitted > 0 {
        out.push_str(&format!("(+{} more records omitted)\n", omitted));
    }

    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}
