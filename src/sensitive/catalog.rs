//! Built-in sensitive-domain catalog
//!
//! Entries are `domain` or `domain/path-prefix` strings, already lower-case
//! and without a `www.` prefix. The catalog is deliberately conservative:
//! it names destinations whose presence in a digest says something about a
//! person's health, money, relationships, or job situation.

const HEALTH: &[&str] = &[
    "webmd.com",
    "mayoclinic.org",
    "healthline.com",
    "drugs.com",
    "medlineplus.gov",
    "nhs.uk",
    "clevelandclinic.org",
];

const MENTAL_HEALTH: &[&str] = &[
    "betterhelp.com",
    "talkspace.com",
    "psychologytoday.com",
    "7cups.com",
    "nami.org",
    "samhsa.gov",
];

const FINANCE: &[&str] = &[
    "fidelity.com",
    "vanguard.com",
    "schwab.com",
    "robinhood.com",
    "coinbase.com",
    "mint.intuit.com",
    "ynab.com",
    "creditkarma.com",
    "experian.com",
];

const JOB_SEARCH: &[&str] = &[
    "linkedin.com/jobs",
    "indeed.com",
    "glassdoor.com",
    "ziprecruiter.com",
    "wellfound.com",
    "dice.com",
    "monster.com",
    "levels.fyi",
];

const DATING: &[&str] = &[
    "tinder.com",
    "bumble.com",
    "hinge.co",
    "okcupid.com",
    "match.com",
    "grindr.com",
];

const ADULT: &[&str] = &[
    "onlyfans.com",
    "pornhub.com",
    "xvideos.com",
    "chaturbate.com",
];

const LEGAL: &[&str] = &[
    "avvo.com",
    "findlaw.com",
    "nolo.com",
    "legalzoom.com",
    "justia.com",
];

const GAMBLING: &[&str] = &[
    "draftkings.com",
    "fanduel.com",
    "bet365.com",
    "pokerstars.com",
    "bovada.lv",
];

/// Category keys accepted in configuration
pub fn all_categories() -> &'static [&'static str] {
    &[
        "health",
        "mental_health",
        "finance",
        "job_search",
        "dating",
        "adult",
        "legal",
        "gambling",
    ]
}

/// Built-in entries for a category key, if it exists
pub fn builtin_entries(category: &str) -> Option<&'static [&'static str]> {
    match category {
        "health" => Some(HEALTH),
        "mental_health" => Some(MENTAL_HEALTH),
        "finance" => Some(FINANCE),
        "job_search" => Some(JOB_SEARCH),
        "dating" => Some(DATING),
        "adult" => Some(ADULT),
        "legal" => Some(LEGAL),
        "gambling" => Some(GAMBLING),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_entries() {
        for category in all_categories() {
            let entries = builtin_entries(category).unwrap();
            assert!(!entries.is_empty(), "category {} is empty", category);
        }
    }

    #[test]
    fn test_unknown_category_is_none() {
        assert!(builtin_entries("astrology").is_none());
    }

    #[test]
    fn test_entries_are_normalized() {
        for category in all_categories() {
            for entry in builtin_entries(category).unwrap() {
                assert_eq!(entry.to_lowercase(), *entry);
                assert!(!entry.starts_with("www."), "entry {} has www prefix", entry);
                assert!(!entry.contains("://"), "entry {} has a scheme", entry);
            }
        }
    }

    #[test]
    fn test_job_search_includes_linkedin_jobs_path() {
        let entries = builtin_entries("job_search").unwrap();
        assert!(entries.contains(&"linkedin.com/jobs"));
    }
}
