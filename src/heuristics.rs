//! Text heuristics shared by the extractors and the normalizer.
//!
//! Every function here is total: the absence of a signal comes back as `None`,
//! an empty string or the `Any` bucket, never as an error.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Ordered deadline patterns; the first that matches decides.
/// The bool marks labelled forms whose value sits in capture group 1.
static DEADLINE_PATTERNS: Lazy<Vec<(Regex, bool)>> = Lazy::new(|| {
    let raw = [
        (format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}}\b"), false),
        (format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}}\b"), false),
        (r"\b\d{4}-\d{2}-\d{2}".to_string(), false),
        (r"\b\d{1,2}/\d{1,2}/\d{4}\b".to_string(), false),
        (r"(?i)deadline:\s*([^\n]+)".to_string(), true),
        (r"(?i)closing\s*date:\s*([^\n]+)".to_string(), true),
    ];
    raw.into_iter()
        .filter_map(|(pattern, labelled)| Regex::new(&pattern).ok().map(|re| (re, labelled)))
        .collect()
});

/// Date formats tried in order against a candidate substring.
/// Day-first wins for ambiguous slash dates.
const DATE_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S"];

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\$[\d,]+(?:\.\d{2})?",
        r"€[\d,]+(?:\.\d{2})?",
        r"£[\d,]+(?:\.\d{2})?",
        r"(?i)full\s+tuition",
        r"(?i)full\s+funding",
        r"(?i)fully\s+funded",
        r"(?i)partial\s+funding",
        r"(?i)\d+%\s+tuition",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static DEGREE_BUCKETS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("PhD", r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral)\b"),
        ("Master", r"(?i)\b(?:masters?|postgraduate|mba|msc|m\.sc|ma)\b"),
        ("Bachelor", r"(?i)\b(?:bachelors?|undergraduate|undergrad|bsc|b\.sc|bs|ba)\b"),
        ("High School", r"(?i)\b(?:high\s+school|secondary)\b"),
    ]
    .into_iter()
    .filter_map(|(bucket, p)| Regex::new(p).ok().map(|re| (bucket, re)))
    .collect()
});

const SUBJECT_BUCKETS: &[(&str, &[&str])] = &[
    ("Engineering", &["engineering", "computer science", "software", "mechanical", "electrical"]),
    ("Medicine", &["medicine", "medical", "health", "nursing", "pharmacy"]),
    ("Business", &["business", "mba", "management", "finance", "economics"]),
    ("Science", &["science", "physics", "chemistry", "biology", "mathematics"]),
    ("Arts", &["arts", "humanities", "literature", "history", "philosophy"]),
    ("Law", &["law", "legal", "llm", "jurisprudence"]),
];

/// Parse a deadline out of free text.
///
/// The whole text is tried as a date first; otherwise the first matching
/// pattern picks the candidate substring, which then has to parse.
pub fn parse_deadline(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_date(text) {
        return Some(date);
    }

    for (pattern, labelled) in DEADLINE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let candidate = if *labelled {
                caps.get(1).map(|m| m.as_str())
            } else {
                caps.get(0).map(|m| m.as_str())
            };
            return candidate.and_then(parse_date);
        }
    }

    None
}

/// Parse one candidate string against the ordered format list
pub fn parse_date(candidate: &str) -> Option<NaiveDate> {
    let cleaned = candidate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = cleaned.trim_end_matches(['.', ',', ';']);
    if cleaned.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// First monetary signal in the text, or an empty string
pub fn extract_amount(text: &str) -> String {
    AMOUNT_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn classify_degree_level(text: &str) -> &'static str {
    DEGREE_BUCKETS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(bucket, _)| *bucket)
        .unwrap_or("Any")
}

pub fn classify_subject(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    SUBJECT_BUCKETS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or("Any")
}

/// Canonical subject bucket names, for mapping raw subject labels
pub fn subject_buckets() -> impl Iterator<Item = &'static str> {
    SUBJECT_BUCKETS.iter().map(|(bucket, _)| *bucket)
}
