use crate::constants::{DEFAULT_COUNTRY, DEFAULT_CURRENCY};
use crate::heuristics::{classify_degree_level, classify_subject, extract_amount, parse_deadline, subject_buckets};
use crate::types::{PartialRecord, ScholarshipRecord};

const COUNTRY_SYNONYMS: &[(&str, &[&str])] = &[
    ("USA", &["us", "usa", "united states", "united states of america"]),
    ("UK", &["uk", "united kingdom", "gb", "great britain"]),
    ("Canada", &["canada", "ca"]),
    ("Australia", &["australia", "au"]),
    ("Germany", &["germany", "de"]),
    ("France", &["france", "fr"]),
    ("International", &["international", "worldwide", "global"]),
];

const DEGREE_SYNONYMS: &[(&str, &[&str])] = &[
    ("Bachelor", &["bachelor", "bachelors", "bachelor's", "undergraduate", "undergrad"]),
    ("Master", &["master", "masters", "master's", "graduate", "postgraduate"]),
    ("PhD", &["phd", "ph.d", "ph.d.", "doctorate", "doctoral"]),
    ("Any", &["any", "all"]),
];

const SUBJECT_ANY: &[&str] = &["general", "all", "any"];

/// Convert extracted fields into the canonical record shape.
///
/// Never fails; a record with no name comes out with an empty name and is
/// left for the validator to reject.
pub fn normalize(partial: PartialRecord) -> ScholarshipRecord {
    let name = clean_text(partial.name.as_deref()).unwrap_or_default();
    let description = clean_text(partial.description.as_deref());

    let classification_text = match &description {
        Some(d) => format!("{name} {d}"),
        None => name.clone(),
    };

    let amount = clean_text(partial.amount.as_deref()).or_else(|| {
        description
            .as_deref()
            .map(extract_amount)
            .filter(|a| !a.is_empty())
    });

    let deadline = partial.deadline_text.as_deref().and_then(parse_deadline);

    let country = clean_text(partial.country.as_deref())
        .map(|c| normalize_country(&c))
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    let degree_level = match clean_text(partial.degree_level.as_deref()) {
        Some(raw) => normalize_degree(&raw),
        None => classify_degree_level(&classification_text).to_string(),
    };

    let subject = match clean_text(partial.subject.as_deref()) {
        Some(raw) => normalize_subject(&raw),
        None => classify_subject(&classification_text).to_string(),
    };

    ScholarshipRecord {
        name,
        description,
        provider: clean_text(partial.provider.as_deref()),
        eligibility: clean_text(partial.eligibility.as_deref()),
        amount,
        currency: clean_text(partial.currency.as_deref()).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        deadline,
        application_link: clean_text(partial.application_link.as_deref()),
        country,
        degree_level,
        subject,
        source_url: partial.source_url,
        source_name: partial.source_name,
    }
}

/// Collapse whitespace runs to single spaces; blank text becomes `None`
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let cleaned = value?.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn lookup(table: &[(&'static str, &[&str])], raw: &str) -> Option<&'static str> {
    let lower = raw.trim().to_lowercase();
    table
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|s| *s == lower))
        .map(|(canonical, _)| *canonical)
}

pub fn normalize_country(raw: &str) -> String {
    lookup(COUNTRY_SYNONYMS, raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

pub fn normalize_degree(raw: &str) -> String {
    lookup(DEGREE_SYNONYMS, raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

pub fn normalize_subject(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    if SUBJECT_ANY.iter().any(|s| *s == lower) {
        return "Any".to_string();
    }
    subject_buckets()
        .find(|bucket| bucket.eq_ignore_ascii_case(trimmed))
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}
