use crate::apis::base::{FieldExtractor, FragmentPlan, SelectorProfile};
use crate::constants::FASTWEB;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

const PROFILE: SelectorProfile = SelectorProfile {
    name: &["h3", ".scholarship-name"],
    provider: &[".provider-name"],
    amount: &[".award-amount"],
    deadline: &[".deadline-date"],
    description: &[".description"],
    eligibility: &[".eligibility-criteria"],
    link: &["a"],
    country: &[],
    degree_level: &[".education-level"],
    subject: &[],
};

/// Fastweb result cards. Fastweb only lists US awards.
pub struct FastwebExtractor;

impl FieldExtractor for FastwebExtractor {
    fn source_name(&self) -> &'static str {
        FASTWEB
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::all(&[".scholarship-card, .result-item"])
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        let mut record = PROFILE.apply(fragment, page, FASTWEB)?;
        record.country = Some("USA".to_string());
        record.subject = Some("Any".to_string());
        Ok(Some(record))
    }
}
