use crate::apis::base::{FieldExtractor, FragmentPlan, SelectorProfile};
use crate::constants::GOVERNMENT;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

const PROFILE: SelectorProfile = SelectorProfile {
    name: &["h2", "h3"],
    provider: &[],
    amount: &[".funding"],
    deadline: &[".deadline"],
    description: &[".description"],
    eligibility: &[],
    link: &["a"],
    country: &[],
    degree_level: &[],
    subject: &[],
};

/// Government programme listings (EducationUSA, British Council)
pub struct GovernmentExtractor;

impl GovernmentExtractor {
    /// The hosting agency decides the destination country
    pub fn detect_country(url: &str) -> &'static str {
        if url.contains("state.gov") {
            "USA"
        } else if url.contains("britishcouncil") {
            "UK"
        } else {
            "International"
        }
    }
}

impl FieldExtractor for GovernmentExtractor {
    fn source_name(&self) -> &'static str {
        GOVERNMENT
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::all(&[".scholarship-listing, .opportunity"])
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        let mut record = PROFILE.apply(fragment, page, GOVERNMENT)?;
        record.provider = Some("Government".to_string());
        record.country = Some(Self::detect_country(&page.url).to_string());
        Ok(Some(record))
    }
}
