use crate::apis::base::{FieldExtractor, FragmentPlan, SelectorProfile};
use crate::constants::SCHOLARSHIPS_COM;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

const PROFILE: SelectorProfile = SelectorProfile {
    name: &["h2", ".scholarship-title", ".title"],
    provider: &[".provider", ".sponsor", ".organization"],
    amount: &[".amount", ".award", ".value"],
    deadline: &[".deadline", ".date"],
    description: &[".description", ".summary", "p"],
    eligibility: &[".eligibility", ".requirements"],
    link: &["a.apply", "a.details", "a"],
    country: &[".location", ".country"],
    degree_level: &[".degree", ".level"],
    subject: &[".subject", ".field", ".major"],
};

/// Listing cards on scholarships.com directory pages
pub struct ScholarshipsComExtractor;

impl FieldExtractor for ScholarshipsComExtractor {
    fn source_name(&self) -> &'static str {
        SCHOLARSHIPS_COM
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::all(&["div.scholarship-item, .scholarship-listing"])
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        PROFILE.apply(fragment, page, SCHOLARSHIPS_COM).map(Some)
    }
}
