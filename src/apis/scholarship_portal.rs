use crate::apis::base::{FieldExtractor, FragmentPlan, SelectorProfile};
use crate::constants::SCHOLARSHIP_PORTAL;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

const PROFILE: SelectorProfile = SelectorProfile {
    name: &["h3 a", ".title"],
    provider: &[".institution", ".university"],
    amount: &[".scholarship-value"],
    deadline: &[".deadline"],
    description: &[".description"],
    eligibility: &[],
    link: &["h3 a"],
    country: &[".destination", ".country"],
    degree_level: &[".degree"],
    subject: &[".subject"],
};

pub struct ScholarshipPortalExtractor;

impl FieldExtractor for ScholarshipPortalExtractor {
    fn source_name(&self) -> &'static str {
        SCHOLARSHIP_PORTAL
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::all(&[".scholarship-item, .study-portal"])
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        PROFILE.apply(fragment, page, SCHOLARSHIP_PORTAL).map(Some)
    }
}
