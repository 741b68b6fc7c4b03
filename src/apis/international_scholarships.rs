use crate::apis::base::{FieldExtractor, FragmentPlan, SelectorProfile};
use crate::constants::INTERNATIONAL_SCHOLARSHIPS;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

const PROFILE: SelectorProfile = SelectorProfile {
    name: &["h2", "h3", ".entry-title"],
    provider: &[".institution", ".university"],
    amount: &[".funding", ".award"],
    deadline: &[".deadline", ".closing-date"],
    description: &[".excerpt", ".content"],
    eligibility: &[".requirements", ".criteria"],
    link: &["a.more", "a.apply"],
    country: &[".country", ".destination"],
    degree_level: &[".study-level"],
    subject: &[".subject-area"],
};

pub struct InternationalScholarshipsExtractor;

impl FieldExtractor for InternationalScholarshipsExtractor {
    fn source_name(&self) -> &'static str {
        INTERNATIONAL_SCHOLARSHIPS
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::all(&[".scholarship-entry, article"])
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        PROFILE.apply(fragment, page, INTERNATIONAL_SCHOLARSHIPS).map(Some)
    }
}
