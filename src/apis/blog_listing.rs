use crate::apis::base::{excerpt, first_attr, first_text, resolve_link, FieldExtractor, FragmentPlan};
use crate::constants::{EXCERPT_LEN, OPPORTUNITIES_CORNERS, SCHOLARSHIP_POSITIONS, SCHOLARSHIP_ROAR};
use crate::error::Result;
use crate::heuristics;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

/// WordPress-style scholarship blogs: one post per scholarship, with deadline
/// and award only available inside the post body.
pub struct BlogListingExtractor {
    source_name: &'static str,
    post_selector: &'static [&'static str],
    title_selector: &'static str,
    link_selector: &'static str,
    body_selector: &'static str,
}

const POST_LIMIT: usize = 20;

impl BlogListingExtractor {
    pub fn scholarship_positions() -> Self {
        Self {
            source_name: SCHOLARSHIP_POSITIONS,
            post_selector: &["article.post"],
            title_selector: "h2.entry-title",
            link_selector: "h2.entry-title a",
            body_selector: "div.entry-content",
        }
    }

    pub fn opportunities_corners() -> Self {
        Self {
            source_name: OPPORTUNITIES_CORNERS,
            post_selector: &["article.type-post"],
            title_selector: "h2.entry-title",
            link_selector: "h2.entry-title a",
            body_selector: "div.entry-excerpt",
        }
    }

    pub fn scholarship_roar() -> Self {
        Self {
            source_name: SCHOLARSHIP_ROAR,
            post_selector: &["article"],
            title_selector: "h2",
            link_selector: "h2 a",
            body_selector: "div.entry-content",
        }
    }
}

impl FieldExtractor for BlogListingExtractor {
    fn source_name(&self) -> &'static str {
        self.source_name
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan::limited(self.post_selector, POST_LIMIT)
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        // Posts without a title heading are teasers or widgets
        let Some(name) = first_text(fragment, &[self.title_selector])? else {
            return Ok(None);
        };

        let description = first_text(fragment, &[self.body_selector])?
            .map(|body| excerpt(body, EXCERPT_LEN));
        let body = description.as_deref().unwrap_or_default();
        let amount = heuristics::extract_amount(body);

        let mut record = PartialRecord::new(self.source_name, page.url.clone());
        record.application_link = match first_attr(fragment, &[self.link_selector], "href")? {
            Some(href) => Some(resolve_link(&page.url, &href)?),
            None => None,
        };
        record.deadline_text = description.clone();
        record.amount = (!amount.is_empty()).then_some(amount);
        record.country = Some("International".to_string());
        record.name = Some(name);
        record.description = description;
        Ok(Some(record))
    }
}
