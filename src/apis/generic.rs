use crate::apis::base::{excerpt, first_text, page_host, FieldExtractor, FragmentPlan};
use crate::constants::EXCERPT_LEN;
use crate::error::Result;
use crate::types::{PartialRecord, RawPage};
use scraper::ElementRef;

pub const GENERIC: &str = "generic";

/// Names this short are almost always navigation or boilerplate
const MIN_NAME_CHARS: usize = 11;

/// Fallback for sources without a dedicated extractor. Scans common
/// structural markers and keeps only the first block type that matches.
pub struct GenericExtractor;

impl FieldExtractor for GenericExtractor {
    fn source_name(&self) -> &'static str {
        GENERIC
    }

    fn fragment_plan(&self) -> FragmentPlan {
        FragmentPlan {
            selectors: &[
                "article",
                ".scholarship",
                ".scholarship-item",
                r#"[class*="scholarship"]"#,
                r#"[class*="award"]"#,
            ],
            limit: Some(10),
            first_matching_only: true,
        }
    }

    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>> {
        let name = first_text(fragment, &["h2", "h3", ".title"])?.unwrap_or_default();
        if name.chars().count() < MIN_NAME_CHARS {
            return Ok(None);
        }

        let source_name = page_host(&page.url).unwrap_or_else(|| page.source_id.clone());
        let mut record = PartialRecord::new(source_name, page.url.clone());
        record.name = Some(name);
        record.provider = first_text(fragment, &[".provider", ".sponsor"])?;
        record.amount = first_text(fragment, &[".amount", ".award"])?;
        record.deadline_text = first_text(fragment, &[".deadline", ".date"])?;
        record.description = first_text(fragment, &[".description", "p"])?
            .map(|d| excerpt(d, EXCERPT_LEN));
        record.application_link = Some(page.url.clone());
        record.country = Some("International".to_string());
        Ok(Some(record))
    }
}
