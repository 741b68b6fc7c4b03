use crate::error::{Result, ScraperError};
use crate::types::{truncate_chars, PartialRecord, RawPage};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// How fragments are located on a page.
#[derive(Debug, Clone, Copy)]
pub struct FragmentPlan {
    pub selectors: &'static [&'static str],
    /// Keep at most this many fragments
    pub limit: Option<usize>,
    /// Use only the first selector that matches anything
    pub first_matching_only: bool,
}

impl FragmentPlan {
    pub const fn all(selectors: &'static [&'static str]) -> Self {
        Self {
            selectors,
            limit: None,
            first_matching_only: false,
        }
    }

    pub const fn limited(selectors: &'static [&'static str], limit: usize) -> Self {
        Self {
            selectors,
            limit: Some(limit),
            first_matching_only: false,
        }
    }
}

/// Outcome of running an extractor over one page
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<PartialRecord>,
    /// Fragments whose extraction raised an error
    pub failed_fragments: usize,
    /// Fragments deliberately dropped as noise
    pub skipped_fragments: usize,
}

/// Source-specific field extraction over already-fetched markup
pub trait FieldExtractor: Send + Sync {
    /// Identifier this extractor is registered under
    fn source_name(&self) -> &'static str;

    fn fragment_plan(&self) -> FragmentPlan;

    /// Extract one fragment. `Ok(None)` drops the fragment without counting an error.
    fn extract(&self, fragment: ElementRef<'_>, page: &RawPage) -> Result<Option<PartialRecord>>;

    /// Run `extract` over every fragment of the page. A failing fragment is
    /// logged and counted; its siblings are still processed.
    fn extract_page(&self, page: &RawPage) -> PageExtraction {
        let document = Html::parse_document(&page.body);
        let mut extraction = PageExtraction::default();

        let fragments = match select_fragments(&document, &self.fragment_plan()) {
            Ok(fragments) => fragments,
            Err(e) => {
                warn!(source = self.source_name(), url = %page.url, "Fragment lookup failed: {}", e);
                extraction.failed_fragments += 1;
                return extraction;
            }
        };

        debug!(source = self.source_name(), "Found {} fragments on {}", fragments.len(), page.url);

        for (i, fragment) in fragments.into_iter().enumerate() {
            match self.extract(fragment, page) {
                Ok(Some(record)) => extraction.records.push(record),
                Ok(None) => {
                    debug!(source = self.source_name(), "Skipping fragment {}", i);
                    extraction.skipped_fragments += 1;
                }
                Err(e) => {
                    let err = ScraperError::Extraction {
                        source_name: self.source_name().to_string(),
                        message: format!("fragment {i}: {e}"),
                    };
                    warn!(url = %page.url, "{}", err);
                    extraction.failed_fragments += 1;
                }
            }
        }

        extraction
    }
}

/// Ordered selector candidates per field. An empty list means the source
/// does not carry that field.
#[derive(Debug, Clone, Copy)]
pub struct SelectorProfile {
    pub name: &'static [&'static str],
    pub provider: &'static [&'static str],
    pub amount: &'static [&'static str],
    pub deadline: &'static [&'static str],
    pub description: &'static [&'static str],
    pub eligibility: &'static [&'static str],
    /// Anchors whose `href` is the application link
    pub link: &'static [&'static str],
    pub country: &'static [&'static str],
    pub degree_level: &'static [&'static str],
    pub subject: &'static [&'static str],
}

impl SelectorProfile {
    pub fn apply(
        &self,
        fragment: ElementRef<'_>,
        page: &RawPage,
        source_name: &str,
    ) -> Result<PartialRecord> {
        let mut record = PartialRecord::new(source_name, page.url.clone());
        record.name = first_text(fragment, self.name)?;
        record.provider = first_text(fragment, self.provider)?;
        record.amount = first_text(fragment, self.amount)?;
        record.deadline_text = first_text(fragment, self.deadline)?;
        record.description = first_text(fragment, self.description)?;
        record.eligibility = first_text(fragment, self.eligibility)?;
        record.country = first_text(fragment, self.country)?;
        record.degree_level = first_text(fragment, self.degree_level)?;
        record.subject = first_text(fragment, self.subject)?;
        record.application_link = match first_attr(fragment, self.link, "href")? {
            Some(href) => Some(resolve_link(&page.url, &href)?),
            None => None,
        };
        Ok(record)
    }
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_string(),
        message: format!("{e:?}"),
    })
}

pub fn select_fragments<'a>(document: &'a Html, plan: &FragmentPlan) -> Result<Vec<ElementRef<'a>>> {
    let mut fragments = Vec::new();
    for css in plan.selectors {
        let sel = selector(css)?;
        let matched: Vec<_> = document.select(&sel).collect();
        if matched.is_empty() {
            continue;
        }
        fragments.extend(matched);
        if plan.first_matching_only {
            break;
        }
    }
    if let Some(limit) = plan.limit {
        fragments.truncate(limit);
    }
    Ok(fragments)
}

/// Concatenated, trimmed text of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-empty text among the candidate selectors, in order
pub fn first_text(fragment: ElementRef<'_>, candidates: &[&str]) -> Result<Option<String>> {
    for css in candidates {
        let sel = selector(css)?;
        let found = fragment
            .select(&sel)
            .map(element_text)
            .find(|text| !text.is_empty());
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// First non-empty attribute value among the candidate selectors, in order
pub fn first_attr(fragment: ElementRef<'_>, candidates: &[&str], attr: &str) -> Result<Option<String>> {
    for css in candidates {
        let sel = selector(css)?;
        let found = fragment
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// Resolve a possibly relative href against the page it was found on
pub fn resolve_link(page_url: &str, href: &str) -> Result<String> {
    let base = Url::parse(page_url).map_err(|e| ScraperError::Url {
        url: page_url.to_string(),
        message: e.to_string(),
    })?;
    let joined = base.join(href).map_err(|e| ScraperError::Url {
        url: href.to_string(),
        message: e.to_string(),
    })?;
    Ok(joined.to_string())
}

/// Host of a URL without a leading `www.`
pub fn page_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}

pub fn excerpt(mut text: String, max_chars: usize) -> String {
    truncate_chars(&mut text, max_chars);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_respects_candidate_order() {
        let html = Html::parse_fragment(
            r#"<div><span class="title">  Second </span><h2></h2><h3>Third</h3></div>"#,
        );
        let root = html.root_element();

        // Empty h2 is skipped, .title wins over h3
        let text = first_text(root, &["h2", ".title", "h3"]).unwrap();
        assert_eq!(text.as_deref(), Some("Second"));

        assert_eq!(first_text(root, &[".missing"]).unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let html = Html::parse_fragment("<div></div>");
        assert!(first_text(html.root_element(), &["h2[["]).is_err());
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("https://www.fastweb.com/college-scholarships", "/s/123").unwrap(),
            "https://www.fastweb.com/s/123"
        );
        assert_eq!(
            resolve_link("https://a.org/x", "https://b.org/apply").unwrap(),
            "https://b.org/apply"
        );
        assert!(resolve_link("not a url", "/x").is_err());
    }

    #[test]
    fn test_page_host_strips_www() {
        assert_eq!(page_host("https://www.example.org/list").as_deref(), Some("example.org"));
        assert_eq!(page_host("garbage"), None);
    }

    #[test]
    fn test_first_matching_plan_stops_at_first_hit() {
        let html = Html::parse_document(
            r#"<html><body><article>A</article><div class="scholarship">B</div></body></html>"#,
        );
        let plan = FragmentPlan {
            selectors: &["section", "article", ".scholarship"],
            limit: Some(10),
            first_matching_only: true,
        };
        let fragments = select_fragments(&html, &plan).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(element_text(fragments[0]), "A");
    }
}
