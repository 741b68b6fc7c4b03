use std::collections::HashMap;

use crate::apis::base::{page_host, FieldExtractor};
use crate::apis::blog_listing::BlogListingExtractor;
use crate::apis::fastweb::FastwebExtractor;
use crate::apis::generic::GenericExtractor;
use crate::apis::government::GovernmentExtractor;
use crate::apis::international_scholarships::InternationalScholarshipsExtractor;
use crate::apis::scholarship_portal::ScholarshipPortalExtractor;
use crate::apis::scholarships_com::ScholarshipsComExtractor;
use crate::constants::*;

/// Factory function to create the dedicated extractor for a source
pub fn create_extractor(source_id: &str) -> Option<Box<dyn FieldExtractor>> {
    match source_id {
        SCHOLARSHIPS_COM => Some(Box::new(ScholarshipsComExtractor)),
        FASTWEB => Some(Box::new(FastwebExtractor)),
        INTERNATIONAL_SCHOLARSHIPS => Some(Box::new(InternationalScholarshipsExtractor)),
        SCHOLARSHIP_PORTAL => Some(Box::new(ScholarshipPortalExtractor)),
        GOVERNMENT | GOVERNMENT_UK => Some(Box::new(GovernmentExtractor)),
        SCHOLARSHIP_POSITIONS => Some(Box::new(BlogListingExtractor::scholarship_positions())),
        OPPORTUNITIES_CORNERS => Some(Box::new(BlogListingExtractor::opportunities_corners())),
        SCHOLARSHIP_ROAR => Some(Box::new(BlogListingExtractor::scholarship_roar())),
        _ => None,
    }
}

/// Lookup table from source identifier to extractor, built once at startup
pub struct ExtractorRegistry {
    extractors: HashMap<String, Box<dyn FieldExtractor>>,
    fallback: Box<dyn FieldExtractor>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorRegistry {
    /// Create a registry holding every built-in extractor
    pub fn new() -> Self {
        let mut extractors: HashMap<String, Box<dyn FieldExtractor>> = HashMap::new();
        for source_id in get_supported_sources() {
            if let Some(extractor) = create_extractor(source_id) {
                extractors.insert(source_id.to_string(), extractor);
            }
        }

        Self {
            extractors,
            fallback: Box::new(GenericExtractor),
        }
    }

    /// Register an extractor for a specific source
    pub fn register(&mut self, source_id: impl Into<String>, extractor: Box<dyn FieldExtractor>) {
        self.extractors.insert(source_id.into(), extractor);
    }

    /// Pick the extractor by source identifier, then by page host, else the
    /// generic fallback.
    pub fn resolve(&self, source_id: &str, url: &str) -> &dyn FieldExtractor {
        if let Some(extractor) = self.extractors.get(source_id) {
            return extractor.as_ref();
        }
        page_host(url)
            .and_then(|host| self.extractors.get(&host))
            .map(|e| e.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// List all registered source IDs
    pub fn list_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.extractors.keys().map(|k| k.as_str()).collect();
        sources.sort_unstable();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::generic::GENERIC;

    #[test]
    fn test_registry_has_built_in_extractors() {
        let registry = ExtractorRegistry::new();
        let sources = registry.list_sources();

        assert!(sources.contains(&SCHOLARSHIPS_COM));
        assert!(sources.contains(&FASTWEB));
        assert!(sources.contains(&SCHOLARSHIP_ROAR));
        assert_eq!(sources.len(), get_supported_sources().len());
    }

    #[test]
    fn test_resolve_by_source_id() {
        let registry = ExtractorRegistry::new();
        let extractor = registry.resolve(FASTWEB, "https://mirror.example.org/list");
        assert_eq!(extractor.source_name(), FASTWEB);
    }

    #[test]
    fn test_resolve_by_page_host() {
        let registry = ExtractorRegistry::new();
        let extractor = registry.resolve("custom", "https://www.scholarshipportal.com/scholarships");
        assert_eq!(extractor.source_name(), SCHOLARSHIP_PORTAL);
    }

    #[test]
    fn test_both_government_sources_share_an_extractor() {
        let registry = ExtractorRegistry::new();
        let uk = registry.resolve(GOVERNMENT_UK, "https://www.britishcouncil.org/study-uk/scholarships");
        assert_eq!(uk.source_name(), GOVERNMENT);
        assert!(registry.list_sources().contains(&GOVERNMENT_UK));
    }

    #[test]
    fn test_unknown_source_falls_back_to_generic() {
        let registry = ExtractorRegistry::new();
        let extractor = registry.resolve("unknown", "https://unknown.example.org/");
        assert_eq!(extractor.source_name(), GENERIC);
    }
}
