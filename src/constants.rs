/// Source identifier constants to ensure consistency across the codebase.
/// These double as the `source_name` stamped on every record an extractor produces.
pub const SCHOLARSHIPS_COM: &str = "scholarships.com";
pub const FASTWEB: &str = "fastweb.com";
pub const INTERNATIONAL_SCHOLARSHIPS: &str = "internationalscholarships.com";
pub const SCHOLARSHIP_PORTAL: &str = "scholarshipportal.com";
pub const GOVERNMENT: &str = "government";
pub const GOVERNMENT_UK: &str = "government-uk";
pub const SCHOLARSHIP_POSITIONS: &str = "scholarship-positions.com";
pub const OPPORTUNITIES_CORNERS: &str = "opportunitiescorners.com";
pub const SCHOLARSHIP_ROAR: &str = "scholarshiproar.com";

/// Name written to the run log when no explicit run name is configured
pub const DEFAULT_RUN_NAME: &str = "scholarship_scraper";

/// Records buffered before a batch is written
pub const DEFAULT_BATCH_SIZE: usize = 50;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_COUNTRY: &str = "International";
pub const DEFAULT_DEGREE_LEVEL: &str = "Any";
pub const DEFAULT_SUBJECT: &str = "Any";

// Storage limits in characters
pub const MAX_NAME_LEN: usize = 500;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_PROVIDER_LEN: usize = 255;
pub const MAX_ELIGIBILITY_LEN: usize = 2000;
pub const MAX_AMOUNT_LEN: usize = 255;
pub const MAX_CURRENCY_LEN: usize = 10;
pub const MAX_COUNTRY_LEN: usize = 100;
pub const MAX_DEGREE_LEVEL_LEN: usize = 100;
pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_SOURCE_NAME_LEN: usize = 100;

/// Description cap applied by listing-style extractors before normalization
pub const EXCERPT_LEN: usize = 500;

/// Built-in catalogue of (source id, listing URL)
pub fn default_sources() -> Vec<(&'static str, &'static str)> {
    vec![
        (SCHOLARSHIPS_COM, "https://www.scholarships.com/financial-aid/college-scholarships/"),
        (FASTWEB, "https://www.fastweb.com/college-scholarships"),
        (INTERNATIONAL_SCHOLARSHIPS, "https://www.internationalscholarships.com/"),
        (SCHOLARSHIP_PORTAL, "https://www.scholarshipportal.com/scholarships"),
        (GOVERNMENT, "https://educationusa.state.gov/opportunity/scholarships"),
        (GOVERNMENT_UK, "https://www.britishcouncil.org/study-uk/scholarships"),
        (SCHOLARSHIP_POSITIONS, "https://scholarship-positions.com/"),
        (OPPORTUNITIES_CORNERS, "https://opportunitiescorners.com/"),
        (SCHOLARSHIP_ROAR, "https://scholarshiproar.com/"),
    ]
}

/// Get all source identifiers that have a dedicated extractor
pub fn get_supported_sources() -> Vec<&'static str> {
    default_sources().into_iter().map(|(id, _)| id).collect()
}
