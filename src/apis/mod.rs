// Shared extractor contract, selector helpers and the source lookup table
pub mod base;
pub mod factory;

// Source-specific extractors
pub mod blog_listing;
pub mod fastweb;
pub mod generic;
pub mod government;
pub mod international_scholarships;
pub mod scholarship_portal;
pub mod scholarships_com;

pub use base::{FieldExtractor, PageExtraction};
pub use factory::{create_extractor, ExtractorRegistry};
