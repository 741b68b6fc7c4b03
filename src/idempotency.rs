use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Row identity of a scholarship: (name, provider, deadline).
///
/// A missing provider and an empty provider are the same key component, and
/// every record without a deadline shares the same deadline component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub name: String,
    pub provider: String,
    pub deadline: Option<NaiveDate>,
}

impl NaturalKey {
    pub fn new(name: &str, provider: Option<&str>, deadline: Option<NaiveDate>) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.unwrap_or_default().to_string(),
            deadline,
        }
    }

    /// Hex SHA-256 of the canonical key string, stored in the unique column
    pub fn digest(&self) -> String {
        compute_natural_key(&self.name, &self.provider, self.deadline)
    }
}

pub fn compute_natural_key(name: &str, provider: &str, deadline: Option<NaiveDate>) -> String {
    // Length prefixes keep "a|b" + "c" distinct from "a" + "b|c"
    let mut s = String::new();
    s.push_str(&name.len().to_string());
    s.push(':');
    s.push_str(name);
    s.push('|');
    s.push_str(&provider.len().to_string());
    s.push(':');
    s.push_str(provider);
    s.push('|');
    if let Some(d) = deadline {
        s.push_str(&d.format("%Y-%m-%d").to_string());
    }

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let out = hasher.finalize();
    hex::encode(out)
}
