use std::fmt::{Display, Formatter};

const KEY_SEPARATOR: char = '_';

/// One input row: a place to illustrate and the region it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    region: String,
    place: String,
}

impl WorkItem {
    pub fn new(region: impl Into<String>, place: impl Into<String>) -> WorkItem {
        WorkItem {
            region: region.into(),
            place: place.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    /// Text sent to the search provider.
    pub fn query(&self) -> String {
        format!("{}, {}", self.place, self.region)
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey(format!(
            "{}{}{}",
            sanitize(&self.region),
            KEY_SEPARATOR,
            sanitize(&self.place)
        ))
    }
}

/// Deterministic, filesystem-safe identifier of a work item's artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => KEY_SEPARATOR,
            c if c.is_whitespace() || c.is_control() => KEY_SEPARATOR,
            c => c,
        })
        .collect()
}
