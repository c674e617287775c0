//! Category filter model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::QuoteRecord;

const ALL_CATEGORIES: &str = "all";

/// Category selection used when browsing quotes.
///
/// Persisted as a plain string; `"all"` means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied value; blank and `all` select everything.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Category comparison is case-insensitive.
    #[must_use]
    pub fn matches(&self, quote: &QuoteRecord) -> bool {
        self.matches_category(&quote.category)
    }

    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(selected) => selected.to_lowercase() == category.to_lowercase(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Category(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_treats_blank_and_all_as_unfiltered() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" ALL "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Wisdom "),
            CategoryFilter::Category("Wisdom".to_string())
        );
    }

    #[test]
    fn matches_ignores_case() {
        let quote = QuoteRecord::new_local("Be kind", "Wisdom");
        assert!(CategoryFilter::parse("wisdom").matches(&quote));
        assert!(CategoryFilter::All.matches(&quote));
        assert!(!CategoryFilter::parse("Humor").matches(&quote));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let filter = CategoryFilter::parse("Motivation");
        assert_eq!(CategoryFilter::parse(&filter.to_string()), filter);
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }
}
