use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsers::{clean_text, parse_price_amount};

/// One spreadsheet row that is worth a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Zero-based index of the data row (the header line is not counted).
    pub index: usize,
    pub article: String,
    pub brand: String,
}

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductLink(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(pub String);

impl ProductLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Price {
    /// Raw text as it appeared on the page.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Whole amount in rubles, e.g. `"12 990"` gives `12990`.
    pub fn amount(&self) -> Option<u64> {
        parse_price_amount(&self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", clean_text(&self.0))
    }
}
