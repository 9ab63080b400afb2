pub mod link;
pub mod price;

pub use link::*;
pub use price::*;

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use crate::error::{MarketError, Result};

static CYRILLIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Cyrillic}").expect("Invalid cyrillic regex"));

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the string contains at least one Cyrillic letter (`ё` included).
pub fn has_cyrillic(s: &str) -> bool {
    CYRILLIC_REGEX.is_match(s)
}

/// Articles written in Cyrillic are colour names or notes ("КРАСНЫЙ"),
/// never catalogue codes.
pub fn is_valid_article(article: &str) -> bool {
    !has_cyrillic(article)
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| MarketError::Selector(selector.to_string()))
}
