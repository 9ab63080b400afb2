use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::parse_selector;
use crate::error::Result;
use crate::models::Price;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[\s\u{a0}\u{202f}]\d{3})*").expect("Invalid price regex")
});

/// Collects the prices on a product page.
///
/// Every element whose `attribute` equals `currency` is a price block. The
/// first one is the summary at the top of the page and is skipped; each of
/// the others contributes the first text found in its direct `span` children.
pub fn extract_prices(html: &str, attribute: &str, currency: &str) -> Result<Vec<Price>> {
    let document = Html::parse_document(html);
    let currency_selector = parse_selector(&format!(r#"[{}="{}"]"#, attribute, currency))?;

    let prices = document
        .select(&currency_selector)
        .skip(1)
        .filter_map(|element| {
            let text = first_span_text(element);
            if text.is_none() {
                debug!("Price block without span text: {}", element.html());
            }
            text
        })
        .map(Price)
        .collect();

    Ok(prices)
}

/// First text node found among the direct `span` children, in order.
fn first_span_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "span")
        .find_map(|span| {
            span.children()
                .find_map(|node| node.value().as_text().map(|text| String::from(&**text)))
        })
}

/// Parses the whole-ruble amount out of a price text such as `"12 990"` or
/// `"от 1 299 ₽"`.
pub fn parse_price_amount(price_text: &str) -> Option<u64> {
    let found = PRICE_REGEX.find(price_text)?;
    let digits: String = found.as_str().chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
