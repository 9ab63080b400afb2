use scraper::Html;
use tracing::debug;

use super::parse_selector;
use crate::error::Result;
use crate::models::ProductLink;

/// Finds the first `href` in the document that contains `path_marker` and
/// cuts it at `query_marker`.
///
/// Product links look like `/product--<name>/<id>?nid=<tracking>...`; only the
/// name and id part is kept. When the query marker is missing the whole href
/// is returned.
pub fn extract_product_link(
    html: &str,
    path_marker: &str,
    query_marker: &str,
) -> Result<Option<ProductLink>> {
    let document = Html::parse_document(html);
    let href_selector = parse_selector("[href]")?;

    let link = document
        .select(&href_selector)
        .filter_map(|element| element.value().attr("href"))
        .find(|href| href.contains(path_marker))
        .map(|href| {
            debug!("Matched product href {}", href);
            let end = href.find(query_marker).unwrap_or(href.len());
            ProductLink(href[..end].to_string())
        });

    Ok(link)
}
