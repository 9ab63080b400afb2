use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Price, ProductLink};

mod market;

pub use market::MarketScraper;

#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Looks the product up by article and brand. `Ok(None)` when the site
    /// has no matching listing or refuses the request.
    async fn search(&self, article: &str, brand: &str) -> Result<Option<ProductLink>>;

    /// Prices listed on a product page, in page order.
    async fn get_prices(&self, url: &str) -> Result<Vec<Price>>;

    /// Absolute url of a link returned by `search`.
    fn product_url(&self, link: &ProductLink) -> Result<String>;
}
