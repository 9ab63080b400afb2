use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, QueryEncoding};
use crate::error::Result;
use crate::models::{Price, ProductLink};
use crate::parsers::{extract_prices, extract_product_link};
use crate::scrapers::ProductSearch;
use crate::utils::headers::{header_provider, HeaderProvider};
use crate::utils::http::{create_client, fetch};
use crate::utils::proxy::{HttpProxyProbe, ProxyProbe};

/// Search and price pages of Yandex.Market.
pub struct MarketScraper {
    config: Arc<Config>,
    client: Client,
    headers: Box<dyn HeaderProvider>,
    proxy_probe: Option<Box<dyn ProxyProbe>>,
    origin: Url,
}

impl MarketScraper {
    pub fn new(
        config: Arc<Config>,
        client: Client,
        headers: Box<dyn HeaderProvider>,
        proxy_probe: Option<Box<dyn ProxyProbe>>,
    ) -> Result<Self> {
        let origin = Url::parse(&config.search_url)?.join("/")?;
        Ok(Self {
            config,
            client,
            headers,
            proxy_probe,
            origin,
        })
    }

    /// Wires client, header provider and proxy probe as configured.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let client = create_client(&config)?;
        let headers = header_provider(&config);
        let proxy_probe: Option<Box<dyn ProxyProbe>> = match &config.proxy {
            Some(proxy) => {
                let probe = HttpProxyProbe::new(proxy, config.proxy_probe_url.clone())?;
                Some(Box::new(probe))
            }
            None => None,
        };
        Self::new(config, client, headers, proxy_probe)
    }

    pub fn build_search_url(&self, article: &str, brand: &str) -> String {
        let query = match self.config.query_encoding {
            QueryEncoding::Legacy => format!(
                "{}+{}",
                brand.replace(' ', &self.config.brand_space_replacement),
                article
            ),
            QueryEncoding::Percent => {
                let brand = brand
                    .split_whitespace()
                    .map(|word| utf8_percent_encode(word, NON_ALPHANUMERIC).to_string())
                    .collect::<Vec<_>>()
                    .join("+");
                format!("{}+{}", brand, utf8_percent_encode(article, NON_ALPHANUMERIC))
            }
        };
        format!("{}{}", self.config.search_url, query)
    }
}

#[async_trait]
impl ProductSearch for MarketScraper {
    async fn search(&self, article: &str, brand: &str) -> Result<Option<ProductLink>> {
        let url = self.build_search_url(article, brand);

        if let Some(probe) = &self.proxy_probe {
            if !probe.is_alive().await {
                warn!("Incorrect proxy address, skipping search for {} {}", brand, article);
                return Ok(None);
            }
        }

        let response = fetch(&self.client, &url, self.headers.headers()).await?;
        let status = response.status();
        if status != StatusCode::OK {
            info!(
                "Response status code is {}, not able to search {} {}",
                status, brand, article
            );
            return Ok(None);
        }

        let html = response.text().await?;
        let link = extract_product_link(
            &html,
            &self.config.product_path_marker,
            &self.config.link_query_marker,
        )?;

        match &link {
            Some(link) => debug!(
                "Product found for article={}, brand={}: {}",
                article, brand, link
            ),
            None => {
                info!("No product found for article={}, brand={}", article, brand);
                debug!("Search page body:\n{}", html);
            }
        }

        Ok(link)
    }

    async fn get_prices(&self, url: &str) -> Result<Vec<Price>> {
        let response = fetch(&self.client, url, self.headers.headers()).await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("Response status code is {} for price page {}", status, url);
        }
        let html = response.text().await?;

        let prices = extract_prices(
            &html,
            &self.config.currency_attribute,
            &self.config.currency_symbol,
        )?;

        if prices.is_empty() {
            info!("No prices found on {}", url);
        } else {
            debug!("Found {} prices on {}", prices.len(), url);
        }

        Ok(prices)
    }

    fn product_url(&self, link: &ProductLink) -> Result<String> {
        Ok(self.origin.join(link.as_str())?.to_string())
    }
}
