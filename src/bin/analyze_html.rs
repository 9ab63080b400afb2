use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::env;
use std::fs;

use market_linker::config::Config;
use market_linker::parsers::{extract_prices, extract_product_link};
use market_linker::scrapers::MarketScraper;
use market_linker::utils::headers::header_provider;
use market_linker::utils::http::{create_client, fetch};

/// Dumps a search page and shows what the current markers match on it.
///
/// Usage: analyze_html <brand> <article>
#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let brand = args.next().context("missing <brand>")?;
    let article = args.next().context("missing <article>")?;

    let config = std::sync::Arc::new(Config::load(None)?);
    let client = create_client(&config)?;
    let headers = header_provider(&config);
    let market = MarketScraper::new(
        config.clone(),
        client.clone(),
        header_provider(&config),
        None,
    )?;

    let url = market.build_search_url(&article, &brand);
    println!("Fetching {}", url);
    let response = fetch(&client, &url, headers.headers()).await?;
    println!("Status: {}", response.status());
    let html = response.text().await?;
    fs::write("market_search_sample.html", &html)?;
    println!("Saved {} bytes to market_search_sample.html", html.len());

    let document = Html::parse_document(&html);
    let href_selector = Selector::parse("[href]").map_err(|_| anyhow::anyhow!("bad selector"))?;
    let product_hrefs: Vec<&str> = document
        .select(&href_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.contains(&config.product_path_marker))
        .collect();
    println!(
        "{} hrefs contain {:?}",
        product_hrefs.len(),
        config.product_path_marker
    );
    for href in product_hrefs.iter().take(5) {
        println!("  {}", href);
    }

    match extract_product_link(&html, &config.product_path_marker, &config.link_query_marker)? {
        Some(link) => println!("Search would return {}", link),
        None => println!("Search would return None"),
    }

    let prices = extract_prices(&html, &config.currency_attribute, &config.currency_symbol)?;
    println!(
        "{} price blocks after the first carry [{}={:?}]",
        prices.len(),
        config.currency_attribute,
        config.currency_symbol
    );

    Ok(())
}
