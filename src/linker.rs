use chrono::Local;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;
use crate::input::RawRow;
use crate::models::{ProductLink, ProductRow};
use crate::parsers::is_valid_article;
use crate::scrapers::ProductSearch;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub total: usize,
    pub searched: usize,
    pub found: usize,
    pub skipped: usize,
}

/// Why a row is not searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Row 0 of the sheet, skipped by position.
    First,
    Incomplete,
    Cyrillic,
}

pub fn validate(row: RawRow) -> std::result::Result<ProductRow, Skip> {
    if row.index == 0 {
        return Err(Skip::First);
    }
    if row.article.is_empty() || row.brand.is_empty() {
        return Err(Skip::Incomplete);
    }
    if !is_valid_article(&row.article) {
        return Err(Skip::Cyrillic);
    }
    Ok(ProductRow {
        index: row.index,
        article: row.article,
        brand: row.brand,
    })
}

/// Goes through the rows one by one: validate, search, print, wait.
///
/// The wait follows every search, found or not. A transport error ends the
/// whole run.
pub async fn run(
    search: &dyn ProductSearch,
    rows: Vec<RawRow>,
    delay: Duration,
    fetch_prices: bool,
) -> Result<LinkReport> {
    let mut report = LinkReport {
        total: rows.len(),
        ..LinkReport::default()
    };

    info!(
        "--- Linking {} rows, started at {} ---",
        rows.len(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    for raw in rows {
        let article = raw.article.clone();
        let row = match validate(raw) {
            Ok(row) => row,
            Err(Skip::First) => {
                println!("Skipped");
                report.skipped += 1;
                continue;
            }
            Err(Skip::Incomplete) => {
                info!("Skipping row without article or brand name");
                report.skipped += 1;
                continue;
            }
            Err(Skip::Cyrillic) => {
                info!(
                    "Skipping {} assuming it is wrong because it has cyrillic symbols",
                    article
                );
                report.skipped += 1;
                continue;
            }
        };

        info!("Searching for {}, {}", row.brand, row.article);
        let link = search.search(&row.article, &row.brand).await?;
        report.searched += 1;

        match &link {
            Some(link) => {
                report.found += 1;
                println!("{}", link);
                if fetch_prices {
                    print_prices(search, link).await?;
                }
            }
            None => println!("None"),
        }

        tokio::time::sleep(delay).await;
    }

    info!(
        "Linking finished: {} rows, {} searched, {} found, {} skipped",
        report.total, report.searched, report.found, report.skipped
    );

    Ok(report)
}

async fn print_prices(search: &dyn ProductSearch, link: &ProductLink) -> Result<()> {
    let url = search.product_url(link)?;
    let prices = search.get_prices(&url).await?;
    if prices.is_empty() {
        warn!("No prices for {}", url);
    }
    for price in prices {
        println!("  {}", price);
    }
    Ok(())
}
