use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_linker::config::Config;
use market_linker::input::load_rows;
use market_linker::linker;
use market_linker::scrapers::{MarketScraper, ProductSearch};

#[derive(Parser)]
#[command(
    name = "market-linker",
    version,
    about = "Find Yandex.Market listings for branded products"
)]
struct Cli {
    /// Settings file (TOML). Defaults to ./Settings.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging regardless of the configured debug flag.
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search every row of the product spreadsheet (default).
    Link {
        #[arg(long)]
        input: Option<PathBuf>,

        /// Also print the prices of every product found.
        #[arg(long)]
        prices: bool,
    },
    /// Search a single product.
    Search {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        article: String,
    },
    /// Print the prices listed on a product page.
    Prices { url: String },
}

fn init_logging(debug: bool, json: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("market_linker={}", level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.debug {
        config.debug = true;
    }
    init_logging(config.debug, cli.log_json)?;

    let command = cli.command.unwrap_or(Command::Link {
        input: None,
        prices: false,
    });
    if let Command::Link { input: Some(input), .. } = &command {
        config.input_path = input.clone();
    }

    let config = Arc::new(config);
    let market = MarketScraper::from_config(config.clone()).context("Failed to set up scraper")?;

    match command {
        Command::Link { prices, .. } => {
            info!("Reading products from {}", config.input_path.display());
            let rows = load_rows(&config.input_path, &config)
                .with_context(|| format!("Failed to load {}", config.input_path.display()))?;

            linker::run(
                &market,
                rows,
                Duration::from_secs(config.request_delay_seconds),
                prices || config.fetch_prices,
            )
            .await?;
        }
        Command::Search { brand, article } => match market.search(&article, &brand).await? {
            Some(link) => println!("{}", link),
            None => println!("None"),
        },
        Command::Prices { url } => {
            for price in market.get_prices(&url).await? {
                match price.amount() {
                    Some(amount) => println!("{}\t{}", price, amount),
                    None => println!("{}", price),
                }
            }
        }
    }

    Ok(())
}
