use anyhow::{Context, Result};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/84.0.4147.125 Safari/537.36";

/// How request headers are produced for every outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    Static,
    Generated,
}

/// How brand and article are put into the search query.
///
/// `Legacy` reproduces the site links the product team has been using:
/// spaces in the brand become `brand_space_replacement` (a bare `%` by
/// default) and nothing else is escaped. Whether that is what the site
/// really expects is still unconfirmed, so `Percent` is offered as the
/// standards-compliant alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryEncoding {
    Legacy,
    Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search_url: String,
    pub referer: String,
    pub static_user_agent: String,
    pub header_mode: HeaderMode,
    pub user_agents: Vec<String>,
    pub user_agents_file: Option<PathBuf>,
    pub query_encoding: QueryEncoding,
    pub brand_space_replacement: String,
    pub product_path_marker: String,
    pub link_query_marker: String,
    pub currency_attribute: String,
    pub currency_symbol: String,
    pub proxy: Option<String>,
    pub proxy_probe_url: String,
    pub request_timeout_seconds: Option<u64>,
    pub request_delay_seconds: u64,
    pub input_path: PathBuf,
    pub article_column: String,
    pub brand_column: String,
    pub fetch_prices: bool,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_url: "https://market.yandex.ru/search?text=".to_string(),
            referer: "https://www.google.com/".to_string(),
            static_user_agent: DEFAULT_USER_AGENT.to_string(),
            header_mode: HeaderMode::Generated,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/84.0.4147.105 Safari/537.36".to_string(),
                DEFAULT_USER_AGENT.to_string(),
            ],
            user_agents_file: None,
            query_encoding: QueryEncoding::Legacy,
            brand_space_replacement: "%".to_string(),
            product_path_marker: "/product--".to_string(),
            link_query_marker: "?nid=".to_string(),
            currency_attribute: "data-autotest-currency".to_string(),
            currency_symbol: "₽".to_string(),
            proxy: None,
            proxy_probe_url: "https://google.com".to_string(),
            request_timeout_seconds: None,
            request_delay_seconds: 3,
            input_path: PathBuf::from("Goods_Brands.xlsx"),
            article_column: "Article".to_string(),
            brand_column: "BrandName".to_string(),
            fetch_prices: false,
            debug: true,
        }
    }
}

impl Config {
    /// Builds the configuration from defaults, an optional TOML file and
    /// `MARKET_*` environment variables, in that order of precedence.
    ///
    /// Without an explicit path, `Settings.toml` in the working directory is
    /// read when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("Settings").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("MARKET").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize::<Config>()
            .context("Failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
header_mode = "static"
query_encoding = "percent"
request_delay_seconds = 0
proxy = "http://127.0.0.1:3128"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.header_mode, HeaderMode::Static);
        assert_eq!(config.query_encoding, QueryEncoding::Percent);
        assert_eq!(config.request_delay_seconds, 0);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:3128"));
        // untouched keys keep their defaults
        assert_eq!(config.product_path_marker, "/product--");
        assert_eq!(config.currency_symbol, "₽");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/market.toml"))).is_err());
    }
}
