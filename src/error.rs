use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("column {0:?} not found in header row")]
    MissingColumn(String),

    #[error("unsupported input file {0:?}, expected .xlsx, .xls, .ods or .csv")]
    UnsupportedInput(String),

    #[error("invalid selector {0:?}")]
    Selector(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
