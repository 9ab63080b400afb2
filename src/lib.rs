//! Links branded products from a spreadsheet to Yandex.Market listings and
//! reads the prices listed on a product page.

pub mod config;
pub mod error;
pub mod input;
pub mod linker;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod utils;
