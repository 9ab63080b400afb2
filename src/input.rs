use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{MarketError, Result};

/// A data row as read from the sheet, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub index: usize,
    pub article: String,
    pub brand: String,
}

/// Reads article and brand columns from a spreadsheet.
///
/// The first physical row holds the column names. Every following row is
/// returned, numbered from zero; filtering is left to the caller.
pub fn load_rows(path: &Path, config: &Config) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        _ => return Err(MarketError::UnsupportedInput(path.display().to_string())),
    };

    let rows = rows_from_table(table, &config.article_column, &config.brand_column)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            warn!("{} has no worksheets", path.display());
            return Ok(Vec::new());
        }
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut table = Vec::new();
    for record in reader.records() {
        table.push(record?.iter().map(String::from).collect());
    }
    Ok(table)
}

/// Whole numbers come back from Excel as floats; `12345.0` must read as
/// the article `12345`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

fn rows_from_table(
    table: Vec<Vec<String>>,
    article_column: &str,
    brand_column: &str,
) -> Result<Vec<RawRow>> {
    let mut lines = table.into_iter();
    let header = lines.next().unwrap_or_default();

    let position = |name: &str| {
        header
            .iter()
            .position(|cell| cell.trim() == name)
            .ok_or_else(|| MarketError::MissingColumn(name.to_string()))
    };
    let article_idx = position(article_column)?;
    let brand_idx = position(brand_column)?;

    Ok(lines
        .enumerate()
        .map(|(index, line)| RawRow {
            index,
            article: line.get(article_idx).cloned().unwrap_or_default(),
            brand: line.get(brand_idx).cloned().unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn raw(index: usize, article: &str, brand: &str) -> RawRow {
        RawRow {
            index,
            article: article.to_string(),
            brand: brand.to_string(),
        }
    }

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn columns_are_found_by_name() {
        let rows = rows_from_table(
            table(&[
                &["Id", "BrandName", "Name", "Article"],
                &["1", "Sony", "Headphones", "WH1000XM4"],
                &["2", "Bosch", "Drill", "GSB 18V"],
            ]),
            "Article",
            "BrandName",
        )
        .unwrap();

        assert_eq!(
            rows,
            vec![
                raw(0, "WH1000XM4", "Sony"),
                raw(1, "GSB 18V", "Bosch"),
            ]
        );
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let rows = rows_from_table(
            table(&[&["Article", "BrandName"], &["X1"]]),
            "Article",
            "BrandName",
        )
        .unwrap();
        assert_eq!(rows[0].brand, "");
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = rows_from_table(table(&[&["Article", "Brand"]]), "Article", "BrandName")
            .unwrap_err();
        assert!(matches!(err, MarketError::MissingColumn(name) if name == "BrandName"));
    }

    #[test]
    fn float_cells_lose_trailing_zero() {
        assert_eq!(cell_to_string(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::String(" AB-1 ".into())), "AB-1");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn reads_csv_files() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Article,BrandName\nSKIP,Skip\nWH1000XM4, Sony\n").unwrap();

        let rows = load_rows(file.path(), &Config::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], raw(1, "WH1000XM4", "Sony"));
    }

    #[test]
    fn reads_xlsx_workbooks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Goods_Brands.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["Id", "BrandName", "Name", "Article"].iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_string(1, 1, "Skip").unwrap();
        sheet.write_string(1, 3, "SKIP").unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_string(2, 1, "Bosch").unwrap();
        sheet.write_string(2, 2, "Drill").unwrap();
        sheet.write_number(2, 3, 12345.0).unwrap();
        sheet.write_string(3, 1, "Sony").unwrap();
        sheet.write_string(3, 3, " WH1000XM4 ").unwrap();
        workbook.save(&path).unwrap();

        let rows = load_rows(&path, &Config::default()).unwrap();
        assert_eq!(
            rows,
            vec![
                raw(0, "SKIP", "Skip"),
                raw(1, "12345", "Bosch"),
                raw(2, "WH1000XM4", "Sony"),
            ]
        );
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = load_rows(Path::new("products.json"), &Config::default()).unwrap_err();
        assert!(matches!(err, MarketError::UnsupportedInput(_)));
    }
}
