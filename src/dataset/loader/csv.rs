//! CSV file loader.
//!
//! The first record is the header. Each column's kind is inferred from its
//! non-missing cells: all parse as `f64` gives a numeric column, all are
//! `true`/`false` (any case) gives a boolean column, anything else is text.

use crate::core::error::{OneRError, Result};
use crate::dataset::table::{Column, Table};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Quote character
    pub quote_char: char,
    /// Comment character
    pub comment_char: Option<char>,
    /// Maximum number of data rows to read
    pub max_rows: Option<usize>,
    /// Trim whitespace from fields
    pub trim: bool,
    /// Cell contents read as missing values
    pub missing_markers: Vec<String>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: ',',
            quote_char: '"',
            comment_char: None,
            max_rows: None,
            trim: true,
            missing_markers: vec![String::new(), "NA".to_string()],
        }
    }
}

/// CSV data loader
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    config: CsvConfig,
}

impl CsvLoader {
    /// Create a loader with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with a custom configuration
    pub fn with_config(config: CsvConfig) -> Self {
        CsvLoader { config }
    }

    /// Set delimiter character
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set maximum rows to read
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.config.max_rows = Some(max_rows);
        self
    }

    /// Set the cell contents read as missing values
    pub fn with_missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.missing_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Load a CSV file
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        log::info!("Loading CSV file: {}", path.display());
        if !path.is_file() {
            return Err(OneRError::usage(format!(
                "not a readable file: {}",
                path.display()
            )));
        }
        self.load_from_reader(File::open(path)?)
    }

    /// Load CSV data from any reader
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Table> {
        let delimiter = ascii_byte(self.config.delimiter, "delimiter")?;
        let quote = ascii_byte(self.config.quote_char, "quote_char")?;
        let comment = self
            .config
            .comment_char
            .map(|c| ascii_byte(c, "comment_char"))
            .transpose()?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .quote(quote)
            .comment(comment)
            .trim(if self.config.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(OneRError::usage("CSV input has no header"));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for (row, record) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row >= max) {
                break;
            }
            let record = record?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                let missing = self.config.missing_markers.iter().any(|m| m == field);
                column.push((!missing).then(|| field.to_string()));
            }
        }

        let mut table = Table::new();
        for (name, column) in headers.into_iter().zip(cells) {
            table.push_column(name, infer_column(column))?;
        }
        log::debug!(
            "Loaded {} rows x {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }

    /// Load CSV data from a string
    pub fn load_from_str(&self, data: &str) -> Result<Table> {
        self.load_from_reader(data.as_bytes())
    }
}

fn ascii_byte(c: char, name: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(OneRError::invalid_parameter(
            name,
            c.to_string(),
            "must be an ASCII character",
        ))
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick the column kind from its non-missing cells
fn infer_column(cells: Vec<Option<String>>) -> Column {
    let present = || cells.iter().flatten();
    if present().all(|c| c.parse::<f64>().is_ok()) {
        return Column::Numeric(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(|s| s.parse().ok()).unwrap_or(f64::NAN))
                .collect(),
        );
    }
    if present().all(|c| parse_bool(c).is_some()) {
        return Column::Boolean(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(parse_bool))
                .collect(),
        );
    }
    Column::Text(cells)
}

/// Load a CSV file with the default configuration
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    CsvLoader::new().load_csv(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DATA: &str = "x,kind,flag,y\n1.5,red,true,a\n2,blue,FALSE,b\nNA,,True,a\n";

    #[test]
    fn test_type_inference() {
        let table = CsvLoader::new().load_from_str(DATA).unwrap();
        assert_eq!(table.names(), &["x", "kind", "flag", "y"]);
        assert_eq!(table.num_rows(), 3);

        let x = table.column("x").unwrap();
        assert!(x.is_numeric());
        assert!(x.is_missing(2));
        assert_eq!(table.column("kind").unwrap().type_name(), "text");
        assert!(table.column("kind").unwrap().is_missing(2));
        assert_eq!(
            table.column("flag").unwrap(),
            &Column::Boolean(vec![Some(true), Some(false), Some(true)])
        );
    }

    #[test]
    fn test_max_rows_and_delimiter() {
        let table = CsvLoader::new()
            .with_delimiter(';')
            .with_max_rows(1)
            .load_from_str("a;b\n1;x\n2;y\n")
            .unwrap();
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.num_columns(), 4);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_csv("/definitely/not/here.csv").is_err());
    }
}
