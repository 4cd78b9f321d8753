//! Tabular data ingestion.

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "csv")]
pub use self::csv::{load_csv, CsvConfig, CsvLoader};
