//! Tabular data: columns, categorical variables, binning and preprocessing.
//!
//! A [`Table`] holds named, equal-length [`Column`]s. Numeric columns are
//! turned into categorical [`Factor`]s by the [`binning`] module, and
//! [`preprocessing`] applies that across a whole table to produce the fully
//! categorical input the rule learner expects.

pub mod binning;
pub mod factor;
pub mod loader;
pub mod preprocessing;
pub mod table;

pub use binning::{
    bin, optimal_bin, optimal_cut, BinBoundaries, BinningConfig, Discretization, NumericalBinner,
    OptimalBinner,
};
pub use factor::{format_value, Factor};
pub use preprocessing::{preprocess, DatasetPreprocessor, NumericStrategy, PreprocessConfig};
pub use table::{Column, Table};

#[cfg(feature = "csv")]
pub use loader::{load_csv, CsvConfig, CsvLoader};
