//! # OneR
//!
//! A one-rule classifier with supervised and unsupervised discretization of
//! numeric attributes.
//!
//! OneR picks the single feature whose levels best predict a categorical
//! target and encodes the model as a majority-vote lookup table, one rule per
//! level. Model quality depends almost entirely on where numeric features
//! are cut into levels, so most of this crate is the discretization
//! subsystem:
//!
//! - **Unsupervised binning**: equal-width intervals, empirical quantiles or
//!   1-D k-means clusters
//! - **Optimal binning**: cut points placed between the classes of the
//!   target, by midpoints of class means, pairwise logistic regression
//!   boundaries or greedy information-gain splits
//! - **Rule learning**: per-feature accuracy scan with `first` or
//!   chi-squared tie-breaking
//! - **Prediction and evaluation**: replaying the training-time cut points on
//!   new data, confusion matrices and error-rate reduction against the base
//!   rate
//!
//! Non-fatal conditions (rows removed for missing values, collapsed bins,
//! fallbacks) are never silent: they are logged and returned as
//! [`Diagnostics`] alongside the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use oner::{one_r, Column, OneRConfig, PredictionType, Table};
//!
//! # fn main() -> oner::Result<()> {
//! let data = Table::from_columns(vec![
//!     ("x", Column::numeric([1.0, 1.0, 1.0, 2.0, 2.0, 2.0])),
//!     ("y", Column::categorical(["A", "A", "B", "B", "B", "B"])),
//! ])?;
//!
//! let model = one_r(&data, Some("y"), &OneRConfig::default())?;
//! assert_eq!(model.feature(), "x");
//! assert_eq!(model.correct(), 5);
//!
//! let prediction = model.predict(&data, PredictionType::Class)?;
//! println!("{:?}", prediction.value);
//!
//! let eval = model.evaluate(&data)?;
//! println!("{}", eval);
//! # Ok(())
//! # }
//! ```
//!
//! ### Optimal binning
//!
//! ```rust
//! use oner::{ConfigBuilder, OptimalMethod};
//!
//! # fn main() -> oner::Result<()> {
//! let config = ConfigBuilder::new()
//!     .optimal(OptimalMethod::Infogain)
//!     .verbose(true)
//!     .build()?;
//! # let _ = config;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! All modules log through the `log` facade. Call [`init`] to install the
//! bundled `env_logger` backend; `RUST_LOG` controls the level and defaults
//! to `info`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Statistical collaborators
pub mod stats;

// Dataset management module
pub mod dataset;

// Rule learner and model
pub mod learner;

// Prediction module
pub mod prediction;

// Evaluation module
pub mod metrics;

// Re-export core functionality for convenience
pub use self::core::{
    diagnostics::{Diagnosed, Diagnostic, Diagnostics, Severity},
    error::{OneRError, Result},
    types::*,
};

// Re-export configuration functionality
pub use self::config::{ConfigBuilder, NumericStrategy, OneRConfig, PreprocessConfig};

// Re-export dataset functionality
pub use self::dataset::{
    bin, optimal_bin, optimal_cut, preprocess, BinBoundaries, BinningConfig, Column,
    DatasetPreprocessor, Discretization, Factor, NumericalBinner, OptimalBinner, Table,
};

#[cfg(feature = "csv")]
pub use self::dataset::{load_csv, CsvLoader};

// Re-export learner functionality
pub use self::learner::{one_r, ContingencyTable, FeatureScore, Model, Rule, RuleLearner};

// Re-export prediction functionality
pub use self::prediction::{predict, PredictedClass, Prediction, Predictor, ProbabilityMatrix};

// Re-export evaluation functionality
pub use self::metrics::{eval_model, Evaluation};

// Version information
pub use self::core::constants::ONER_RUST_VERSION as VERSION;

/// Initialize the library.
///
/// Installs the `env_logger` backend once; further calls are no-ops. The
/// library works without it, but its log output is then discarded unless
/// the host application installs a logger.
///
/// # Examples
///
/// ```rust
/// fn main() -> oner::Result<()> {
///     oner::init()?;
///     assert!(oner::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    self::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    self::core::is_core_initialized()
}
