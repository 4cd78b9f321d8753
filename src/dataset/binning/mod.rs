//! Discretization of numeric columns into ordered categorical variables.
//!
//! Two families of binners live here:
//!
//! - [`NumericalBinner`]: unsupervised binning by equal-width intervals,
//!   empirical quantiles or 1-D clusters
//! - [`OptimalBinner`]: supervised binning whose cut points separate the
//!   classes of a categorical target
//!
//! Both produce a [`Factor`] carrying the [`Discretization`] that built it,
//! so prediction can replay the exact training-time mapping on new data.

pub mod mapper;
pub mod numerical;
pub mod optimal;

pub use mapper::{format_significant, BinBoundaries, Discretization};
pub use numerical::NumericalBinner;
pub use optimal::{optimal_bin, optimal_cut, OptimalBinner};

use crate::core::constants::DEFAULT_NBINS;
use crate::core::diagnostics::{Diagnosed, Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::{BinMethod, MissingPolicy};
use crate::dataset::factor::Factor;
use crate::dataset::table::Column;
use serde::{Deserialize, Serialize};

/// Configuration for unsupervised binning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    /// Number of bins requested
    pub nbins: usize,
    /// Optional level labels, one per produced bin
    pub labels: Option<Vec<String>>,
    /// Binning method
    pub method: BinMethod,
    /// Missing value handling
    pub missing: MissingPolicy,
}

impl Default for BinningConfig {
    fn default() -> Self {
        BinningConfig {
            nbins: DEFAULT_NBINS,
            labels: None,
            method: BinMethod::default(),
            missing: MissingPolicy::default(),
        }
    }
}

impl BinningConfig {
    /// Configuration for `nbins` bins with the given method
    pub fn new(nbins: usize, method: BinMethod) -> Self {
        BinningConfig {
            nbins,
            method,
            ..Default::default()
        }
    }

    /// Set explicit level labels
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the missing value policy
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.nbins <= 1 {
            return Err(OneRError::usage(format!(
                "nbins must be greater than 1, got {}",
                self.nbins
            )));
        }
        Ok(())
    }
}

/// Bin a single column.
///
/// Numeric columns are discretized with [`NumericalBinner`]. Any other
/// column is converted to a categorical variable as is; `labels` only apply
/// to numeric input.
pub fn bin(column: &Column, config: &BinningConfig) -> Result<Diagnosed<Factor>> {
    config.validate()?;
    match column {
        Column::Numeric(values) => NumericalBinner::new(config.clone())?.fit(values),
        other => apply_missing_policy(other.to_factor(), config.missing),
    }
}

/// Apply a missing value policy to a freshly built factor.
///
/// `Omit` leaves missing rows unassigned and reports how many there are;
/// `Keep` assigns them to the reserved `NA` level.
pub(crate) fn apply_missing_policy(
    factor: Factor,
    missing: MissingPolicy,
) -> Result<Diagnosed<Factor>> {
    let count = factor.missing_count();
    let mut diagnostics = Diagnostics::new();
    let factor = match missing {
        MissingPolicy::Omit => {
            if count > 0 {
                diagnostics.push(Diagnostic::RowsRemoved {
                    column: None,
                    count,
                });
            }
            factor
        }
        MissingPolicy::Keep => factor.with_missing_level()?,
    };
    Ok(Diagnosed::new(factor, diagnostics))
}

/// Map numeric values through a discretization into a factor.
pub(crate) fn discretize(values: &[f64], discretization: Discretization) -> Result<Factor> {
    match discretization {
        Discretization::Categorical => Ok(Factor::from_numeric(values)),
        Discretization::Intervals { boundaries, labels } => {
            if labels.len() != boundaries.num_bins() {
                return Err(OneRError::internal(format!(
                    "{} interval labels for {} bins",
                    labels.len(),
                    boundaries.num_bins()
                )));
            }
            let codes = values
                .iter()
                .map(|&v| (!v.is_nan()).then(|| boundaries.bin_index(v)))
                .collect();
            let factor = Factor::new(labels.clone(), codes)?;
            Ok(factor.with_discretization(Discretization::Intervals { boundaries, labels }))
        }
    }
}

/// Reject infinite values; `NaN` marks a missing value and is allowed.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<()> {
    let infinite = values.iter().filter(|v| v.is_infinite()).count();
    if infinite > 0 {
        return Err(OneRError::usage(format!(
            "numeric input contains {} infinite value(s)",
            infinite
        )));
    }
    Ok(())
}

/// Sorted non-missing values
pub(crate) fn sorted_present(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Number of distinct values in an ascending slice
pub(crate) fn count_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}
