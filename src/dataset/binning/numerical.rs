//! Unsupervised binning of numeric columns.
//!
//! This module places cut points by equal-width intervals, by empirical
//! quantiles, or by 1-D k-means clustering with deterministic seeding.

use crate::core::constants::KMEANS_MAX_ITER;
use crate::core::diagnostics::{Diagnosed, Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::BinMethod;
use crate::dataset::binning::mapper::{BinBoundaries, Discretization};
use crate::dataset::binning::{
    apply_missing_policy, count_distinct, discretize, ensure_finite, sorted_present,
    BinningConfig,
};
use crate::dataset::factor::Factor;
use crate::stats::{kmeans_1d, quantiles};

/// Numeric column binner
#[derive(Debug, Clone)]
pub struct NumericalBinner {
    /// Binning configuration
    config: BinningConfig,
}

impl NumericalBinner {
    /// Create a new numerical binner
    pub fn new(config: BinningConfig) -> Result<Self> {
        config.validate()?;
        Ok(NumericalBinner { config })
    }

    /// Binning configuration
    pub fn config(&self) -> &BinningConfig {
        &self.config
    }

    /// Discretize `values` (`NaN` = missing).
    ///
    /// A column with no more distinct values than requested bins is not
    /// binned; each distinct value becomes its own level. Infinite values
    /// are rejected.
    pub fn fit(&self, values: &[f64]) -> Result<Diagnosed<Factor>> {
        ensure_finite(values)?;
        let nbins = self.config.nbins;
        let sorted = sorted_present(values);
        let distinct = count_distinct(&sorted);
        let mut diagnostics = Diagnostics::new();

        let factor = if distinct <= nbins {
            diagnostics.push(Diagnostic::DistinctValuesAsLevels {
                column: None,
                distinct,
            });
            Factor::from_numeric(values)
        } else {
            let boundaries = self.fit_boundaries(&sorted)?;
            if boundaries.num_bins() < nbins {
                diagnostics.push(Diagnostic::BinsCollapsed {
                    column: None,
                    requested: nbins,
                    effective: boundaries.num_bins(),
                });
            }
            log::debug!(
                "{} binning into {} bins, cut points {:?}",
                self.config.method,
                boundaries.num_bins(),
                boundaries.cut_points()
            );
            let labels = boundaries.interval_labels(sorted[0], sorted[sorted.len() - 1]);
            discretize(values, Discretization::Intervals { boundaries, labels })?
        };

        let factor = match &self.config.labels {
            Some(labels) => factor.relabel(labels.clone())?,
            None => factor,
        };

        let (factor, missing) = apply_missing_policy(factor, self.config.missing)?.into_parts();
        diagnostics.extend(missing);
        Ok(Diagnosed::new(factor, diagnostics))
    }

    /// Cut points for ascending, finite `sorted` values with more distinct
    /// values than bins
    pub fn fit_boundaries(&self, sorted: &[f64]) -> Result<BinBoundaries> {
        if sorted.is_empty() {
            return Err(OneRError::usage("cannot bin an empty set of values"));
        }
        ensure_finite(sorted)?;
        if sorted.iter().any(|v| v.is_nan()) || sorted.windows(2).any(|w| w[0] > w[1]) {
            return Err(OneRError::usage("values must be sorted and non-missing"));
        }
        match self.config.method {
            BinMethod::Length => Ok(self.fit_equal_length(sorted)),
            BinMethod::Content => self.fit_equal_content(sorted),
            BinMethod::Clusters => self.fit_clusters(sorted),
        }
    }

    /// Equal-width intervals over the observed range. Empty intervals are
    /// kept so all levels have the same width.
    fn fit_equal_length(&self, sorted: &[f64]) -> BinBoundaries {
        let nbins = self.config.nbins;
        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
        let width = (max - min) / nbins as f64;
        BinBoundaries::from_candidates((1..nbins).map(|i| min + width * i as f64).collect())
    }

    /// Cut points at the `i / nbins` quantiles
    fn fit_equal_content(&self, sorted: &[f64]) -> Result<BinBoundaries> {
        let nbins = self.config.nbins;
        let probs: Vec<f64> = (1..nbins).map(|i| i as f64 / nbins as f64).collect();
        let cuts = quantiles(sorted, &probs)?;
        Ok(BinBoundaries::from_candidates(cuts).collapse_empty(sorted))
    }

    /// Midpoints between sorted k-means centers, seeded at equally spaced
    /// points across the observed range
    fn fit_clusters(&self, sorted: &[f64]) -> Result<BinBoundaries> {
        let nbins = self.config.nbins;
        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
        let step = (max - min) / (nbins - 1) as f64;
        let seeds: Vec<f64> = (0..nbins).map(|i| min + step * i as f64).collect();

        let fit = kmeans_1d(sorted, &seeds, KMEANS_MAX_ITER)?;
        if !fit.converged {
            log::debug!("k-means stopped after {} iterations", fit.iterations);
        }
        let cuts = fit.centers.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
        Ok(BinBoundaries::from_candidates(cuts).collapse_empty(sorted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MissingPolicy;
    use approx::assert_relative_eq;

    fn binner(nbins: usize, method: BinMethod) -> NumericalBinner {
        NumericalBinner::new(BinningConfig::new(nbins, method)).unwrap()
    }

    #[test]
    fn test_equal_length() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let b = binner(5, BinMethod::Length);
        let boundaries = b.fit_boundaries(&values).unwrap();
        assert_eq!(boundaries.cut_points(), &[2.0, 4.0, 6.0, 8.0]);

        let f = b.fit(&values).unwrap().into_inner();
        assert_eq!(f.levels(), &["[0,2]", "(2,4]", "(4,6]", "(6,8]", "(8,10]"]);
        assert_eq!(f.counts(), vec![3, 2, 2, 2, 2]);
    }

    #[test]
    fn test_equal_length_keeps_empty_bins() {
        let values = [0.0, 0.1, 0.2, 9.8, 9.9, 10.0];
        let f = binner(5, BinMethod::Length).fit(&values).unwrap().into_inner();
        assert_eq!(f.num_levels(), 5);
        assert_eq!(f.counts(), vec![3, 0, 0, 0, 3]);
    }

    #[test]
    fn test_equal_content() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let f = binner(4, BinMethod::Content).fit(&values).unwrap().into_inner();
        assert_eq!(f.counts(), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_equal_content_duplicate_quantiles_collapse() {
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0];
        let result = binner(3, BinMethod::Content).fit(&values).unwrap();
        let f = &result.value;
        assert!(f.num_levels() < 3);
        assert!(f.counts().iter().all(|&c| c > 0));
        assert!(result
            .diagnostics
            .any(|d| matches!(d, Diagnostic::BinsCollapsed { requested: 3, .. })));
    }

    #[test]
    fn test_clusters_two_groups() {
        let values = [1.0, 1.1, 0.9, 1.2, 10.0, 10.2, 9.9, 10.1];
        let boundaries = binner(2, BinMethod::Clusters)
            .fit_boundaries(&sorted_present(&values))
            .unwrap();
        assert_eq!(boundaries.num_bins(), 2);
        assert_relative_eq!(boundaries.cut_points()[0], 5.55, epsilon = 1e-9);
    }

    #[test]
    fn test_clusters_deterministic() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 23) as f64 * 0.7).collect();
        let b = binner(4, BinMethod::Clusters);
        let first = b.fit(&values).unwrap().into_inner();
        let second = b.fit(&values).unwrap().into_inner();
        assert_eq!(first, second);
    }

    #[test]
    fn test_few_distinct_values_become_levels() {
        let values = [3.0, 1.0, 3.0, 2.0];
        let result = binner(5, BinMethod::Length).fit(&values).unwrap();
        assert_eq!(result.value.levels(), &["1", "2", "3"]);
        assert!(result
            .diagnostics
            .any(|d| matches!(d, Diagnostic::DistinctValuesAsLevels { distinct: 3, .. })));
    }

    #[test]
    fn test_labels() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let config = BinningConfig::new(3, BinMethod::Length).with_labels(["low", "mid", "high"]);
        let f = NumericalBinner::new(config).unwrap().fit(&values).unwrap().into_inner();
        assert_eq!(f.levels(), &["low", "mid", "high"]);
        assert_eq!(f.discretization().level_for(100.0).as_deref(), Some("high"));

        let config = BinningConfig::new(3, BinMethod::Length).with_labels(["a", "b"]);
        let err = NumericalBinner::new(config).unwrap().fit(&values).unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_missing_policies() {
        let values = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
        let omit = binner(2, BinMethod::Length).fit(&values).unwrap();
        assert_eq!(omit.diagnostics.rows_removed(), 1);
        assert_eq!(omit.value.codes()[2], None);

        let config = BinningConfig::new(2, BinMethod::Length).with_missing(MissingPolicy::Keep);
        let keep = NumericalBinner::new(config).unwrap().fit(&values).unwrap();
        assert_eq!(keep.value.levels().last().map(String::as_str), Some("NA"));
        assert_eq!(keep.value.missing_count(), 0);
        assert_eq!(keep.diagnostics.rows_removed(), 0);
    }

    #[test]
    fn test_infinite_values_rejected() {
        let mut values: Vec<f64> = (1..=7).map(f64::from).collect();
        values.push(f64::INFINITY);
        for method in [BinMethod::Length, BinMethod::Content, BinMethod::Clusters] {
            let err = binner(3, method).fit(&values).unwrap_err();
            assert!(err.is_usage_error(), "{:?}: {}", method, err);
        }
    }

    #[test]
    fn test_fit_boundaries_empty_input() {
        let err = binner(3, BinMethod::Length).fit_boundaries(&[]).unwrap_err();
        assert!(err.is_usage_error());
        assert!(binner(3, BinMethod::Length)
            .fit_boundaries(&[3.0, 1.0, 2.0, 4.0])
            .unwrap_err()
            .is_usage_error());
    }
}
