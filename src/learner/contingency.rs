//! Feature x target count tables.

use crate::core::error::{OneRError, Result};
use crate::dataset::factor::Factor;
use crate::stats::{chisq_test, ChiSquaredTest};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Counts of observations per (feature level, target level).
///
/// Rows follow the feature's level order and columns the target's. Rows
/// where either variable is missing are not counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    feature_levels: Vec<String>,
    target_levels: Vec<String>,
    counts: Array2<usize>,
}

impl ContingencyTable {
    /// Cross-tabulate a feature against the target
    pub fn from_factors(feature: &Factor, target: &Factor) -> Result<Self> {
        if feature.len() != target.len() {
            return Err(OneRError::dimension_mismatch(
                format!("{} target rows", target.len()),
                format!("{} feature rows", feature.len()),
            ));
        }
        let mut counts = Array2::zeros((feature.num_levels(), target.num_levels()));
        for (f, t) in feature.codes().iter().zip(target.codes()) {
            if let (Some(f), Some(t)) = (f, t) {
                counts[[*f, *t]] += 1;
            }
        }
        Ok(ContingencyTable {
            feature_levels: feature.levels().to_vec(),
            target_levels: target.levels().to_vec(),
            counts,
        })
    }

    /// Feature levels (rows)
    pub fn feature_levels(&self) -> &[String] {
        &self.feature_levels
    }

    /// Target levels (columns)
    pub fn target_levels(&self) -> &[String] {
        &self.target_levels
    }

    /// Raw counts
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Observations with feature level `row`
    pub fn row_total(&self, row: usize) -> usize {
        self.counts.row(row).sum()
    }

    /// Number of counted observations
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Index of the most frequent target level for feature level `row`.
    ///
    /// Equal counts resolve to the target level that comes first in level
    /// order. `None` for a level without observations.
    pub fn majority(&self, row: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (j, &count) in self.counts.row(row).iter().enumerate() {
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((j, count));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Observations the per-level majority vote classifies correctly
    pub fn correct(&self) -> usize {
        (0..self.counts.nrows())
            .filter_map(|i| self.majority(i).map(|j| self.counts[[i, j]]))
            .sum()
    }

    /// Target distribution within feature level `row`; `NaN` entries for a
    /// level without observations
    pub fn row_proportions(&self, row: usize) -> Vec<f64> {
        let total = self.row_total(row);
        self.counts
            .row(row)
            .iter()
            .map(|&c| {
                if total == 0 {
                    f64::NAN
                } else {
                    c as f64 / total as f64
                }
            })
            .collect()
    }

    /// Row of a feature level label
    pub fn feature_index(&self, level: &str) -> Option<usize> {
        self.feature_levels.iter().position(|l| l == level)
    }

    /// Pearson chi-squared test of independence
    pub fn chisq_test(&self, correct: bool) -> Result<ChiSquaredTest> {
        chisq_test(&self.counts, correct)
    }
}
