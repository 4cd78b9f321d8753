//! Cut points and the value-to-bin mapping they define.
//!
//! `k - 1` strictly increasing cut points partition the real line into the
//! half-open intervals `(-Inf, c1], (c1, c2], ..., (c_{k-1}, Inf)`. The
//! outer intervals are open-ended, so a value outside the training range
//! lands in the nearest extreme bin instead of being rejected.

use crate::core::constants::LABEL_DIGITS;
use crate::core::error::{OneRError, Result};
use crate::dataset::factor::format_value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, strictly increasing cut points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinBoundaries {
    cut_points: Vec<f64>,
}

impl BinBoundaries {
    /// Validate already sorted, unique, finite cut points.
    pub fn new(cut_points: Vec<f64>) -> Result<Self> {
        if cut_points.iter().any(|c| !c.is_finite()) {
            return Err(OneRError::usage("cut points must be finite"));
        }
        if cut_points.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OneRError::usage("cut points must be strictly increasing"));
        }
        Ok(BinBoundaries { cut_points })
    }

    /// Sort and deduplicate candidate cut points, dropping non-finite ones.
    pub fn from_candidates(mut candidates: Vec<f64>) -> Self {
        candidates.retain(|c| c.is_finite());
        candidates.sort_by(|a, b| a.total_cmp(b));
        candidates.dedup();
        BinBoundaries {
            cut_points: candidates,
        }
    }

    /// The cut points
    pub fn cut_points(&self) -> &[f64] {
        &self.cut_points
    }

    /// Number of intervals (cut points + 1)
    pub fn num_bins(&self) -> usize {
        self.cut_points.len() + 1
    }

    /// Index of the interval holding `value`: the number of cut points
    /// strictly below it.
    pub fn bin_index(&self, value: f64) -> usize {
        self.cut_points.partition_point(|&c| c < value)
    }

    /// Observations per interval for ascending `sorted` values
    pub fn bin_counts(&self, sorted: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; self.num_bins()];
        for &v in sorted {
            counts[self.bin_index(v)] += 1;
        }
        counts
    }

    /// Remove cut points until every interval holds at least one of the
    /// observed values. An empty interval merges into its left neighbour,
    /// or into its right neighbour when it is the first one.
    pub fn collapse_empty(mut self, sorted: &[f64]) -> Self {
        if sorted.is_empty() {
            return self;
        }
        loop {
            let counts = self.bin_counts(sorted);
            match counts.iter().position(|&c| c == 0) {
                Some(0) => {
                    self.cut_points.remove(0);
                }
                Some(i) => {
                    self.cut_points.remove(i - 1);
                }
                None => return self,
            }
        }
    }

    /// Interval labels in the `(a,b]` notation, with the first interval
    /// closed at the observed minimum. Bounds are shown with three
    /// significant digits, more when needed to keep labels distinct.
    pub fn interval_labels(&self, min: f64, max: f64) -> Vec<String> {
        let mut bounds = Vec::with_capacity(self.cut_points.len() + 2);
        bounds.push(min.min(self.cut_points.first().copied().unwrap_or(min)));
        bounds.extend_from_slice(&self.cut_points);
        bounds.push(max.max(self.cut_points.last().copied().unwrap_or(max)));

        let mut digits = LABEL_DIGITS;
        loop {
            let labels: Vec<String> = bounds
                .windows(2)
                .enumerate()
                .map(|(i, w)| {
                    let open = if i == 0 { '[' } else { '(' };
                    format!(
                        "{}{},{}]",
                        open,
                        format_significant(w[0], digits),
                        format_significant(w[1], digits)
                    )
                })
                .collect();
            let unique: HashSet<&String> = labels.iter().collect();
            if unique.len() == labels.len() || digits >= 15 {
                return labels;
            }
            digits += 1;
        }
    }
}

/// Round to `digits` significant digits and render without trailing zeros.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format_value(value);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = digits as i32 - 1 - magnitude;
    if decimals > 0 {
        let s = format!("{:.*}", decimals as usize, value);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    } else {
        let scale = 10f64.powi(-decimals);
        format_value((value / scale).round() * scale)
    }
}

/// How a categorical variable relates to the numeric column it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Discretization {
    /// Levels are labels (or distinct numeric values rendered as labels)
    Categorical,
    /// Levels are the intervals defined by `boundaries`, one label per
    /// interval
    Intervals {
        /// Cut points fixed at training time
        boundaries: BinBoundaries,
        /// Label of each interval, `boundaries.num_bins()` entries
        labels: Vec<String>,
    },
}

impl Discretization {
    /// Level label for a numeric value: its interval label, or the value
    /// itself for categorical discretization. `None` for missing values.
    pub fn level_for(&self, value: f64) -> Option<String> {
        if value.is_nan() {
            return None;
        }
        match self {
            Discretization::Categorical => Some(format_value(value)),
            Discretization::Intervals { boundaries, labels } => {
                labels.get(boundaries.bin_index(value)).cloned()
            }
        }
    }

    /// Stored cut points, if any
    pub fn boundaries(&self) -> Option<&BinBoundaries> {
        match self {
            Discretization::Categorical => None,
            Discretization::Intervals { boundaries, .. } => Some(boundaries),
        }
    }

    /// Rename interval labels following an `old -> new` level renaming.
    pub(crate) fn relabel(self, old: &[String], new: &[String]) -> Self {
        match self {
            Discretization::Categorical => Discretization::Categorical,
            Discretization::Intervals { boundaries, labels } => {
                let labels = labels
                    .into_iter()
                    .map(|l| match old.iter().position(|o| *o == l) {
                        Some(i) => new[i].clone(),
                        None => l,
                    })
                    .collect();
                Discretization::Intervals { boundaries, labels }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_index_right_closed() {
        let b = BinBoundaries::new(vec![1.0, 2.0]).unwrap();
        assert_eq!(b.num_bins(), 3);
        assert_eq!(b.bin_index(-100.0), 0);
        assert_eq!(b.bin_index(1.0), 0);
        assert_eq!(b.bin_index(1.5), 1);
        assert_eq!(b.bin_index(2.0), 1);
        assert_eq!(b.bin_index(2.0001), 2);
        assert_eq!(b.bin_index(1e9), 2);
    }

    #[test]
    fn test_new_rejects_unsorted() {
        assert!(BinBoundaries::new(vec![2.0, 1.0]).is_err());
        assert!(BinBoundaries::new(vec![1.0, 1.0]).is_err());
        assert!(BinBoundaries::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_from_candidates_dedups() {
        let b = BinBoundaries::from_candidates(vec![3.0, 1.0, 3.0, f64::INFINITY]);
        assert_eq!(b.cut_points(), &[1.0, 3.0]);
    }

    #[test]
    fn test_collapse_empty() {
        let sorted = [1.0, 1.0, 5.0, 6.0];
        let b = BinBoundaries::new(vec![0.0, 2.0, 3.0, 5.5]).unwrap();
        let b = b.collapse_empty(&sorted);
        assert_eq!(b.bin_counts(&sorted), vec![2, 1, 1]);
        assert_eq!(b.cut_points(), &[3.0, 5.5]);
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(1.23456, 3), "1.23");
        assert_eq!(format_significant(12345.0, 3), "12300");
        assert_eq!(format_significant(0.000123456, 3), "0.000123");
        assert_eq!(format_significant(2.0, 3), "2");
        assert_eq!(format_significant(-4.56, 2), "-4.6");
    }

    #[test]
    fn test_interval_labels_unique() {
        let b = BinBoundaries::new(vec![1.0001, 1.0002]).unwrap();
        let labels = b.interval_labels(1.0, 1.0003);
        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(labels[0].starts_with('['));
        assert!(labels[1].starts_with('('));
    }

    #[test]
    fn test_level_for() {
        let b = BinBoundaries::new(vec![2.0]).unwrap();
        let d = Discretization::Intervals {
            labels: b.interval_labels(1.0, 3.0),
            boundaries: b,
        };
        assert_eq!(d.level_for(0.0).as_deref(), Some("[1,2]"));
        assert_eq!(d.level_for(7.0).as_deref(), Some("(2,3]"));
        assert_eq!(d.level_for(f64::NAN), None);
        assert_eq!(Discretization::Categorical.level_for(3.0).as_deref(), Some("3"));
    }
}
