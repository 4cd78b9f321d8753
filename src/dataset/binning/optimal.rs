//! Supervised binning: cut points chosen to separate the classes of a
//! categorical target.
//!
//! For a target with `K` levels at most `K` bins are produced. Three
//! placement methods are available:
//!
//! - **naive**: midpoints between the sorted per-class means. Works well when
//!   classes are roughly normal with similar spread and poorly when their
//!   distributions overlap heavily; this is a known limitation of the method.
//! - **logreg**: decision boundaries of pairwise logistic regressions. All
//!   class pairs are fitted, and the boundaries between classes adjacent in
//!   class-mean order become cut points. A fit that fails, or whose boundary
//!   does not lie between the two class means, falls back to the midpoint of
//!   the means.
//! - **infogain**: greedy global search over midpoints between consecutive
//!   distinct values, repeatedly taking the split with the largest
//!   information gain (weighted by the share of rows in the split bin) until
//!   `K` bins exist or no split gains anything. Equal gains resolve to the
//!   lowest candidate.
//!
//! Every method ends by sorting and deduplicating its cut points and merging
//! bins that hold no observations.

use crate::core::constants::GAIN_EPSILON;
use crate::core::diagnostics::{Diagnosed, Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::{MissingPolicy, OptimalMethod};
use crate::dataset::binning::mapper::{BinBoundaries, Discretization};
use crate::dataset::binning::{apply_missing_policy, count_distinct, discretize, ensure_finite};
use crate::dataset::factor::Factor;
use crate::stats::fit_logistic;
use rayon::prelude::*;

/// Supervised binner for one method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimalBinner {
    method: OptimalMethod,
}

/// Observations of one target class
#[derive(Debug, Clone)]
struct ClassSample {
    level: usize,
    values: Vec<f64>,
    mean: f64,
}

impl OptimalBinner {
    /// Create a binner for the given method
    pub fn new(method: OptimalMethod) -> Self {
        OptimalBinner { method }
    }

    /// Placement method
    pub fn method(&self) -> OptimalMethod {
        self.method
    }

    /// Compute the discretization of `values` against `target`.
    ///
    /// Rows missing in either input are ignored. The target must have at
    /// least two levels, all observed. A column with at most `K` distinct
    /// values is left categorical. Infinite values are rejected.
    pub fn cut(&self, values: &[f64], target: &Factor) -> Result<Diagnosed<Discretization>> {
        ensure_finite(values)?;
        if values.len() != target.len() {
            return Err(OneRError::dimension_mismatch(
                format!("{} target rows", target.len()),
                format!("{} values", values.len()),
            ));
        }
        let k = target.num_levels();
        if k < 2 {
            return Err(OneRError::usage(format!(
                "target must have at least 2 levels, found {}",
                k
            )));
        }

        let mut points: Vec<(f64, usize)> = values
            .iter()
            .zip(target.codes())
            .filter_map(|(&v, &c)| match c {
                Some(c) if !v.is_nan() => Some((v, c)),
                _ => None,
            })
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let sorted: Vec<f64> = points.iter().map(|p| p.0).collect();

        let mut diagnostics = Diagnostics::new();
        let distinct = count_distinct(&sorted);
        if distinct <= k {
            diagnostics.push(Diagnostic::DistinctValuesAsLevels {
                column: None,
                distinct,
            });
            return Ok(Diagnosed::new(Discretization::Categorical, diagnostics));
        }

        let cuts = match self.method {
            OptimalMethod::Naive => naive_cuts(&class_samples(&points, k)),
            OptimalMethod::Logreg => {
                logreg_cuts(&class_samples(&points, k), target.levels(), &mut diagnostics)
            }
            OptimalMethod::Infogain => infogain_cuts(&points, k, &mut diagnostics),
        };

        let boundaries = BinBoundaries::from_candidates(cuts).collapse_empty(&sorted);
        if boundaries.num_bins() < k && self.method != OptimalMethod::Infogain {
            diagnostics.push(Diagnostic::BinsCollapsed {
                column: None,
                requested: k,
                effective: boundaries.num_bins(),
            });
        }
        log::debug!(
            "{} optimal binning: {} bins, cut points {:?}",
            self.method,
            boundaries.num_bins(),
            boundaries.cut_points()
        );

        let labels = boundaries.interval_labels(sorted[0], sorted[sorted.len() - 1]);
        Ok(Diagnosed::new(
            Discretization::Intervals { boundaries, labels },
            diagnostics,
        ))
    }

    /// Discretize `values` with cut points fitted against `target`.
    pub fn fit(
        &self,
        values: &[f64],
        target: &Factor,
        missing: MissingPolicy,
    ) -> Result<Diagnosed<Factor>> {
        let (discretization, mut diagnostics) = self.cut(values, target)?.into_parts();
        let factor = discretize(values, discretization)?;
        let (factor, missing) = apply_missing_policy(factor, missing)?.into_parts();
        diagnostics.extend(missing);
        Ok(Diagnosed::new(factor, diagnostics))
    }
}

/// Cut points of `values` that best separate the classes of `target`.
pub fn optimal_cut(
    values: &[f64],
    target: &Factor,
    method: OptimalMethod,
) -> Result<Diagnosed<Discretization>> {
    OptimalBinner::new(method).cut(values, target)
}

/// Bin `values` with [`optimal_cut`] and apply the missing value policy.
pub fn optimal_bin(
    values: &[f64],
    target: &Factor,
    method: OptimalMethod,
    missing: MissingPolicy,
) -> Result<Diagnosed<Factor>> {
    OptimalBinner::new(method).fit(values, target, missing)
}

/// Per-class samples in ascending order of their means
fn class_samples(points: &[(f64, usize)], k: usize) -> Vec<ClassSample> {
    let mut values = vec![Vec::new(); k];
    for &(v, c) in points {
        values[c].push(v);
    }
    let mut samples: Vec<ClassSample> = values
        .into_iter()
        .enumerate()
        .filter(|(_, v)| !v.is_empty())
        .map(|(level, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            ClassSample {
                level,
                values,
                mean,
            }
        })
        .collect();
    samples.sort_by(|a, b| a.mean.total_cmp(&b.mean).then(a.level.cmp(&b.level)));
    samples
}

fn naive_cuts(samples: &[ClassSample]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|w| (w[0].mean + w[1].mean) / 2.0)
        .collect()
}

fn logreg_cuts(
    samples: &[ClassSample],
    levels: &[String],
    diagnostics: &mut Diagnostics,
) -> Vec<f64> {
    let pairs: Vec<(usize, usize)> = (0..samples.len())
        .flat_map(|i| (i + 1..samples.len()).map(move |j| (i, j)))
        .collect();

    // boundaries for every pair, in pair order
    let fits: Vec<Result<f64>> = pairs
        .par_iter()
        .map(|&(i, j)| pairwise_boundary(&samples[i], &samples[j]))
        .collect();

    let mut cuts = Vec::with_capacity(samples.len().saturating_sub(1));
    for (&(i, j), fit) in pairs.iter().zip(fits) {
        let (lower, upper) = (&samples[i], &samples[j]);
        if j != i + 1 {
            if let Ok(boundary) = fit {
                log::debug!(
                    "non-adjacent boundary {} / {} at {} not used",
                    levels[lower.level],
                    levels[upper.level],
                    boundary
                );
            }
            continue;
        }
        match fit {
            Ok(boundary) => cuts.push(boundary),
            Err(e) => {
                diagnostics.push(Diagnostic::LogisticFallback {
                    lower: levels[lower.level].clone(),
                    upper: levels[upper.level].clone(),
                    reason: e.to_string(),
                });
                cuts.push((lower.mean + upper.mean) / 2.0);
            }
        }
    }
    cuts
}

/// Decision boundary of a logistic fit of "upper vs lower", required to lie
/// between the two class means.
fn pairwise_boundary(lower: &ClassSample, upper: &ClassSample) -> Result<f64> {
    let x: Vec<f64> = lower.values.iter().chain(&upper.values).copied().collect();
    let y: Vec<bool> = std::iter::repeat(false)
        .take(lower.values.len())
        .chain(std::iter::repeat(true).take(upper.values.len()))
        .collect();

    let fit = fit_logistic(&x, &y)?;
    let boundary = fit
        .decision_boundary()
        .ok_or_else(|| OneRError::numerical("fitted slope is zero"))?;
    if boundary < lower.mean || boundary > upper.mean {
        return Err(OneRError::numerical(format!(
            "boundary {} outside class means [{}, {}]",
            boundary, lower.mean, upper.mean
        )));
    }
    Ok(boundary)
}

fn entropy(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Best split of one bin: `(gain, cut point, split offset)`
fn best_split(bin: &[(f64, usize)], k: usize, total: usize) -> Option<(f64, f64, usize)> {
    let n = bin.len();
    let mut all = vec![0usize; k];
    for &(_, c) in bin {
        all[c] += 1;
    }
    let parent = entropy(&all, n);
    let weight = n as f64 / total as f64;

    let mut left = vec![0usize; k];
    let mut right = all;
    let mut best: Option<(f64, f64, usize)> = None;
    for i in 1..n {
        let c = bin[i - 1].1;
        left[c] += 1;
        right[c] -= 1;
        if bin[i - 1].0 == bin[i].0 {
            continue;
        }
        let (nl, nr) = (i as f64, (n - i) as f64);
        let children = (nl * entropy(&left, i) + nr * entropy(&right, n - i)) / n as f64;
        let gain = weight * (parent - children);
        if best.map_or(true, |(g, _, _)| gain > g + GAIN_EPSILON) {
            best = Some((gain, (bin[i - 1].0 + bin[i].0) / 2.0, i));
        }
    }
    best
}

fn infogain_cuts(points: &[(f64, usize)], k: usize, diagnostics: &mut Diagnostics) -> Vec<f64> {
    let total = points.len();
    // bins as [start, end) ranges of the sorted points, in value order
    let mut bins: Vec<(usize, usize)> = vec![(0, total)];
    let mut cuts = Vec::new();

    while bins.len() < k {
        let mut best: Option<(f64, f64, usize, usize)> = None;
        for (b, &(start, end)) in bins.iter().enumerate() {
            if let Some((gain, cut, offset)) = best_split(&points[start..end], k, total) {
                if best.map_or(true, |(g, _, _, _)| gain > g + GAIN_EPSILON) {
                    best = Some((gain, cut, b, start + offset));
                }
            }
        }
        match best {
            Some((gain, cut, b, at)) if gain > GAIN_EPSILON => {
                let (start, end) = bins[b];
                bins[b] = (start, at);
                bins.insert(b + 1, (at, end));
                cuts.push(cut);
            }
            _ => break,
        }
    }

    if bins.len() < k {
        diagnostics.push(Diagnostic::SplitSearchExhausted {
            requested: k,
            effective: bins.len(),
        });
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target(labels: &[&str]) -> Factor {
        Factor::from_labels(labels.iter().map(|l| Some(*l)))
    }

    fn three_groups() -> (Vec<f64>, Factor) {
        let values = vec![1.0, 2.0, 3.0, 11.0, 12.0, 13.0, 21.0, 22.0, 23.0];
        let y = target(&["a", "a", "a", "b", "b", "b", "c", "c", "c"]);
        (values, y)
    }

    fn cut_points(d: &Discretization) -> Vec<f64> {
        d.boundaries().map(|b| b.cut_points().to_vec()).unwrap_or_default()
    }

    #[test]
    fn test_naive_midpoints() {
        let (values, y) = three_groups();
        let d = optimal_cut(&values, &y, OptimalMethod::Naive).unwrap().into_inner();
        assert_eq!(cut_points(&d), vec![7.0, 17.0]);
    }

    #[test]
    fn test_naive_order_follows_means() {
        let values = vec![20.0, 21.0, 22.0, 1.0, 2.0, 3.0];
        let y = target(&["a", "a", "a", "b", "b", "b"]);
        let d = optimal_cut(&values, &y, OptimalMethod::Naive).unwrap().into_inner();
        assert_eq!(cut_points(&d), vec![11.5]);
    }

    #[test]
    fn test_logreg_overlapping_classes() {
        // overlapping groups keep the fit finite; symmetric data puts the
        // boundary halfway
        let values = vec![1.0, 2.0, 3.0, 4.0, 6.0, 5.0, 6.0, 7.0, 8.0, 3.0];
        let y = target(&["a", "a", "a", "a", "a", "b", "b", "b", "b", "b"]);
        let result = optimal_cut(&values, &y, OptimalMethod::Logreg).unwrap();
        let cuts = cut_points(&result.value);
        assert_eq!(cuts.len(), 1);
        assert_relative_eq!(cuts[0], 4.5, epsilon = 1e-6);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_logreg_cut_follows_data_scale() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 6.0, 5.0, 6.0, 7.0, 8.0, 3.5];
        let y = target(&["a", "a", "a", "a", "a", "b", "b", "b", "b", "b"]);
        let unit = optimal_cut(&values, &y, OptimalMethod::Logreg).unwrap();
        assert!(unit.diagnostics.is_empty());

        for scale in [1e-9, 1e6] {
            let scaled: Vec<f64> = values.iter().map(|v| v * scale).collect();
            let result = optimal_cut(&scaled, &y, OptimalMethod::Logreg).unwrap();
            assert!(result.diagnostics.is_empty(), "scale {}", scale);
            let cuts = cut_points(&result.value);
            assert_eq!(cuts.len(), 1);
            assert_relative_eq!(
                cuts[0] / scale,
                cut_points(&unit.value)[0],
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn test_logreg_separated_classes() {
        // each adjacent pair is symmetric around its midpoint, so a fitted
        // boundary and the fallback agree
        let (values, y) = three_groups();
        let result = optimal_cut(&values, &y, OptimalMethod::Logreg).unwrap();
        let cuts = cut_points(&result.value);
        assert_eq!(cuts.len(), 2);
        assert_relative_eq!(cuts[0], 7.0, epsilon = 1e-6);
        assert_relative_eq!(cuts[1], 17.0, epsilon = 1e-6);
        assert!(result
            .diagnostics
            .entries()
            .iter()
            .all(|d| matches!(d, Diagnostic::LogisticFallback { .. })));
    }

    #[test]
    fn test_infogain_pure_split() {
        let (values, y) = three_groups();
        let result = optimal_cut(&values, &y, OptimalMethod::Infogain).unwrap();
        assert_eq!(cut_points(&result.value), vec![7.0, 17.0]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_infogain_equal_first_gains() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = target(&["a", "a", "b", "b", "c", "c"]);
        let d = optimal_cut(&values, &y, OptimalMethod::Infogain).unwrap().into_inner();
        assert_eq!(cut_points(&d), vec![2.5, 4.5]);
    }

    #[test]
    fn test_infogain_stops_without_gain() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let y = Factor::with_levels(
            vec!["a".into(), "b".into(), "c".into()],
            &[Some("a"), Some("a"), Some("b"), Some("b")],
        )
        .unwrap();
        let result = optimal_cut(&values, &y, OptimalMethod::Infogain).unwrap();
        assert_eq!(cut_points(&result.value), vec![2.5]);
        assert!(result.diagnostics.any(|d| matches!(
            d,
            Diagnostic::SplitSearchExhausted {
                requested: 3,
                effective: 2
            }
        )));
    }

    #[test]
    fn test_infogain_tie_takes_lowest_candidate() {
        // splitting at 1.5 or 3.5 isolates one "b" symmetrically
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let y = target(&["b", "a", "a", "b"]);
        let d = OptimalBinner::new(OptimalMethod::Infogain)
            .cut(&values, &y)
            .unwrap()
            .into_inner();
        assert_eq!(cut_points(&d), vec![1.5]);
    }

    #[test]
    fn test_few_distinct_values_stay_categorical() {
        let values = vec![1.0, 1.0, 2.0, 2.0];
        let y = target(&["a", "b", "a", "b"]);
        let result = optimal_cut(&values, &y, OptimalMethod::Naive).unwrap();
        assert_eq!(result.value, Discretization::Categorical);
    }

    #[test]
    fn test_single_level_target_rejected() {
        let err = optimal_cut(&[1.0, 2.0, 3.0], &target(&["a", "a", "a"]), OptimalMethod::Naive)
            .unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_optimal_bin_factor() {
        let (mut values, y) = three_groups();
        values[0] = f64::NAN;
        let result = optimal_bin(&values, &y, OptimalMethod::Naive, MissingPolicy::Omit).unwrap();
        let f = result.value;
        assert_eq!(f.num_levels(), 3);
        assert_eq!(f.codes()[0], None);
        assert_eq!(f.codes()[4], Some(1));
        assert_eq!(result.diagnostics.rows_removed(), 1);
    }
}
