//! Empirical quantiles of sorted data.

use crate::core::error::{OneRError, Result};

/// Quantile at probability `p` of ascending `sorted` values, interpolating
/// linearly between the order statistics at `(n - 1) * p` (the "type 7"
/// definition).
pub fn quantile(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(OneRError::usage("quantile of an empty sample"));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(OneRError::invalid_parameter(
            "p",
            p.to_string(),
            "must be within [0, 1]",
        ));
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Ok(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Quantiles at several probabilities.
pub fn quantiles(sorted: &[f64], probs: &[f64]) -> Result<Vec<f64>> {
    probs.iter().map(|&p| quantile(sorted, p)).collect()
}
