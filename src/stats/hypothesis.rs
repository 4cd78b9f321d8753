//! Hypothesis tests consumed by the learner and the evaluator.
//!
//! - **chi-squared**: independence of a feature and the target
//! - **binomial**: one-sided exact test of an accuracy against a base rate

use crate::core::error::{OneRError, Result};
use ndarray::Array2;
use statrs::distribution::{Binomial, ChiSquared, ContinuousCDF, DiscreteCDF};

/// Result of a chi-squared independence test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredTest {
    /// Pearson statistic (Yates-corrected for 2x2 tables when requested)
    pub statistic: f64,
    /// Degrees of freedom
    pub df: usize,
    /// Upper-tail probability of the statistic
    pub p_value: f64,
}

/// Pearson chi-squared test of independence on a contingency table.
///
/// Rows and columns without observations are ignored. With `correct`, a
/// 2x2 table gets the Yates continuity correction. Tables with fewer than
/// two non-empty rows or columns have no degrees of freedom and fail with
/// [`OneRError::Numerical`].
pub fn chisq_test(table: &Array2<usize>, correct: bool) -> Result<ChiSquaredTest> {
    let rows: Vec<usize> = (0..table.nrows())
        .filter(|&i| table.row(i).sum() > 0)
        .collect();
    let cols: Vec<usize> = (0..table.ncols())
        .filter(|&j| table.column(j).sum() > 0)
        .collect();

    if rows.len() < 2 || cols.len() < 2 {
        return Err(OneRError::numerical(format!(
            "chi-squared test undefined for a {}x{} table",
            rows.len(),
            cols.len()
        )));
    }

    let total = table.sum() as f64;
    let row_sums: Vec<f64> = rows.iter().map(|&i| table.row(i).sum() as f64).collect();
    let col_sums: Vec<f64> = cols.iter().map(|&j| table.column(j).sum() as f64).collect();

    let expected = |ri: usize, ci: usize| row_sums[ri] * col_sums[ci] / total;

    let yates = if correct && rows.len() == 2 && cols.len() == 2 {
        let mut min_dev = 0.5_f64;
        for (ri, &i) in rows.iter().enumerate() {
            for (ci, &j) in cols.iter().enumerate() {
                min_dev = min_dev.min((table[[i, j]] as f64 - expected(ri, ci)).abs());
            }
        }
        min_dev
    } else {
        0.0
    };

    let mut statistic = 0.0;
    for (ri, &i) in rows.iter().enumerate() {
        for (ci, &j) in cols.iter().enumerate() {
            let e = expected(ri, ci);
            let d = (table[[i, j]] as f64 - e).abs() - yates;
            statistic += d * d / e;
        }
    }

    let df = (rows.len() - 1) * (cols.len() - 1);
    let dist = ChiSquared::new(df as f64).map_err(|e| OneRError::numerical(e.to_string()))?;
    let p_value = dist.sf(statistic);

    Ok(ChiSquaredTest {
        statistic,
        df,
        p_value,
    })
}

/// One-sided exact binomial test: `P(X >= successes)` for
/// `X ~ Binomial(trials, p)`.
pub fn binom_test_greater(successes: usize, trials: usize, p: f64) -> Result<f64> {
    if successes > trials {
        return Err(OneRError::invalid_parameter(
            "successes",
            successes.to_string(),
            format!("cannot exceed {} trials", trials),
        ));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(OneRError::invalid_parameter(
            "p",
            p.to_string(),
            "must be within [0, 1]",
        ));
    }
    if successes == 0 {
        return Ok(1.0);
    }

    let dist = Binomial::new(p, trials as u64).map_err(|e| OneRError::numerical(e.to_string()))?;
    Ok(dist.sf(successes as u64 - 1))
}
