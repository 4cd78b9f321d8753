//! Confusion-matrix based evaluation of class predictions.
//!
//! Predictions and actual labels are compared over the union of their level
//! sets, so a class that only one side mentions still gets its own (zero)
//! row and column. Accuracy is reported together with the base rate, the
//! accuracy of always predicting the most frequent actual class, and the
//! relative error-rate reduction against it. A negative reduction means the
//! predictions do worse than the base rate; it is a result, not an error.

use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::ensure;
use crate::stats::binom_test_greater;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Evaluation of class predictions against actual labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Sorted union of predicted and actual labels
    pub levels: Vec<String>,
    /// Counts, rows = prediction, columns = actual; the last row and column
    /// hold the margins
    pub confusion: Array2<usize>,
    /// `confusion` divided by the number of evaluated rows
    pub confusion_prop: Array2<f64>,
    /// Rows where prediction equals actual
    pub correct: usize,
    /// Evaluated rows
    pub total: usize,
    /// `correct / total`
    pub accuracy: f64,
    /// `1 - accuracy`
    pub error_rate: f64,
    /// Accuracy of always predicting the most frequent actual label
    pub base_rate: f64,
    /// `(accuracy - base_rate) / (1 - base_rate)`; `None` when the base rate
    /// is 1
    pub error_rate_reduction: Option<f64>,
    /// One-sided exact binomial p-value of the accuracy exceeding the base
    /// rate by chance
    pub p_value: f64,
    /// Signals raised while evaluating
    pub diagnostics: Diagnostics,
}

impl Evaluation {
    /// Count of rows predicted as `predicted` whose actual label is `actual`
    pub fn count(&self, predicted: &str, actual: &str) -> Option<usize> {
        let i = self.levels.iter().position(|l| l == predicted)?;
        let j = self.levels.iter().position(|l| l == actual)?;
        Some(self.confusion[[i, j]])
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .levels
            .iter()
            .map(String::len)
            .chain([6, self.total.to_string().len()])
            .max()
            .unwrap_or(6);

        writeln!(f, "Confusion matrix (absolute):")?;
        write!(f, "{:>w$}", "pred", w = width)?;
        for level in self.levels.iter().map(String::as_str).chain(["Sum"]) {
            write!(f, " {:>w$}", level, w = width)?;
        }
        writeln!(f)?;
        for (i, row) in self.confusion.outer_iter().enumerate() {
            let name = self.levels.get(i).map_or("Sum", String::as_str);
            write!(f, "{:>w$}", name, w = width)?;
            for count in row {
                write!(f, " {:>w$}", count, w = width)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Accuracy: {:.4} ({}/{} instances classified correctly)",
            self.accuracy, self.correct, self.total
        )?;
        writeln!(f, "Error rate: {:.4}", self.error_rate)?;
        match self.error_rate_reduction {
            Some(err) => writeln!(
                f,
                "Error rate reduction (vs. base rate): {:.4}",
                err
            )?,
            None => writeln!(f, "Error rate reduction (vs. base rate): undefined")?,
        }
        write!(f, "p-value: {:.4e}", self.p_value)
    }
}

/// Evaluate predictions against actual labels.
///
/// Both slices must have the same length. A missing prediction is an error;
/// rows with a missing actual label are dropped and reported.
pub fn eval_model<P, A>(predictions: &[Option<P>], actual: &[Option<A>]) -> Result<Evaluation>
where
    P: AsRef<str>,
    A: AsRef<str>,
{
    if predictions.len() != actual.len() {
        return Err(OneRError::usage(format!(
            "predictions and actual values must have the same length, got {} and {}",
            predictions.len(),
            actual.len()
        )));
    }
    let missing = predictions.iter().filter(|p| p.is_none()).count();
    ensure!(
        missing == 0,
        OneRError::missing_values(format!("{} prediction(s) are missing", missing))
    );

    let mut diagnostics = Diagnostics::new();
    let pairs: Vec<(&str, &str)> = predictions
        .iter()
        .zip(actual)
        .filter_map(|(p, a)| match (p, a) {
            (Some(p), Some(a)) => Some((p.as_ref(), a.as_ref())),
            _ => None,
        })
        .collect();
    let removed = predictions.len() - pairs.len();
    if removed > 0 {
        diagnostics.push(Diagnostic::RowsRemoved {
            column: None,
            count: removed,
        });
    }
    ensure!(
        !pairs.is_empty(),
        OneRError::usage("no rows with an actual value to evaluate")
    );

    let levels: Vec<String> = pairs
        .iter()
        .flat_map(|&(p, a)| [p, a])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let index = |label: &str| levels.binary_search_by(|l| l.as_str().cmp(label));

    let k = levels.len();
    let mut confusion = Array2::<usize>::zeros((k + 1, k + 1));
    for &(p, a) in &pairs {
        if let (Ok(i), Ok(j)) = (index(p), index(a)) {
            confusion[[i, j]] += 1;
            confusion[[i, k]] += 1;
            confusion[[k, j]] += 1;
            confusion[[k, k]] += 1;
        }
    }

    let total = pairs.len();
    let n = total as f64;
    let confusion_prop = confusion.mapv(|c| c as f64 / n);
    let correct = (0..k).map(|i| confusion[[i, i]]).sum::<usize>();
    let accuracy = correct as f64 / n;
    let base_count = (0..k).map(|j| confusion[[k, j]]).max().unwrap_or(0);
    let base_rate = base_count as f64 / n;
    let error_rate_reduction = if base_rate < 1.0 {
        Some((accuracy - base_rate) / (1.0 - base_rate))
    } else {
        None
    };
    let p_value = binom_test_greater(correct, total, base_rate)?;

    log::debug!(
        "Evaluated {} rows: accuracy {:.4}, base rate {:.4}",
        total,
        accuracy,
        base_rate
    );

    Ok(Evaluation {
        levels,
        confusion,
        confusion_prop,
        correct,
        total,
        accuracy,
        error_rate: 1.0 - accuracy,
        base_rate,
        error_rate_reduction,
        p_value,
        diagnostics,
    })
}
