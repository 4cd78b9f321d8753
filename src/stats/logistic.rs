//! Binary logistic regression on a single predictor.
//!
//! The fit is an IRLS (Newton-Raphson) iteration on a standardized copy of
//! the predictor; coefficients are mapped back to the original scale. Only
//! the fitted coefficients are consumed downstream, as a decision boundary.

use crate::core::constants::{
    LOGISTIC_MAX_ITER, LOGISTIC_MAX_SLOPE, LOGISTIC_MIN_DEVIANCE, LOGISTIC_TOLERANCE,
};
use crate::core::error::{OneRError, Result};

/// Coefficients of `P(y = 1 | x) = 1 / (1 + exp(-(intercept + slope * x)))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticFit {
    /// Intercept on the original scale
    pub intercept: f64,
    /// Slope on the original scale
    pub slope: f64,
    /// Newton iterations performed
    pub iterations: usize,
}

impl LogisticFit {
    /// The `x` where the predicted probability is 0.5, if the slope is
    /// non-zero.
    pub fn decision_boundary(&self) -> Option<f64> {
        if self.slope == 0.0 || !self.slope.is_finite() {
            return None;
        }
        let boundary = -self.intercept / self.slope;
        boundary.is_finite().then_some(boundary)
    }

    /// Predicted probability of the positive class at `x`
    pub fn probability(&self, x: f64) -> f64 {
        sigmoid(self.intercept + self.slope * x)
    }
}

/// Fit with the default iteration budget and tolerance.
pub fn fit_logistic(x: &[f64], y: &[bool]) -> Result<LogisticFit> {
    fit_logistic_with(x, y, LOGISTIC_MAX_ITER, LOGISTIC_TOLERANCE)
}

/// Fit with an explicit iteration budget and relative deviance tolerance.
///
/// Fails with [`OneRError::Numerical`] when the iteration does not
/// converge, the Hessian becomes singular, or the classes are separated.
/// Separation is judged on the standardized predictor, so the outcome does
/// not depend on the scale of `x`.
pub fn fit_logistic_with(
    x: &[f64],
    y: &[bool],
    max_iter: usize,
    tolerance: f64,
) -> Result<LogisticFit> {
    if x.len() != y.len() {
        return Err(OneRError::dimension_mismatch(
            format!("{} responses", x.len()),
            format!("{} responses", y.len()),
        ));
    }
    let n = x.len();
    let positives = y.iter().filter(|&&v| v).count();
    if n < 2 || positives == 0 || positives == n {
        return Err(OneRError::numerical(
            "logistic fit needs observations of both classes",
        ));
    }

    let mean = x.iter().sum::<f64>() / n as f64;
    let sd = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt();
    if !sd.is_finite() || sd == 0.0 {
        return Err(OneRError::numerical("predictor has no variance"));
    }
    let z: Vec<f64> = x.iter().map(|v| (v - mean) / sd).collect();

    let rate = (positives as f64 / n as f64).clamp(1e-6, 1.0 - 1e-6);
    let mut b0 = (rate / (1.0 - rate)).ln();
    let mut b1 = 0.0;
    let mut deviance_old = deviance(&z, y, b0, b1);

    for iteration in 1..=max_iter {
        let (mut g0, mut g1) = (0.0, 0.0);
        let (mut h00, mut h01, mut h11) = (0.0, 0.0, 0.0);
        for (&zi, &yi) in z.iter().zip(y) {
            let p = sigmoid(b0 + b1 * zi);
            let w = p * (1.0 - p);
            let r = if yi { 1.0 - p } else { -p };
            g0 += r;
            g1 += r * zi;
            h00 += w;
            h01 += w * zi;
            h11 += w * zi * zi;
        }

        let det = h00 * h11 - h01 * h01;
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(OneRError::numerical("singular information matrix"));
        }
        b0 += (h11 * g0 - h01 * g1) / det;
        b1 += (h00 * g1 - h01 * g0) / det;

        if !b0.is_finite() || !b1.is_finite() || b1.abs() > LOGISTIC_MAX_SLOPE {
            return Err(OneRError::numerical("coefficients diverged (separated classes)"));
        }

        let deviance_new = deviance(&z, y, b0, b1);
        if deviance_new < LOGISTIC_MIN_DEVIANCE {
            return Err(OneRError::numerical("deviance vanished (separated classes)"));
        }
        if (deviance_new - deviance_old).abs() / (deviance_new.abs() + 0.1) < tolerance {
            let slope = b1 / sd;
            return Ok(LogisticFit {
                intercept: b0 - slope * mean,
                slope,
                iterations: iteration,
            });
        }
        deviance_old = deviance_new;
    }

    Err(OneRError::numerical(format!(
        "logistic fit did not converge in {} iterations",
        max_iter
    )))
}

fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

fn deviance(z: &[f64], y: &[bool], b0: f64, b1: f64) -> f64 {
    const EPS: f64 = 1e-15;
    -2.0 * z
        .iter()
        .zip(y)
        .map(|(&zi, &yi)| {
            let p = sigmoid(b0 + b1 * zi).clamp(EPS, 1.0 - EPS);
            if yi {
                p.ln()
            } else {
                (1.0 - p).ln()
            }
        })
        .sum::<f64>()
}
