//! Statistical primitives consumed by the binners, the learner and the
//! evaluator: quantiles, 1-D k-means, single-predictor logistic regression
//! and the chi-squared / binomial tests.

pub mod hypothesis;
pub mod kmeans;
pub mod logistic;
pub mod quantile;

pub use hypothesis::{binom_test_greater, chisq_test, ChiSquaredTest};
pub use kmeans::{kmeans_1d, KMeansFit};
pub use logistic::{fit_logistic, fit_logistic_with, LogisticFit};
pub use quantile::{quantile, quantiles};
