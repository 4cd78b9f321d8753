//! System constants and configuration defaults.

/// Library version string.
pub const ONER_RUST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of bins for unsupervised discretization.
pub const DEFAULT_NBINS: usize = 5;

/// Label of the reserved level holding missing values when they are kept.
pub const MISSING_LABEL: &str = "NA";

/// Label used when an unseen prediction has to be rendered as text.
pub const UNSEEN_LABEL: &str = "UNSEEN";

/// Maximum number of Lloyd iterations for 1-D k-means.
pub const KMEANS_MAX_ITER: usize = 100;

/// Maximum number of Newton iterations for the logistic fit.
pub const LOGISTIC_MAX_ITER: usize = 25;

/// Convergence tolerance on the logistic deviance.
pub const LOGISTIC_TOLERANCE: f64 = 1e-8;

/// Slope magnitude, per standard deviation of the predictor, beyond which a
/// logistic fit is treated as separated.
pub const LOGISTIC_MAX_SLOPE: f64 = 30.0;

/// Deviance below which a logistic fit is treated as separated.
pub const LOGISTIC_MIN_DEVIANCE: f64 = 1e-6;

/// Information gains at or below this value count as no gain.
pub const GAIN_EPSILON: f64 = 1e-12;

/// Significant digits used when rendering interval labels.
pub const LABEL_DIGITS: usize = 3;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ONER_";
