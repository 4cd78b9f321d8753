//! Core enumerations shared across the crate.
//!
//! Each enumeration parses from and renders to the lowercase names used in
//! configuration files and environment variables.

use crate::core::error::{OneRError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unsupervised discretization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinMethod {
    /// Equal-width intervals over the observed range
    Length,
    /// Equal-frequency intervals at empirical quantiles
    Content,
    /// Boundaries halfway between 1-D k-means centers
    Clusters,
}

impl Default for BinMethod {
    fn default() -> Self {
        BinMethod::Length
    }
}

impl fmt::Display for BinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinMethod::Length => write!(f, "length"),
            BinMethod::Content => write!(f, "content"),
            BinMethod::Clusters => write!(f, "clusters"),
        }
    }
}

impl FromStr for BinMethod {
    type Err = OneRError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" | "equal_length" => Ok(BinMethod::Length),
            "content" | "equal_content" => Ok(BinMethod::Content),
            "clusters" | "cluster" => Ok(BinMethod::Clusters),
            other => Err(OneRError::invalid_parameter(
                "bin_method",
                other,
                "expected one of length, content, clusters",
            )),
        }
    }
}

/// Supervised (target-aware) discretization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimalMethod {
    /// Pairwise logistic-regression decision boundaries
    Logreg,
    /// Greedy entropy-reduction splits
    Infogain,
    /// Midpoints between sorted class means
    Naive,
}

impl Default for OptimalMethod {
    fn default() -> Self {
        OptimalMethod::Logreg
    }
}

impl fmt::Display for OptimalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimalMethod::Logreg => write!(f, "logreg"),
            OptimalMethod::Infogain => write!(f, "infogain"),
            OptimalMethod::Naive => write!(f, "naive"),
        }
    }
}

impl FromStr for OptimalMethod {
    type Err = OneRError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logreg" => Ok(OptimalMethod::Logreg),
            "infogain" => Ok(OptimalMethod::Infogain),
            "naive" => Ok(OptimalMethod::Naive),
            other => Err(OneRError::invalid_parameter(
                "optimal_method",
                other,
                "expected one of logreg, infogain, naive",
            )),
        }
    }
}

/// Missing value policy for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Exclude rows with missing values and report how many were removed
    Omit,
    /// Keep missing values as a reserved `NA` level
    Keep,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        MissingPolicy::Omit
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Omit => write!(f, "omit"),
            MissingPolicy::Keep => write!(f, "keep"),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = OneRError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(MissingPolicy::Omit),
            "keep" => Ok(MissingPolicy::Keep),
            other => Err(OneRError::invalid_parameter(
                "missing",
                other,
                "expected omit or keep",
            )),
        }
    }
}

/// Policy for choosing among features with equal training accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiesMethod {
    /// Leftmost tied feature in column order
    First,
    /// Tied feature with the smallest chi-squared p-value
    Chisq,
}

impl Default for TiesMethod {
    fn default() -> Self {
        TiesMethod::First
    }
}

impl fmt::Display for TiesMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiesMethod::First => write!(f, "first"),
            TiesMethod::Chisq => write!(f, "chisq"),
        }
    }
}

impl FromStr for TiesMethod {
    type Err = OneRError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(TiesMethod::First),
            "chisq" => Ok(TiesMethod::Chisq),
            other => Err(OneRError::invalid_parameter(
                "ties_method",
                other,
                "expected first or chisq",
            )),
        }
    }
}

/// Output requested from the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionType {
    /// Majority label per row
    Class,
    /// Target class distribution per row
    Prob,
}

impl Default for PredictionType {
    fn default() -> Self {
        PredictionType::Class
    }
}

impl fmt::Display for PredictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionType::Class => write!(f, "class"),
            PredictionType::Prob => write!(f, "prob"),
        }
    }
}
