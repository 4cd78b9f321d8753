//! Prediction pipeline.
//!
//! This module applies a trained [`Model`](crate::learner::Model) to new
//! data:
//! - class output: the majority label of each row's feature level
//! - probability output: the target distribution of that level
//!
//! Rows whose level was never observed during training are marked unseen
//! rather than guessed.

pub mod predictor;

pub use predictor::{PredictedClass, Prediction, Predictor, ProbabilityMatrix};

use crate::core::diagnostics::Diagnosed;
use crate::core::error::Result;
use crate::core::types::PredictionType;
use crate::dataset::table::Table;
use crate::learner::model::Model;

/// Predict every row of `data` with `model`.
pub fn predict(model: &Model, data: &Table, kind: PredictionType) -> Result<Diagnosed<Prediction>> {
    Predictor::new(model).predict(data, kind)
}
