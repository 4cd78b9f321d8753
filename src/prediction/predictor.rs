//! Core prediction engine.
//!
//! A [`Predictor`] borrows a trained [`Model`] and maps every row of new
//! data onto one of the model's feature levels. Numeric input is re-binned
//! with the cut points stored at training time, so values outside the
//! training range land in the extreme intervals. Levels the model has no
//! rule for are reported as [`PredictedClass::Unseen`].

use crate::core::constants::{MISSING_LABEL, UNSEEN_LABEL};
use crate::core::diagnostics::{Diagnosed, Diagnostic, Diagnostics};
use crate::core::error::Result;
use crate::core::types::PredictionType;
use crate::dataset::table::Column;
use crate::dataset::table::Table;
use crate::learner::model::Model;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted label of a single row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictedClass {
    /// Majority label of the row's level
    Label(String),
    /// The row's level was not observed during training
    Unseen,
}

impl PredictedClass {
    /// Predicted label, `None` when unseen
    pub fn label(&self) -> Option<&str> {
        match self {
            PredictedClass::Label(label) => Some(label),
            PredictedClass::Unseen => None,
        }
    }

    /// Whether the row's level was not observed during training
    pub fn is_unseen(&self) -> bool {
        matches!(self, PredictedClass::Unseen)
    }

    /// Label as text, [`UNSEEN_LABEL`] for unseen rows
    pub fn as_str(&self) -> &str {
        self.label().unwrap_or(UNSEEN_LABEL)
    }
}

impl fmt::Display for PredictedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-row target class distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    /// Target levels, one per column
    pub classes: Vec<String>,
    /// Rows x classes; unseen rows are all `NaN`
    pub values: Array2<f64>,
}

impl ProbabilityMatrix {
    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Distribution of one row
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.values.row(row).to_vec()
    }

    /// Whether the row's level was not observed during training
    pub fn is_unseen(&self, row: usize) -> bool {
        self.values.row(row).iter().all(|p| p.is_nan())
    }
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    /// One predicted class per row
    Class(Vec<PredictedClass>),
    /// One class distribution per row
    Prob(ProbabilityMatrix),
}

impl Prediction {
    /// Predicted classes, if this is a class prediction
    pub fn classes(&self) -> Option<&[PredictedClass]> {
        match self {
            Prediction::Class(classes) => Some(classes),
            Prediction::Prob(_) => None,
        }
    }

    /// Probability matrix, if this is a probability prediction
    pub fn probabilities(&self) -> Option<&ProbabilityMatrix> {
        match self {
            Prediction::Class(_) => None,
            Prediction::Prob(matrix) => Some(matrix),
        }
    }

    /// Number of predicted rows
    pub fn len(&self) -> usize {
        match self {
            Prediction::Class(classes) => classes.len(),
            Prediction::Prob(matrix) => matrix.num_rows(),
        }
    }

    /// Whether no rows were predicted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies a trained model to new data
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    model: &'a Model,
}

impl<'a> Predictor<'a> {
    /// Create a predictor for a trained model
    pub fn new(model: &'a Model) -> Self {
        Predictor { model }
    }

    /// Model used for prediction
    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Predict every row of `data`.
    ///
    /// Only the model's feature column is read; it is an error if `data`
    /// does not contain it. Unseen levels never fail: they are reported per
    /// row and summarized in an [`Diagnostic::UnseenLevels`] signal.
    pub fn predict(&self, data: &Table, kind: PredictionType) -> Result<Diagnosed<Prediction>> {
        let (levels, diagnostics) = self.levels(data)?.into_parts();
        let prediction = match kind {
            PredictionType::Class => Prediction::Class(self.classes_for(&levels)),
            PredictionType::Prob => Prediction::Prob(self.probabilities_for(&levels)),
        };
        Ok(Diagnosed::new(prediction, diagnostics))
    }

    /// Predict classes for every row of `data`
    pub fn predict_classes(&self, data: &Table) -> Result<Diagnosed<Vec<PredictedClass>>> {
        Ok(self.levels(data)?.map(|levels| self.classes_for(&levels)))
    }

    /// Feature level of every row, `None` where the model has no rule
    fn levels(&self, data: &Table) -> Result<Diagnosed<Vec<Option<usize>>>> {
        let column = data.require(self.model.feature())?;
        let contingency = self.model.contingency();

        let mut unseen: Vec<String> = Vec::new();
        let mut unseen_rows = 0;
        let levels = (0..column.len())
            .map(|row| {
                let label = self.level_label(column, row);
                let index = contingency
                    .feature_index(&label)
                    .filter(|&i| contingency.row_total(i) > 0);
                if index.is_none() {
                    unseen_rows += 1;
                    if !unseen.contains(&label) {
                        unseen.push(label);
                    }
                }
                index
            })
            .collect();

        let mut diagnostics = Diagnostics::new();
        if unseen_rows > 0 {
            diagnostics.push(Diagnostic::UnseenLevels {
                column: self.model.feature().to_string(),
                levels: unseen,
                rows: unseen_rows,
            });
        }
        Ok(Diagnosed::new(levels, diagnostics))
    }

    fn level_label(&self, column: &Column, row: usize) -> String {
        let label = match column {
            Column::Numeric(values) => self.model.discretization().level_for(values[row]),
            other => other.label_at(row),
        };
        label.unwrap_or_else(|| MISSING_LABEL.to_string())
    }

    fn classes_for(&self, levels: &[Option<usize>]) -> Vec<PredictedClass> {
        let contingency = self.model.contingency();
        let targets = contingency.target_levels();
        levels
            .iter()
            .map(|level| {
                level
                    .and_then(|i| contingency.majority(i))
                    .map(|j| PredictedClass::Label(targets[j].clone()))
                    .unwrap_or(PredictedClass::Unseen)
            })
            .collect()
    }

    fn probabilities_for(&self, levels: &[Option<usize>]) -> ProbabilityMatrix {
        let contingency = self.model.contingency();
        let classes = contingency.target_levels().to_vec();
        let mut values = Array2::from_elem((levels.len(), classes.len()), f64::NAN);
        for (row, level) in levels.iter().enumerate() {
            if let Some(i) = level {
                for (j, p) in contingency.row_proportions(*i).into_iter().enumerate() {
                    values[[row, j]] = p;
                }
            }
        }
        ProbabilityMatrix { classes, values }
    }
}
