//! The trained one-rule model.

use crate::core::diagnostics::{Diagnosed, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::PredictionType;
use crate::dataset::binning::mapper::Discretization;
use crate::dataset::table::Table;
use crate::learner::contingency::ContingencyTable;
use crate::metrics::classification::{eval_model, Evaluation};
use crate::prediction::predictor::{Prediction, Predictor};
use crate::stats::ChiSquaredTest;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Majority-vote rule for one level of the chosen feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Feature level
    pub level: String,
    /// Predicted target label
    pub prediction: String,
    /// Training rows of this level whose target equals the prediction
    pub correct: usize,
    /// Training rows of this level
    pub total: usize,
}

/// Accuracy of one candidate feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// 1-based rank; equal accuracies keep column order
    pub rank: usize,
    /// Feature name
    pub feature: String,
    /// Correctly classified training rows
    pub correct: usize,
    /// `correct / total` over training rows
    pub accuracy: f64,
}

/// One-rule classifier.
///
/// Holds everything needed to predict from the chosen feature: its rules,
/// the discretization applied at training time, and the full contingency
/// table. A model is never modified after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    target: String,
    feature: String,
    rules: Vec<Rule>,
    contingency: ContingencyTable,
    discretization: Discretization,
    correct: usize,
    total: usize,
    ranking: Vec<FeatureScore>,
    diagnostics: Diagnostics,
}

impl Model {
    pub(crate) fn new(
        target: String,
        feature: String,
        contingency: ContingencyTable,
        discretization: Discretization,
        total: usize,
        ranking: Vec<FeatureScore>,
        diagnostics: Diagnostics,
    ) -> Self {
        let target_levels = contingency.target_levels();
        let rules = contingency
            .feature_levels()
            .iter()
            .enumerate()
            .filter_map(|(i, level)| {
                contingency.majority(i).map(|j| Rule {
                    level: level.clone(),
                    prediction: target_levels[j].clone(),
                    correct: contingency.counts()[[i, j]],
                    total: contingency.row_total(i),
                })
            })
            .collect();
        let correct = contingency.correct();
        Model {
            target,
            feature,
            rules,
            contingency,
            discretization,
            correct,
            total,
            ranking,
            diagnostics,
        }
    }

    /// Target column name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Chosen feature name
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Rules in feature level order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Predicted label for a feature level, `None` if the level was not
    /// observed during training
    pub fn rule_for(&self, level: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.level == level)
            .map(|r| r.prediction.as_str())
    }

    /// Feature x target counts of the training data
    pub fn contingency(&self) -> &ContingencyTable {
        &self.contingency
    }

    /// Target levels in order
    pub fn target_levels(&self) -> &[String] {
        self.contingency.target_levels()
    }

    /// Discretization applied to the feature during training
    pub fn discretization(&self) -> &Discretization {
        &self.discretization
    }

    /// Correctly classified training rows
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Training rows
    pub fn total(&self) -> usize {
        self.total
    }

    /// Training accuracy
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    /// Every candidate feature ranked by descending accuracy
    pub fn feature_ranking(&self) -> &[FeatureScore] {
        &self.ranking
    }

    /// Signals raised during preprocessing and training
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Chi-squared test of the chosen feature against the target, with the
    /// continuity correction for 2x2 tables
    pub fn chisq_test(&self) -> Result<ChiSquaredTest> {
        self.contingency.chisq_test(true)
    }

    /// Predict for every row of `data`
    pub fn predict(&self, data: &Table, kind: PredictionType) -> Result<Diagnosed<Prediction>> {
        Predictor::new(self).predict(data, kind)
    }

    /// Predict classes for `data` and evaluate them against its target
    /// column
    pub fn evaluate(&self, data: &Table) -> Result<Evaluation> {
        let actual = data.require(&self.target)?;
        let predicted = Predictor::new(self).predict_classes(data)?.into_inner();
        let predicted: Vec<Option<&str>> = predicted.iter().map(|p| Some(p.as_str())).collect();
        let actual: Vec<Option<String>> = (0..actual.len()).map(|r| actual.label_at(r)).collect();
        eval_model(&predicted, &actual)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save as `.json`, or as binary with a `.bin` / `.bincode` extension
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => std::fs::write(path, self.to_json()?)?,
            Some("bin") | Some("bincode") => {
                let writer = BufWriter::new(File::create(path)?);
                bincode::serialize_into(writer, self)?;
            }
            _ => {
                return Err(OneRError::config(
                    "Unsupported model file format. Use .json, .bin or .bincode",
                ))
            }
        }
        log::info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Load a model written by [`Model::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json(&std::fs::read_to_string(path)?),
            Some("bin") | Some("bincode") => {
                let reader = BufReader::new(File::open(path)?);
                Ok(bincode::deserialize_from(reader)?)
            }
            _ => Err(OneRError::config(
                "Unsupported model file format. Use .json, .bin or .bincode",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::factor::Factor;

    fn model() -> Model {
        let x = Factor::from_labels(["1", "1", "1", "2", "2", "2"].iter().map(|s| Some(*s)));
        let y = Factor::from_labels(["A", "A", "B", "B", "B", "B"].iter().map(|s| Some(*s)));
        let contingency = ContingencyTable::from_factors(&x, &y).unwrap();
        Model::new(
            "y".into(),
            "x".into(),
            contingency,
            Discretization::Categorical,
            6,
            Vec::new(),
            Diagnostics::new(),
        )
    }

    #[test]
    fn test_rules() {
        let m = model();
        assert_eq!(m.rules().len(), 2);
        assert_eq!(m.rule_for("1"), Some("A"));
        assert_eq!(m.rule_for("2"), Some("B"));
        assert_eq!(m.rule_for("3"), None);
        assert_eq!(m.rules()[0].correct, 2);
        assert_eq!(m.rules()[0].total, 3);
        assert_eq!(m.correct(), 5);
        assert!((m.accuracy() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip() {
        let m = model();
        let restored = Model::from_json(&m.to_json().unwrap()).unwrap();
        assert_eq!(restored, m);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert!(model().save_to_file(dir.path().join("model.txt")).is_err());
    }
}
