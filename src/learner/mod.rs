//! The one-rule learner.
//!
//! For every candidate feature the learner cross-tabulates the feature's
//! levels against the target, predicts the most frequent target label
//! within each level, and counts how many training rows that majority vote
//! gets right. The feature with the highest count wins. When several
//! features share the highest count, [`TiesMethod`] decides:
//!
//! - `First`: the leftmost feature in column order
//! - `Chisq`: the feature whose chi-squared test against the target has the
//!   smallest p-value; when no tied feature can be tested, falls back to
//!   `First` and records a [`Diagnostic::TieBreakFallback`]
//!
//! Feature scoring runs in parallel; results are merged in column order so
//! the outcome does not depend on scheduling.

pub mod contingency;
pub mod model;

pub use contingency::ContingencyTable;
pub use model::{FeatureScore, Model, Rule};

use crate::config::OneRConfig;
use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::TiesMethod;
use crate::dataset::factor::Factor;
use crate::dataset::preprocessing::DatasetPreprocessor;
use crate::dataset::table::{Column, Table};
use rayon::prelude::*;

/// Rule learner
#[derive(Debug, Clone, Default)]
pub struct RuleLearner {
    config: OneRConfig,
}

impl RuleLearner {
    /// Create a learner, validating the configuration
    pub fn new(config: OneRConfig) -> Result<Self> {
        config.validate()?;
        Ok(RuleLearner { config })
    }

    /// Learner configuration
    pub fn config(&self) -> &OneRConfig {
        &self.config
    }

    /// Preprocess a raw table and learn from it.
    ///
    /// `target` names the target column; the last column is used when
    /// `None`. The returned model carries the preprocessing diagnostics.
    pub fn fit(&self, data: &Table, target: Option<&str>) -> Result<Model> {
        let preprocessor = DatasetPreprocessor::new(self.config.preprocessing.clone())?;
        let (table, diagnostics) = preprocessor.preprocess(data, target)?.into_parts();
        self.learn_with(&table, diagnostics)
    }

    /// Learn from an already discretized table whose last column is the
    /// target. Non-categorical columns are read as one level per distinct
    /// value.
    pub fn learn(&self, table: &Table) -> Result<Model> {
        self.learn_with(table, Diagnostics::new())
    }

    fn learn_with(&self, table: &Table, mut diagnostics: Diagnostics) -> Result<Model> {
        if table.num_columns() < 2 {
            return Err(OneRError::usage(format!(
                "data must have at least two columns, found {}",
                table.num_columns()
            )));
        }

        let factors: Vec<(&str, Factor)> = table
            .iter()
            .map(|(name, column)| (name, as_factor(column)))
            .collect();
        let (features, target) = factors.split_at(factors.len() - 1);
        let (target_name, target) = &target[0];

        let observed_levels = target.counts().iter().filter(|&&c| c > 0).count();
        if observed_levels < 2 {
            return Err(OneRError::usage(format!(
                "target '{}' must have at least 2 levels, found {}",
                target_name, observed_levels
            )));
        }
        let total = target.len() - target.missing_count();

        let tables: Vec<ContingencyTable> = features
            .par_iter()
            .map(|(_, factor)| ContingencyTable::from_factors(factor, target))
            .collect::<Result<Vec<_>>>()?;
        let scores: Vec<usize> = tables.iter().map(ContingencyTable::correct).collect();

        let best = scores.iter().copied().max().unwrap_or(0);
        let tied: Vec<usize> = (0..scores.len()).filter(|&i| scores[i] == best).collect();
        let winner = self.break_ties(&tied, features, &tables, &mut diagnostics);

        let ranking = rank_features(features, &scores, total);
        if self.config.verbose {
            log::info!("Feature ranking (rank, feature, accuracy):");
            for score in &ranking {
                log::info!(
                    "  {:>3}  {:<20} {:.2}%",
                    score.rank,
                    score.feature,
                    score.accuracy * 100.0
                );
            }
        }

        let (feature_name, feature) = &features[winner];
        log::info!(
            "Selected feature '{}' for target '{}': {}/{} correct",
            feature_name,
            target_name,
            scores[winner],
            total
        );

        Ok(Model::new(
            target_name.to_string(),
            feature_name.to_string(),
            tables[winner].clone(),
            feature.discretization().clone(),
            total,
            ranking,
            diagnostics,
        ))
    }

    fn break_ties(
        &self,
        tied: &[usize],
        features: &[(&str, Factor)],
        tables: &[ContingencyTable],
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let first = tied[0];
        if tied.len() == 1 || self.config.ties_method == TiesMethod::First {
            return first;
        }

        let mut best: Option<(usize, f64)> = None;
        let mut failures = Vec::new();
        for &i in tied {
            match tables[i].chisq_test(true) {
                Ok(test) if test.p_value.is_finite() => {
                    if best.map_or(true, |(_, p)| test.p_value < p) {
                        best = Some((i, test.p_value));
                    }
                }
                Ok(test) => failures.push(format!("{}: p-value {}", features[i].0, test.p_value)),
                Err(e) => failures.push(format!("{}: {}", features[i].0, e)),
            }
        }

        match best {
            Some((i, p)) => {
                log::debug!("chi-squared tie-break chose '{}' (p = {})", features[i].0, p);
                i
            }
            None => {
                diagnostics.push(Diagnostic::TieBreakFallback {
                    features: tied.iter().map(|&i| features[i].0.to_string()).collect(),
                    reason: failures.join("; "),
                });
                first
            }
        }
    }
}

fn as_factor(column: &Column) -> Factor {
    match column {
        Column::Categorical(factor) => factor.clone(),
        other => other.to_factor(),
    }
}

/// Features sorted by descending score; equal scores keep column order
fn rank_features(features: &[(&str, Factor)], scores: &[usize], total: usize) -> Vec<FeatureScore> {
    let mut order: Vec<usize> = (0..features.len()).collect();
    order.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
    order
        .into_iter()
        .enumerate()
        .map(|(rank, i)| FeatureScore {
            rank: rank + 1,
            feature: features[i].0.to_string(),
            correct: scores[i],
            accuracy: if total == 0 {
                0.0
            } else {
                scores[i] as f64 / total as f64
            },
        })
        .collect()
}

/// Train a model on a raw table with the given configuration.
pub fn one_r(data: &Table, target: Option<&str>, config: &OneRConfig) -> Result<Model> {
    RuleLearner::new(config.clone())?.fit(data, target)
}
