//! Categorical variables: an ordered level set plus one level index per row.

use crate::core::constants::MISSING_LABEL;
use crate::core::error::{OneRError, Result};
use crate::dataset::binning::mapper::Discretization;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Render a numeric value as a level label.
///
/// Integral values print without a fractional part (`1`, not `1.0`), so a
/// label produced at training time matches the one computed for the same
/// value at prediction time.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // normalizes -0
        return "0".to_string();
    }
    format!("{}", value)
}

/// An ordered set of unique levels and a level index (or missing) per row.
///
/// Every stored code is in range. A factor produced by interval binning also
/// carries the [`Discretization`] used to build it, so the same mapping can
/// be replayed on new numeric data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    levels: Vec<String>,
    codes: Vec<Option<usize>>,
    discretization: Discretization,
}

impl Factor {
    /// Create a factor from levels and codes, validating both.
    pub fn new(levels: Vec<String>, codes: Vec<Option<usize>>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for level in &levels {
            if !seen.insert(level.as_str()) {
                return Err(OneRError::usage(format!("duplicate level '{}'", level)));
            }
        }
        if let Some(bad) = codes.iter().flatten().find(|&&c| c >= levels.len()) {
            return Err(OneRError::usage(format!(
                "level index {} out of range for {} levels",
                bad,
                levels.len()
            )));
        }
        Ok(Factor {
            levels,
            codes,
            discretization: Discretization::Categorical,
        })
    }

    /// Build a factor from labels; levels are the distinct labels in sorted
    /// order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let labels: Vec<Option<String>> = labels
            .into_iter()
            .map(|l| l.map(|s| s.as_ref().to_string()))
            .collect();
        let levels: Vec<String> = labels
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<&str, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        let codes = labels
            .iter()
            .map(|l| l.as_deref().map(|s| index[s]))
            .collect();
        Factor {
            levels,
            codes,
            discretization: Discretization::Categorical,
        }
    }

    /// Build a factor with an explicit level order. Labels absent from
    /// `levels` are an error.
    pub fn with_levels<S: AsRef<str>>(levels: Vec<String>, labels: &[Option<S>]) -> Result<Self> {
        let index: HashMap<&str, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        let mut codes = Vec::with_capacity(labels.len());
        for label in labels {
            match label {
                Some(l) => {
                    let code = index.get(l.as_ref()).copied().ok_or_else(|| {
                        OneRError::usage(format!("label '{}' is not a declared level", l.as_ref()))
                    })?;
                    codes.push(Some(code));
                }
                None => codes.push(None),
            }
        }
        Factor::new(levels, codes)
    }

    /// One level per distinct non-missing value, in numeric order.
    pub fn from_numeric(values: &[f64]) -> Self {
        // adding 0.0 folds -0 into +0 so total_cmp agrees with ==
        let mut distinct: Vec<f64> = values
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| v + 0.0)
            .collect();
        distinct.sort_by(|a, b| a.total_cmp(b));
        distinct.dedup();

        let codes = values
            .iter()
            .map(|v| {
                if v.is_nan() {
                    None
                } else {
                    let v = v + 0.0;
                    distinct.binary_search_by(|d| d.total_cmp(&v)).ok()
                }
            })
            .collect();
        Factor {
            levels: distinct.into_iter().map(format_value).collect(),
            codes,
            discretization: Discretization::Categorical,
        }
    }

    /// `FALSE` / `TRUE` levels from booleans.
    pub fn from_bools(values: &[Option<bool>]) -> Self {
        let codes = values.iter().map(|v| v.map(usize::from)).collect();
        Factor {
            levels: vec!["FALSE".to_string(), "TRUE".to_string()],
            codes,
            discretization: Discretization::Categorical,
        }
    }

    /// Attach the discretization that produced this factor
    pub fn with_discretization(mut self, discretization: Discretization) -> Self {
        self.discretization = discretization;
        self
    }

    /// Level labels in order
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Level index per row
    pub fn codes(&self) -> &[Option<usize>] {
        &self.codes
    }

    /// How this factor was derived from numeric data, if it was
    pub fn discretization(&self) -> &Discretization {
        &self.discretization
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the factor has no rows
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of levels
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Label of row `row`, `None` if missing
    pub fn label(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .copied()
            .flatten()
            .map(|c| self.levels[c].as_str())
    }

    /// Labels of all rows
    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.codes.iter().map(|c| c.map(|c| self.levels[c].as_str()))
    }

    /// Index of a level label
    pub fn level_index(&self, label: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == label)
    }

    /// Observations per level
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.levels.len()];
        for &c in self.codes.iter().flatten() {
            counts[c] += 1;
        }
        counts
    }

    /// Number of missing rows
    pub fn missing_count(&self) -> usize {
        self.codes.iter().filter(|c| c.is_none()).count()
    }

    /// Keep only the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Factor {
        Factor {
            levels: self.levels.clone(),
            codes: rows.iter().map(|&r| self.codes[r]).collect(),
            discretization: self.discretization.clone(),
        }
    }

    /// Remove levels without observations, returning the dropped labels.
    pub fn drop_unused_levels(&self) -> (Factor, Vec<String>) {
        let counts = self.counts();
        let mut remap = vec![None; self.levels.len()];
        let mut levels = Vec::new();
        let mut dropped = Vec::new();
        for (i, (level, &count)) in self.levels.iter().zip(&counts).enumerate() {
            if count > 0 {
                remap[i] = Some(levels.len());
                levels.push(level.clone());
            } else {
                dropped.push(level.clone());
            }
        }
        let codes = self.codes.iter().map(|c| c.and_then(|c| remap[c])).collect();
        (
            Factor {
                levels,
                codes,
                discretization: self.discretization.clone(),
            },
            dropped,
        )
    }

    /// Replace missing entries with the reserved `NA` level, appended as
    /// the last level. A factor without missing rows is returned unchanged.
    ///
    /// Fails when a non-missing level is already labelled `NA`, since the
    /// missing rows could no longer be told apart from it.
    pub fn with_missing_level(mut self) -> Result<Factor> {
        if self.missing_count() == 0 {
            return Ok(self);
        }
        if self.level_index(MISSING_LABEL).is_some() {
            return Err(OneRError::usage(format!(
                "level '{}' is reserved for missing values and cannot also be a data value",
                MISSING_LABEL
            )));
        }
        self.levels.push(MISSING_LABEL.to_string());
        let na = self.levels.len() - 1;
        for code in self.codes.iter_mut() {
            if code.is_none() {
                *code = Some(na);
            }
        }
        Ok(self)
    }

    /// Replace level labels, keeping codes. The label count must match.
    pub fn relabel(mut self, labels: Vec<String>) -> Result<Factor> {
        if labels.len() != self.levels.len() {
            return Err(OneRError::usage(format!(
                "{} labels supplied for {} bins",
                labels.len(),
                self.levels.len()
            )));
        }
        let relabelled = Factor::new(labels, std::mem::take(&mut self.codes))?;
        let discretization = self.discretization.relabel(&self.levels, &relabelled.levels);
        Ok(relabelled.with_discretization(discretization))
    }
}
