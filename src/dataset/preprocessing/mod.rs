//! Dataset preprocessing: turns a raw table into a fully categorical one.
//!
//! The preprocessor moves the target to the last column, coerces the target
//! and every non-numeric feature to a categorical variable, filters rows with
//! missing values according to the configured policy, bins numeric features
//! and finally prunes levels left without observations. Every step that
//! alters the data in a way the caller may not expect records a
//! [`Diagnostic`].

pub mod missing;

pub use missing::{complete_rows, drop_missing_rows};

use crate::core::constants::DEFAULT_NBINS;
use crate::core::diagnostics::{Diagnosed, Diagnostic, Diagnostics};
use crate::core::error::{OneRError, Result};
use crate::core::types::{BinMethod, MissingPolicy, OptimalMethod};
use crate::dataset::binning::{apply_missing_policy, optimal_bin, BinningConfig, NumericalBinner};
use crate::dataset::factor::Factor;
use crate::dataset::table::{Column, Table};
use serde::{Deserialize, Serialize};

/// How numeric features are discretized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericStrategy {
    /// Unsupervised binning into `nbins` bins
    Bin {
        /// Binning method
        method: BinMethod,
        /// Number of bins requested
        nbins: usize,
    },
    /// Supervised binning against the target
    Optimal {
        /// Cut point placement method
        method: OptimalMethod,
    },
}

impl Default for NumericStrategy {
    fn default() -> Self {
        NumericStrategy::Bin {
            method: BinMethod::Length,
            nbins: DEFAULT_NBINS,
        }
    }
}

/// Preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Missing value handling for every column
    pub missing: MissingPolicy,
    /// Numeric feature discretization
    pub numeric: NumericStrategy,
    /// Drop categorical features with more levels than this
    pub max_levels: Option<usize>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig {
            missing: MissingPolicy::Omit,
            numeric: NumericStrategy::default(),
            max_levels: None,
        }
    }
}

impl PreprocessConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let NumericStrategy::Bin { nbins, .. } = self.numeric {
            if nbins <= 1 {
                return Err(OneRError::usage(format!(
                    "nbins must be greater than 1, got {}",
                    nbins
                )));
            }
        }
        if let Some(max_levels) = self.max_levels {
            if max_levels < 2 {
                return Err(OneRError::invalid_parameter(
                    "max_levels",
                    max_levels.to_string(),
                    "must be at least 2",
                ));
            }
        }
        Ok(())
    }
}

/// Dataset preprocessor
#[derive(Debug, Clone, Default)]
pub struct DatasetPreprocessor {
    config: PreprocessConfig,
}

impl DatasetPreprocessor {
    /// Create a preprocessor, validating the configuration
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(DatasetPreprocessor { config })
    }

    /// Preprocessing configuration
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Discretize `table`. The target is `target` when given, otherwise the
    /// last column; it is moved to the last position in the result.
    pub fn preprocess(&self, table: &Table, target: Option<&str>) -> Result<Diagnosed<Table>> {
        if table.num_columns() < 2 {
            return Err(OneRError::usage(format!(
                "data must have at least two columns, found {}",
                table.num_columns()
            )));
        }

        let mut diagnostics = Diagnostics::new();
        let mut table = table.clone();
        if let Some(name) = target {
            table.move_to_end(name)?;
        }
        let target_name = table.names()[table.num_columns() - 1].clone();

        if let Some(max_levels) = self.config.max_levels {
            self.drop_wide_columns(&mut table, &target_name, max_levels, &mut diagnostics)?;
        }

        // rows without a class label carry no information
        let (mut table, removed) = drop_missing_rows(&table, &[target_name.as_str()])?;
        if removed > 0 {
            diagnostics.push(Diagnostic::RowsRemoved {
                column: Some(target_name.clone()),
                count: removed,
            });
        }

        if self.config.missing == MissingPolicy::Omit {
            let names: Vec<String> = table.names().to_vec();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let (filtered, removed) = drop_missing_rows(&table, &names)?;
            if removed > 0 {
                diagnostics.push(Diagnostic::RowsRemoved {
                    column: None,
                    count: removed,
                });
            }
            table = filtered;
        }

        let target_factor = self.target_factor(&table, &target_name, &mut diagnostics)?;

        let (names, columns) = table.into_parts();
        let mut output = Table::new();
        let num_features = columns.len() - 1;
        for (name, column) in names.iter().zip(columns).take(num_features) {
            let factor = self.discretize_feature(name, &column, &target_factor, &mut diagnostics)?;
            let (factor, dropped) = factor.drop_unused_levels();
            if !dropped.is_empty() {
                diagnostics.push(Diagnostic::UnusedLevelsDropped {
                    column: name.clone(),
                    levels: dropped,
                });
            }
            output.push_column(name.clone(), Column::Categorical(factor))?;
        }
        output.push_column(target_name, Column::Categorical(target_factor))?;

        log::debug!(
            "preprocessed {} rows x {} columns with {} diagnostic(s)",
            output.num_rows(),
            output.num_columns(),
            diagnostics.len()
        );
        Ok(Diagnosed::new(output, diagnostics))
    }

    fn drop_wide_columns(
        &self,
        table: &mut Table,
        target_name: &str,
        max_levels: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let wide: Vec<String> = table
            .iter()
            .filter(|(name, column)| {
                *name != target_name && !column.is_numeric() && column.num_distinct() > max_levels
            })
            .map(|(name, _)| name.to_string())
            .collect();
        if wide.is_empty() {
            return Ok(());
        }
        for name in &wide {
            table.remove_column(name)?;
        }
        diagnostics.push(Diagnostic::ColumnsDropped {
            columns: wide,
            max_levels,
        });
        if table.num_columns() < 2 {
            return Err(OneRError::usage(format!(
                "no feature left with at most {} levels",
                max_levels
            )));
        }
        Ok(())
    }

    fn target_factor(
        &self,
        table: &Table,
        target_name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Factor> {
        let column = table.require(target_name)?;
        let factor = column.to_factor();
        if column.is_numeric() {
            diagnostics.push(Diagnostic::NumericTargetCoerced {
                column: target_name.to_string(),
                levels: factor.num_levels(),
            });
        }

        let (factor, dropped) = factor.drop_unused_levels();
        if !dropped.is_empty() {
            diagnostics.push(Diagnostic::UnusedLevelsDropped {
                column: target_name.to_string(),
                levels: dropped,
            });
        }
        if factor.num_levels() < 2 {
            return Err(OneRError::usage(format!(
                "target '{}' must have at least 2 levels, found {}",
                target_name,
                factor.num_levels()
            )));
        }
        Ok(factor)
    }

    fn discretize_feature(
        &self,
        name: &str,
        column: &Column,
        target: &Factor,
        diagnostics: &mut Diagnostics,
    ) -> Result<Factor> {
        let missing = self.config.missing;
        let binned = match (column, self.config.numeric) {
            (Column::Numeric(values), NumericStrategy::Bin { method, nbins }) => {
                NumericalBinner::new(BinningConfig::new(nbins, method).with_missing(missing))?
                    .fit(values)?
            }
            (Column::Numeric(values), NumericStrategy::Optimal { method }) => {
                optimal_bin(values, target, method, missing)?
            }
            (other, _) => apply_missing_policy(other.to_factor(), missing)?,
        };
        let (factor, signals) = binned.into_parts();
        diagnostics.extend(signals.with_column(name));
        Ok(factor)
    }
}

/// Preprocess `table` with the given configuration.
///
/// See [`DatasetPreprocessor::preprocess`].
pub fn preprocess(
    table: &Table,
    target: Option<&str>,
    config: &PreprocessConfig,
) -> Result<Diagnosed<Table>> {
    DatasetPreprocessor::new(config.clone())?.preprocess(table, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Table {
        Table::from_columns(vec![
            ("y", Column::text(["a", "a", "b", "b", "b", "a"])),
            ("x", Column::numeric(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
            (
                "flag",
                Column::Boolean(vec![Some(true), Some(true), Some(false), None, Some(false), Some(true)]),
            ),
        ])
        .unwrap()
    }

    fn bin2() -> PreprocessConfig {
        PreprocessConfig {
            numeric: NumericStrategy::Bin {
                method: BinMethod::Length,
                nbins: 2,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_target_moved_last() {
        let out = preprocess(&raw(), Some("y"), &bin2()).unwrap();
        assert_eq!(out.value.names(), &["x", "flag", "y"]);
        assert!(out.value.columns().iter().all(|c| matches!(c, Column::Categorical(_))));
    }

    #[test]
    fn test_omit_drops_incomplete_rows() {
        let out = preprocess(&raw(), Some("y"), &bin2()).unwrap();
        assert_eq!(out.value.num_rows(), 5);
        assert_eq!(out.diagnostics.rows_removed(), 1);
    }

    #[test]
    fn test_keep_adds_na_level() {
        let config = PreprocessConfig {
            missing: MissingPolicy::Keep,
            ..bin2()
        };
        let out = preprocess(&raw(), Some("y"), &config).unwrap();
        assert_eq!(out.value.num_rows(), 6);
        match out.value.column("flag").unwrap() {
            Column::Categorical(f) => assert_eq!(f.levels(), &["FALSE", "TRUE", "NA"]),
            other => panic!("unexpected column {:?}", other),
        }
    }

    #[test]
    fn test_numeric_target_coerced() {
        let table = Table::from_columns(vec![
            ("x", Column::text(["p", "q", "p"])),
            ("y", Column::numeric(vec![1.0, 2.0, 1.0])),
        ])
        .unwrap();
        let out = preprocess(&table, None, &PreprocessConfig::default()).unwrap();
        assert!(out
            .diagnostics
            .any(|d| matches!(d, Diagnostic::NumericTargetCoerced { levels: 2, .. })));
    }

    #[test]
    fn test_unused_levels_dropped_and_signalled() {
        let values = vec![0.0, 0.1, 0.2, 9.8, 9.9, 10.0];
        let table = Table::from_columns(vec![
            ("x", Column::numeric(values)),
            ("y", Column::text(["a", "a", "a", "b", "b", "b"])),
        ])
        .unwrap();
        let out = preprocess(&table, None, &PreprocessConfig::default()).unwrap();
        match out.value.column("x").unwrap() {
            Column::Categorical(f) => assert_eq!(f.num_levels(), 2),
            other => panic!("unexpected column {:?}", other),
        }
        assert!(out.diagnostics.any(|d| matches!(
            d,
            Diagnostic::UnusedLevelsDropped { column, levels } if column == "x" && levels.len() == 3
        )));
    }

    #[test]
    fn test_single_column_rejected() {
        let table = Table::from_columns(vec![("y", Column::text(["a"]))]).unwrap();
        assert!(preprocess(&table, None, &PreprocessConfig::default())
            .unwrap_err()
            .is_usage_error());
    }

    #[test]
    fn test_single_target_level_rejected() {
        let table = Table::from_columns(vec![
            ("x", Column::text(["p", "q"])),
            ("y", Column::text(["a", "a"])),
        ])
        .unwrap();
        assert!(preprocess(&table, None, &PreprocessConfig::default()).is_err());
    }

    #[test]
    fn test_max_levels_drops_wide_features() {
        let table = Table::from_columns(vec![
            ("id", Column::text(["1", "2", "3", "4"])),
            ("x", Column::text(["p", "q", "p", "q"])),
            ("y", Column::text(["a", "b", "a", "b"])),
        ])
        .unwrap();
        let config = PreprocessConfig {
            max_levels: Some(3),
            ..Default::default()
        };
        let out = preprocess(&table, None, &config).unwrap();
        assert_eq!(out.value.names(), &["x", "y"]);
        assert!(out
            .diagnostics
            .any(|d| matches!(d, Diagnostic::ColumnsDropped { max_levels: 3, .. })));
    }

    #[test]
    fn test_optimal_strategy() {
        let table = Table::from_columns(vec![
            ("x", Column::numeric(vec![1.0, 2.0, 3.0, 11.0, 12.0, 13.0])),
            ("y", Column::text(["a", "a", "a", "b", "b", "b"])),
        ])
        .unwrap();
        let config = PreprocessConfig {
            numeric: NumericStrategy::Optimal {
                method: OptimalMethod::Naive,
            },
            ..Default::default()
        };
        let out = preprocess(&table, None, &config).unwrap();
        match out.value.column("x").unwrap() {
            Column::Categorical(f) => {
                assert_eq!(f.levels(), &["[1,7]", "(7,13]"]);
                assert_eq!(f.discretization().boundaries().unwrap().cut_points(), &[7.0]);
            }
            other => panic!("unexpected column {:?}", other),
        }
    }
}
