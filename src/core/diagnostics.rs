//! Non-fatal signals raised while discretizing, learning and evaluating.
//!
//! A [`Diagnostic`] never aborts a computation. Data-quality signals tell the
//! caller that the input was altered (rows removed, levels dropped, a target
//! coerced); degenerate signals record that an internal fallback was taken.
//! Both are logged when recorded and returned with the result so callers and
//! tests can assert on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The input data was altered before processing
    DataQuality,
    /// A documented internal fallback was used
    Degenerate,
}

/// A single non-fatal signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Rows were excluded because of missing values
    RowsRemoved {
        /// Column responsible, `None` when counted across the whole table
        column: Option<String>,
        /// Number of rows excluded
        count: usize,
    },
    /// Levels with no observations were removed from a categorical column
    UnusedLevelsDropped {
        /// Column name
        column: String,
        /// Labels of the dropped levels
        levels: Vec<String>,
    },
    /// A numeric target was converted to one level per distinct value
    NumericTargetCoerced {
        /// Target column name
        column: String,
        /// Number of levels created
        levels: usize,
    },
    /// Candidate features were removed for exceeding the level cap
    ColumnsDropped {
        /// Names of the removed columns
        columns: Vec<String>,
        /// Cap that was exceeded
        max_levels: usize,
    },
    /// The chi-squared tie-break could not be computed for any tied feature
    TieBreakFallback {
        /// Tied feature names in column order
        features: Vec<String>,
        /// Why the test failed
        reason: String,
    },
    /// A numeric column had too few distinct values to bin and was treated
    /// as categorical
    DistinctValuesAsLevels {
        /// Column name, when known
        column: Option<String>,
        /// Number of distinct values
        distinct: usize,
    },
    /// Duplicate cut points or empty bins reduced the number of bins
    BinsCollapsed {
        /// Column name, when known
        column: Option<String>,
        /// Bins requested
        requested: usize,
        /// Bins produced
        effective: usize,
    },
    /// A pairwise logistic boundary was replaced by the midpoint of means
    LogisticFallback {
        /// Lower class (by mean order)
        lower: String,
        /// Upper class (by mean order)
        upper: String,
        /// Why the boundary was rejected
        reason: String,
    },
    /// Prediction input held feature levels the model has no rule for
    UnseenLevels {
        /// Feature column name
        column: String,
        /// Distinct unseen level labels
        levels: Vec<String>,
        /// Rows predicted as unseen
        rows: usize,
    },
    /// Information-gain search stopped before reaching the requested bins
    SplitSearchExhausted {
        /// Bins requested
        requested: usize,
        /// Bins produced
        effective: usize,
    },
}

impl Diagnostic {
    /// Severity class of this signal
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::RowsRemoved { .. }
            | Diagnostic::UnusedLevelsDropped { .. }
            | Diagnostic::NumericTargetCoerced { .. }
            | Diagnostic::ColumnsDropped { .. }
            | Diagnostic::TieBreakFallback { .. }
            | Diagnostic::UnseenLevels { .. } => Severity::DataQuality,
            Diagnostic::DistinctValuesAsLevels { .. }
            | Diagnostic::BinsCollapsed { .. }
            | Diagnostic::LogisticFallback { .. }
            | Diagnostic::SplitSearchExhausted { .. } => Severity::Degenerate,
        }
    }

    /// Attach a column name to signals recorded before the name was known
    pub fn with_column(mut self, name: &str) -> Self {
        match &mut self {
            Diagnostic::RowsRemoved { column, .. }
            | Diagnostic::DistinctValuesAsLevels { column, .. }
            | Diagnostic::BinsCollapsed { column, .. } => {
                if column.is_none() {
                    *column = Some(name.to_string());
                }
            }
            _ => {}
        }
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RowsRemoved { column, count } => match column {
                Some(c) => write!(f, "{} instance(s) removed due to missing values in '{}'", count, c),
                None => write!(f, "{} instance(s) removed due to missing values", count),
            },
            Diagnostic::UnusedLevelsDropped { column, levels } => write!(
                f,
                "unused level(s) dropped in '{}': {}",
                column,
                levels.join(", ")
            ),
            Diagnostic::NumericTargetCoerced { column, levels } => write!(
                f,
                "target '{}' is numeric; converted to a categorical variable with {} levels",
                column, levels
            ),
            Diagnostic::ColumnsDropped { columns, max_levels } => write!(
                f,
                "column(s) with more than {} levels removed: {}",
                max_levels,
                columns.join(", ")
            ),
            Diagnostic::TieBreakFallback { features, reason } => write!(
                f,
                "chi-squared tie-break failed for {} ({}); using first feature",
                features.join(", "),
                reason
            ),
            Diagnostic::DistinctValuesAsLevels { column, distinct } => write!(
                f,
                "{} has only {} distinct value(s); each value used as its own level",
                column.as_deref().unwrap_or("column"),
                distinct
            ),
            Diagnostic::BinsCollapsed {
                column,
                requested,
                effective,
            } => write!(
                f,
                "{}: {} bin(s) requested, {} produced",
                column.as_deref().unwrap_or("column"),
                requested,
                effective
            ),
            Diagnostic::LogisticFallback {
                lower,
                upper,
                reason,
            } => write!(
                f,
                "logistic boundary between '{}' and '{}' rejected ({}); midpoint of means used",
                lower, upper, reason
            ),
            Diagnostic::UnseenLevels {
                column,
                levels,
                rows,
            } => write!(
                f,
                "{} row(s) of '{}' have level(s) unseen during training: {}",
                rows,
                column,
                levels.join(", ")
            ),
            Diagnostic::SplitSearchExhausted {
                requested,
                effective,
            } => write!(
                f,
                "no positive information gain left after {} of {} bin(s)",
                effective, requested
            ),
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::DataQuality => log::warn!("{}", diagnostic),
            Severity::Degenerate => log::debug!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    /// Append already-logged diagnostics from another collection
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Attach a column name to every entry that does not name one yet
    pub fn with_column(self, name: &str) -> Diagnostics {
        Diagnostics {
            entries: self
                .entries
                .into_iter()
                .map(|d| d.with_column(name))
                .collect(),
        }
    }

    /// All recorded diagnostics in order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics of the given severity
    pub fn of_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |d| d.severity() == severity)
    }

    /// Whether any diagnostic satisfies the predicate
    pub fn any<F: Fn(&Diagnostic) -> bool>(&self, predicate: F) -> bool {
        self.entries.iter().any(predicate)
    }

    /// Total rows reported as removed
    pub fn rows_removed(&self) -> usize {
        self.entries
            .iter()
            .map(|d| match d {
                Diagnostic::RowsRemoved { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A value returned together with the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    /// The computed value
    pub value: T,
    /// Signals raised while computing it
    pub diagnostics: Diagnostics,
}

impl<T> Diagnosed<T> {
    /// Wrap a value with its diagnostics
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Diagnosed { value, diagnostics }
    }

    /// Wrap a value produced without any signal
    pub fn clean(value: T) -> Self {
        Diagnosed {
            value,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Discard the diagnostics
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Split into value and diagnostics
    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }

    /// Transform the value, keeping the diagnostics
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classes() {
        let removed = Diagnostic::RowsRemoved {
            column: None,
            count: 3,
        };
        assert_eq!(removed.severity(), Severity::DataQuality);

        let collapsed = Diagnostic::BinsCollapsed {
            column: None,
            requested: 5,
            effective: 3,
        };
        assert_eq!(collapsed.severity(), Severity::Degenerate);
    }

    #[test]
    fn test_rows_removed_total() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::RowsRemoved {
            column: Some("a".into()),
            count: 2,
        });
        diagnostics.push(Diagnostic::RowsRemoved {
            column: Some("b".into()),
            count: 1,
        });
        assert_eq!(diagnostics.rows_removed(), 3);
        assert_eq!(diagnostics.of_severity(Severity::DataQuality).count(), 2);
    }

    #[test]
    fn test_with_column_only_fills_unset() {
        let d = Diagnostic::RowsRemoved {
            column: None,
            count: 1,
        }
        .with_column("x");
        assert_eq!(
            d,
            Diagnostic::RowsRemoved {
                column: Some("x".into()),
                count: 1
            }
        );
        let d = d.with_column("y");
        assert!(d.to_string().contains("'x'"));
    }

    #[test]
    fn test_diagnosed_map() {
        let diagnosed = Diagnosed::clean(2).map(|v| v * 3);
        assert_eq!(diagnosed.value, 6);
        assert!(diagnosed.diagnostics.is_empty());
    }
}
