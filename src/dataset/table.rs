//! Column-oriented tables with positionally aligned rows.
//!
//! The kind of each column is fixed when the table is built: numeric,
//! categorical, free text or boolean. Downstream components match on the
//! [`Column`] variant instead of probing values.

use crate::core::constants::MISSING_LABEL;
use crate::core::error::{OneRError, Result};
use crate::dataset::factor::{format_value, Factor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Real values, `NaN` marks a missing value
    Numeric(Vec<f64>),
    /// Categorical variable
    Categorical(Factor),
    /// Free text, coerced to a categorical variable before learning
    Text(Vec<Option<String>>),
    /// Booleans, coerced to a categorical variable before learning
    Boolean(Vec<Option<bool>>),
}

impl Column {
    /// Numeric column from values
    pub fn numeric<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Column::Numeric(values.into_iter().collect())
    }

    /// Text column from labels without missing values
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Text(values.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Categorical column with sorted levels from labels
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Column::Categorical(Factor::from_labels(values.into_iter().map(Some)))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(f) => f.len(),
            Column::Text(v) => v.len(),
            Column::Boolean(v) => v.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether row `row` holds a missing value
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => v[row].is_nan(),
            Column::Categorical(f) => f.codes()[row].is_none(),
            Column::Text(v) => v[row].is_none(),
            Column::Boolean(v) => v[row].is_none(),
        }
    }

    /// Number of missing values
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_missing(r)).count()
    }

    /// Whether this is a numeric column
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Short name of the column kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Categorical(_) => "categorical",
            Column::Text(_) => "text",
            Column::Boolean(_) => "boolean",
        }
    }

    /// Number of distinct non-missing values
    pub fn num_distinct(&self) -> usize {
        match self {
            Column::Numeric(v) => {
                let mut values: Vec<f64> = v.iter().copied().filter(|x| !x.is_nan()).collect();
                values.sort_by(|a, b| a.total_cmp(b));
                values.dedup();
                values.len()
            }
            Column::Categorical(f) => f.counts().iter().filter(|&&c| c > 0).count(),
            Column::Text(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            Column::Boolean(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
        }
    }

    /// Label of row `row` as it would appear as a level, `None` if missing.
    /// Numeric values render through [`format_value`].
    pub fn label_at(&self, row: usize) -> Option<String> {
        match self {
            Column::Numeric(v) => (!v[row].is_nan()).then(|| format_value(v[row])),
            Column::Categorical(f) => f.label(row).map(str::to_string),
            Column::Text(v) => v[row].clone(),
            Column::Boolean(v) => v[row].map(|b| if b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }

    /// Row labels with missing values rendered as the reserved `NA` label
    pub fn labels_or_na(&self) -> Vec<String> {
        (0..self.len())
            .map(|r| self.label_at(r).unwrap_or_else(|| MISSING_LABEL.to_string()))
            .collect()
    }

    /// Convert to a categorical variable. Numeric values become one level per
    /// distinct value; other kinds convert label-wise.
    pub fn to_factor(&self) -> Factor {
        match self {
            Column::Numeric(v) => Factor::from_numeric(v),
            Column::Categorical(f) => f.clone(),
            Column::Text(v) => Factor::from_labels(v.iter().map(|s| s.as_deref())),
            Column::Boolean(v) => Factor::from_bools(v),
        }
    }

    /// Keep only the given rows, in order
    pub fn select_rows(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&r| v[r]).collect()),
            Column::Categorical(f) => Column::Categorical(f.select_rows(rows)),
            Column::Text(v) => Column::Text(rows.iter().map(|&r| v[r].clone()).collect()),
            Column::Boolean(v) => Column::Boolean(rows.iter().map(|&r| v[r]).collect()),
        }
    }
}

impl From<Factor> for Column {
    fn from(factor: Factor) -> Self {
        Column::Categorical(factor)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(values)
    }
}

/// Ordered named columns of equal length. By convention the last column is
/// the target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns, validating lengths and names.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut table = Table::new();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn push_column<S: Into<String>>(&mut self, name: S, column: Column) -> Result<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(OneRError::usage(format!("duplicate column name '{}'", name)));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(OneRError::dimension_mismatch(
                    format!("{} rows", first.len()),
                    format!("{} rows in column '{}'", column.len(), name),
                ));
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Column by name, or a missing column error
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| OneRError::missing_column(name))
    }

    /// Column at a position
    pub fn column_at(&self, index: usize) -> Option<(&str, &Column)> {
        self.columns
            .get(index)
            .map(|c| (self.names[index].as_str(), c))
    }

    /// Iterate over `(name, column)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// The conventional target: the last column
    pub fn target(&self) -> Option<(&str, &Column)> {
        self.num_columns()
            .checked_sub(1)
            .and_then(|i| self.column_at(i))
    }

    /// Move a named column to the last position
    pub fn move_to_end(&mut self, name: &str) -> Result<()> {
        let index = self
            .column_index(name)
            .ok_or_else(|| OneRError::missing_column(name))?;
        let n = self.names.remove(index);
        let c = self.columns.remove(index);
        self.names.push(n);
        self.columns.push(c);
        Ok(())
    }

    /// Remove and return a named column
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let index = self
            .column_index(name)
            .ok_or_else(|| OneRError::missing_column(name))?;
        self.names.remove(index);
        Ok(self.columns.remove(index))
    }

    /// Replace the column at `index`, keeping its name
    pub fn replace_column(&mut self, index: usize, column: Column) -> Result<()> {
        if index >= self.columns.len() {
            return Err(OneRError::usage(format!("no column at position {}", index)));
        }
        if column.len() != self.num_rows() {
            return Err(OneRError::dimension_mismatch(
                format!("{} rows", self.num_rows()),
                format!("{} rows", column.len()),
            ));
        }
        self.columns[index] = column;
        Ok(())
    }

    /// Keep only the given rows, in order
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select_rows(rows)).collect(),
        }
    }

    /// Split into names and columns
    pub fn into_parts(self) -> (Vec<String>, Vec<Column>) {
        (self.names, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("x", Column::numeric(vec![1.0, f64::NAN, 3.0])),
            ("flag", Column::Boolean(vec![Some(true), Some(false), None])),
            ("y", Column::categorical(["a", "b", "a"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_shape() {
        let t = sample();
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_columns(), 3);
        assert_eq!(t.target().unwrap().0, "y");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Table::from_columns(vec![
            ("x", Column::numeric(vec![1.0, 2.0])),
            ("y", Column::categorical(["a"])),
        ]);
        assert!(matches!(result, Err(OneRError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Table::from_columns(vec![
            ("x", Column::numeric(vec![1.0])),
            ("x", Column::numeric(vec![2.0])),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_move_to_end() {
        let mut t = sample();
        t.move_to_end("x").unwrap();
        assert_eq!(t.names(), &["flag", "y", "x"]);
        assert!(t.move_to_end("nope").is_err());
    }

    #[test]
    fn test_missing_and_labels() {
        let t = sample();
        let x = t.column("x").unwrap();
        assert_eq!(x.missing_count(), 1);
        assert_eq!(x.label_at(0).as_deref(), Some("1"));
        let flag = t.column("flag").unwrap();
        assert_eq!(flag.labels_or_na(), vec!["TRUE", "FALSE", MISSING_LABEL]);
    }

    #[test]
    fn test_select_rows() {
        let t = sample().select_rows(&[2, 0]);
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.column("y").unwrap().label_at(0).as_deref(), Some("a"));
    }
}
