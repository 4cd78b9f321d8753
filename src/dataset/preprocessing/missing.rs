//! Row filtering on missing values.

use crate::core::error::Result;
use crate::dataset::table::Table;

/// Indices of rows with no missing value in any of the named columns
pub fn complete_rows(table: &Table, columns: &[&str]) -> Result<Vec<usize>> {
    let columns = columns
        .iter()
        .map(|name| table.require(name))
        .collect::<Result<Vec<_>>>()?;
    Ok((0..table.num_rows())
        .filter(|&r| columns.iter().all(|c| !c.is_missing(r)))
        .collect())
}

/// Drop rows missing in any of the named columns, returning the filtered
/// table and the number of rows removed.
pub fn drop_missing_rows(table: &Table, columns: &[&str]) -> Result<(Table, usize)> {
    let keep = complete_rows(table, columns)?;
    let removed = table.num_rows() - keep.len();
    if removed == 0 {
        return Ok((table.clone(), 0));
    }
    Ok((table.select_rows(&keep), removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table::Column;

    fn table() -> Table {
        Table::from_columns(vec![
            ("x", Column::numeric(vec![1.0, f64::NAN, 3.0, 4.0])),
            ("z", Column::Text(vec![Some("u".into()), Some("v".into()), None, Some("w".into())])),
            ("y", Column::categorical(["a", "b", "a", "b"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_missing_rows() {
        let t = table();
        let (filtered, removed) = drop_missing_rows(&t, &["x"]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(filtered.num_rows(), 3);

        let (filtered, removed) = drop_missing_rows(&t, &["x", "z", "y"]).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(filtered.column("y").unwrap().labels_or_na(), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_column() {
        assert!(drop_missing_rows(&table(), &["nope"]).is_err());
    }
}
