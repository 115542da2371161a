// Table model — ordered, row-aligned named columns
//
// Loaded once, never mutated. The dispatcher derives a fresh table from it.

pub mod classify;
pub mod column;
pub mod delimited;

pub use classify::{build_column, classify, infer_kind, is_missing};
pub use column::{Column, ColumnKind, ColumnValues};
pub use delimited::{read_csv, read_csv_path, write_csv, write_csv_path};

use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Input has no header row")]
    MissingHeader,
    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered sequence of uniquely named columns, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != rows {
                return Err(TableError::RaggedColumn {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = Table::new(vec![
            Column::numeric("age", vec![Some(20.0), Some(30.0), Some(40.0)]),
            Column::categorical("city", ["NY", "NY", "LA"]),
        ])
        .unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["age", "city"]);
        assert!(table.column("city").is_some());
        assert!(table.column("zip").is_none());
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::categorical("a", ["x"]),
            Column::categorical("a", ["y"]),
        ]);
        assert!(matches!(result, Err(TableError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::categorical("a", ["x", "y"]),
            Column::numeric("b", vec![Some(1.0)]),
        ]);
        assert!(matches!(
            result,
            Err(TableError::RaggedColumn { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(Vec::new()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }
}
