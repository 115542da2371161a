// Column Classifier
//
// The single runtime type decision. Raw text cells are inspected once when a
// column is loaded; afterwards the kind is carried by the column variant.

use super::column::{Column, ColumnKind, ColumnValues};

/// Cell texts (after trimming) that denote a missing value.
pub const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Parse a numeric cell. `Ok(None)` means missing, `Err(())` means the cell
/// is not a number.
fn parse_numeric(cell: &str) -> Result<Option<f64>, ()> {
    if is_missing(cell) {
        return Ok(None);
    }
    cell.trim().parse::<f64>().map(Some).map_err(|_| ())
}

/// Kind of an already loaded column.
pub fn classify(column: &Column) -> ColumnKind {
    match column.values() {
        ColumnValues::Numeric(_) => ColumnKind::Numeric,
        ColumnValues::Categorical(_) => ColumnKind::Categorical,
    }
}

/// Infer the kind of raw cells: numeric iff every non-missing cell parses as
/// a real number. A column with no present cells is numeric.
pub fn infer_kind<S: AsRef<str>>(cells: &[S]) -> ColumnKind {
    if cells
        .iter()
        .all(|cell| parse_numeric(cell.as_ref()).is_ok())
    {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Build a typed column from raw text cells.
pub fn build_column(name: impl Into<String>, cells: Vec<String>) -> Column {
    match infer_kind(&cells) {
        ColumnKind::Numeric => {
            let values = cells
                .iter()
                .map(|cell| parse_numeric(cell).ok().flatten())
                .collect();
            Column::numeric_with_source(name, values, cells)
        }
        ColumnKind::Categorical => Column::categorical(name, cells),
    }
}
