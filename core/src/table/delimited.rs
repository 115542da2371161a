// Delimited text boundary — load a Table from CSV and write one back
//
// Header row is mandatory and re-emitted verbatim. Every record must have the
// header's width.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::classify::build_column;
use super::{Table, TableError};

/// Read a table from any reader.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<Table, TableError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(TableError::MissingHeader);
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, column_cells)| build_column(name, column_cells))
        .collect();

    Table::new(columns)
}

pub fn read_csv_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Table, TableError> {
    let file = File::open(path)?;
    read_csv(file, delimiter)
}

/// Write a table to any writer.
pub fn write_csv<W: Write>(writer: W, table: &Table, delimiter: u8) -> Result<(), TableError> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.column_names())?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.cell_text(row).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_path(
    path: impl AsRef<Path>,
    table: &Table,
    delimiter: u8,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_csv(file, table, delimiter)
}
