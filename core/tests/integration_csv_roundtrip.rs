//! Delimited text in, perturbed delimited text out.
//!
//! Run with: cargo test --test integration_csv_roundtrip

use ldp_synth_core::{
    read_csv, read_csv_path, transform, write_csv, write_csv_path, ColumnKind, Mode, SynthError,
    TableError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tempfile::tempdir;

const INPUT: &str = "\
age,city,score,comment
20,NY,1.5,fine
30,NY,,ok
40,LA,2.25,
";

#[test]
fn test_file_roundtrip_preserves_header_and_rows() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input_path = dir.path().join("data.csv");
    let output_path = dir.path().join("synthetic.csv");
    std::fs::write(&input_path, INPUT)?;

    let table = read_csv_path(&input_path, b',')?;
    assert_eq!(table.column("age").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(table.column("score").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(table.column("comment").unwrap().kind(), ColumnKind::Categorical);

    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let synthetic = transform(&table, 1.0, Mode::Both, &mut rng)?;
    write_csv_path(&output_path, &synthetic, b',')?;

    let written = std::fs::read_to_string(&output_path)?;
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("age,city,score,comment"));
    assert_eq!(lines.count(), 3);

    let reloaded = read_csv_path(&output_path, b',')?;
    assert_eq!(reloaded.row_count(), 3);
    assert_eq!(
        reloaded.column_names().collect::<Vec<_>>(),
        vec!["age", "city", "score", "comment"]
    );
    Ok(())
}

#[test]
fn test_missing_numeric_written_empty() {
    let table = read_csv(INPUT.as_bytes(), b',').unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let synthetic = transform(&table, 1.0, Mode::Laplace, &mut rng).unwrap();

    let mut out = Vec::new();
    write_csv(&mut out, &synthetic, b',').unwrap();
    let text = String::from_utf8(out).unwrap();

    let second_row: Vec<&str> = text.lines().nth(2).unwrap().split(',').collect();
    assert_eq!(second_row[1], "NY");
    assert_eq!(second_row[2], "");
    assert_eq!(second_row[3], "ok");
}

#[test]
fn test_passthrough_mode_reproduces_categorical_text() {
    let table = read_csv(INPUT.as_bytes(), b',').unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let synthetic = transform(&table, 1.0, Mode::Laplace, &mut rng).unwrap();

    assert_eq!(synthetic.column("city"), table.column("city"));
    assert_eq!(synthetic.column("comment"), table.column("comment"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let result = read_csv_path(dir.path().join("absent.csv"), b',');
    assert!(matches!(result, Err(TableError::Io(_))));
}

#[test]
fn test_table_error_surfaces_as_unavailable() {
    let err: SynthError = read_csv("a,a\n1,2\n".as_bytes(), b',').unwrap_err().into();
    assert!(err.to_string().starts_with("Table unavailable"));
}

#[test]
fn test_tab_delimited_input() {
    let table = read_csv("x\ty\n1\tfoo\n2\tbar\n".as_bytes(), b'\t').unwrap();
    assert_eq!(table.column("x").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(table.column("y").unwrap().kind(), ColumnKind::Categorical);
}

fn field(text: &str, column: usize) -> Vec<String> {
    text.lines()
        .skip(1)
        .map(|line| line.split(',').nth(column).unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_untouched_numeric_column_written_byte_identical() {
    // Integer past 2^53, leading zeros, exponent form and a missing token
    let input = "id,city\n9007199254740993,NY\n007,LA\n1e3,NY\nNA,LA\n";
    let table = read_csv(input.as_bytes(), b',').unwrap();
    assert_eq!(table.column("id").unwrap().kind(), ColumnKind::Numeric);

    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let synthetic = transform(&table, 1.0, Mode::RandomizedResponse, &mut rng).unwrap();

    let mut out = Vec::new();
    write_csv(&mut out, &synthetic, b',').unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().next(), Some("id,city"));
    assert_eq!(field(&text, 0), vec!["9007199254740993", "007", "1e3", "NA"]);
}

#[test]
fn test_perturbed_column_keeps_missing_tokens() {
    let input = "x\n1\nNA\n5\nnull\n";
    let table = read_csv(input.as_bytes(), b',').unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let synthetic = transform(&table, 1.0, Mode::Laplace, &mut rng).unwrap();

    let mut out = Vec::new();
    write_csv(&mut out, &synthetic, b',').unwrap();
    let cells = field(&String::from_utf8(out).unwrap(), 0);

    assert_eq!(cells[1], "NA");
    assert_eq!(cells[3], "null");
    assert_ne!(cells[0], "1");
    assert_ne!(cells[2], "5");
}
