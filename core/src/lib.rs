// LDP Synth Core — Column-wise local differential privacy
//
// Turns a loaded table into a privacy-perturbed copy of itself. Numeric
// columns receive calibrated Laplace noise, categorical columns go through
// k-ary randomized response. Nothing here touches the filesystem except the
// delimited-text boundary in `table::delimited`.

pub mod budget;
pub mod mechanism;
pub mod table;

use thiserror::Error;

pub use budget::PrivacyBudget;
pub use mechanism::{
    plan, transform, Calibration, CalibrationError, ColumnPlan, Dispatcher, LaplaceMechanism, Mode,
    RandomizedResponse, TransformConfig,
};
pub use table::{
    classify, read_csv, read_csv_path, write_csv, write_csv_path, Column, ColumnKind,
    ColumnValues, Table, TableError,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Invalid privacy budget: epsilon = {epsilon}")]
    InvalidBudget { epsilon: f64 },
    #[error("Column '{column}' produced {actual} rows, table has {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Column '{column}' spans a range too wide to calibrate noise for")]
    RangeOverflow { column: String },
    #[error("Unsupported mechanism mode: {0}")]
    UnsupportedMode(String),
    #[error("Table unavailable: {0}")]
    Table(#[from] TableError),
}

pub type Result<T> = std::result::Result<T, SynthError>;
