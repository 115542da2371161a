// Mechanism Dispatcher
//
// Single pass over the table in column order. Each column is perturbed at
// most once and never reads another column. Randomness is drawn from one
// injected generator, column by column and row by row, so a seeded generator
// reproduces the same output.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::laplace::{CalibrationError, LaplaceMechanism};
use super::randomized_response::RandomizedResponse;
use super::Mode;
use crate::budget::PrivacyBudget;
use crate::table::{Column, ColumnKind, ColumnValues, Table};
use crate::SynthError;

/// Everything the dispatcher needs besides the table and the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    pub budget: PrivacyBudget,
    pub mode: Mode,
}

impl TransformConfig {
    pub fn new(epsilon: f64, mode: Mode) -> Result<Self, SynthError> {
        Ok(Self {
            budget: PrivacyBudget::new(epsilon)?,
            mode,
        })
    }
}

/// Calibrated parameters for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Calibration {
    /// Column is left as is under the requested mode
    Passthrough,
    Laplace { sensitivity: f64, scale: f64 },
    RandomizedResponse { categories: usize, retention: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPlan {
    pub name: String,
    pub kind: ColumnKind,
    pub calibration: Calibration,
}

impl ColumnPlan {
    /// True when the column's values can change.
    pub fn perturbed(&self) -> bool {
        match self.calibration {
            Calibration::Passthrough => false,
            Calibration::Laplace { scale, .. } => scale > 0.0,
            Calibration::RandomizedResponse { categories, .. } => categories > 1,
        }
    }
}

/// Column mechanism chosen for one column.
enum Selected {
    Passthrough,
    Laplace(LaplaceMechanism),
    RandomizedResponse(RandomizedResponse),
}

pub struct Dispatcher {
    config: TransformConfig,
}

impl Dispatcher {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn select(&self, column: &Column) -> Result<Selected, SynthError> {
        if !self.config.mode.perturbs(column.kind()) {
            return Ok(Selected::Passthrough);
        }
        match column.values() {
            ColumnValues::Numeric(values) => LaplaceMechanism::calibrate(values, self.config.budget)
                .map(Selected::Laplace)
                .map_err(|err| match err {
                    CalibrationError::RangeOverflow => SynthError::RangeOverflow {
                        column: column.name().to_string(),
                    },
                    CalibrationError::ScaleOverflow(epsilon) => SynthError::InvalidBudget { epsilon },
                }),
            ColumnValues::Categorical(values) => Ok(Selected::RandomizedResponse(
                RandomizedResponse::calibrate(values, self.config.budget),
            )),
        }
    }

    /// Calibration for every column, in table order, without drawing noise.
    pub fn plan(&self, table: &Table) -> Result<Vec<ColumnPlan>, SynthError> {
        table
            .columns()
            .iter()
            .map(|column| {
                let calibration = match self.select(column)? {
                    Selected::Passthrough => Calibration::Passthrough,
                    Selected::Laplace(mech) => Calibration::Laplace {
                        sensitivity: mech.sensitivity(),
                        scale: mech.scale(),
                    },
                    Selected::RandomizedResponse(rr) => Calibration::RandomizedResponse {
                        categories: rr.k(),
                        retention: rr.retention(),
                    },
                };
                Ok(ColumnPlan {
                    name: column.name().to_string(),
                    kind: column.kind(),
                    calibration,
                })
            })
            .collect()
    }

    /// Produce a perturbed copy of `table`. The input is never modified and
    /// nothing is returned on failure.
    pub fn transform<R: Rng + ?Sized>(&self, table: &Table, rng: &mut R) -> Result<Table, SynthError> {
        info!(
            "Perturbing {} columns x {} rows ({}, mode={})",
            table.column_count(),
            table.row_count(),
            self.config.budget,
            self.config.mode
        );

        let mut columns = Vec::with_capacity(table.column_count());
        for column in table.columns() {
            let values = match (self.select(column)?, column.values()) {
                (Selected::Laplace(mech), ColumnValues::Numeric(values)) if !mech.is_identity() => {
                    debug!(
                        "Column '{}': laplace sensitivity={} scale={}",
                        column.name(),
                        mech.sensitivity(),
                        mech.scale()
                    );
                    ColumnValues::Numeric(mech.perturb(values, rng))
                }
                (Selected::RandomizedResponse(rr), ColumnValues::Categorical(values)) => {
                    debug!(
                        "Column '{}': randomized response k={} p={:.4}",
                        column.name(),
                        rr.k(),
                        rr.retention()
                    );
                    ColumnValues::Categorical(rr.perturb(values, rng))
                }
                (_, values) => {
                    debug!("Column '{}': passthrough", column.name());
                    values.clone()
                }
            };

            if values.len() != table.row_count() {
                return Err(SynthError::ShapeMismatch {
                    column: column.name().to_string(),
                    expected: table.row_count(),
                    actual: values.len(),
                });
            }
            columns.push(column.with_values(values));
        }

        Ok(Table::new(columns)?)
    }
}

/// Perturb `table` with budget `epsilon` under `mode`.
pub fn transform<R: Rng + ?Sized>(
    table: &Table,
    epsilon: f64,
    mode: Mode,
    rng: &mut R,
) -> Result<Table, SynthError> {
    Dispatcher::new(TransformConfig::new(epsilon, mode)?).transform(table, rng)
}

pub fn plan(table: &Table, config: TransformConfig) -> Result<Vec<ColumnPlan>, SynthError> {
    Dispatcher::new(config).plan(table)
}
