// Perturbation mechanisms and the per-column dispatcher
//
// Laplace noise for numeric columns, k-ary randomized response for
// categorical columns. The mode decides which column kinds are touched.

pub mod dispatch;
pub mod laplace;
pub mod randomized_response;

pub use dispatch::{plan, transform, Calibration, ColumnPlan, Dispatcher, TransformConfig};
pub use laplace::{CalibrationError, LaplaceMechanism};
pub use randomized_response::RandomizedResponse;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::table::ColumnKind;
use crate::SynthError;

/// Which column kinds get perturbed. Unselected columns pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Numeric columns only
    #[serde(rename = "laplace", alias = "numeric-only")]
    Laplace,
    /// Categorical columns only
    #[serde(rename = "rr", alias = "categorical-only")]
    RandomizedResponse,
    /// Both column kinds
    #[default]
    #[serde(rename = "all", alias = "both")]
    Both,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Laplace, Mode::RandomizedResponse, Mode::Both];

    /// Whether columns of `kind` are perturbed under this mode.
    pub fn perturbs(self, kind: ColumnKind) -> bool {
        matches!(
            (self, kind),
            (Mode::Laplace | Mode::Both, ColumnKind::Numeric)
                | (Mode::RandomizedResponse | Mode::Both, ColumnKind::Categorical)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Laplace => "laplace",
            Mode::RandomizedResponse => "rr",
            Mode::Both => "all",
        }
    }
}

impl FromStr for Mode {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "laplace" | "numeric-only" | "numeric" => Ok(Mode::Laplace),
            "rr" | "categorical-only" | "categorical" | "randomized-response" => {
                Ok(Mode::RandomizedResponse)
            }
            "all" | "both" => Ok(Mode::Both),
            _ => Err(SynthError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
