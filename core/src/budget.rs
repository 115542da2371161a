// Privacy budget (epsilon)
//
// Validated once at the boundary; mechanisms only ever see a budget that is
// finite and non-negative.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SynthError;

/// A non-negative, finite privacy budget.
///
/// `0.0` is accepted: the Laplace mechanism degenerates to the identity and
/// randomized response becomes maximally noisy. Negative, NaN and infinite
/// values are rejected with [`SynthError::InvalidBudget`], never clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PrivacyBudget(f64);

impl PrivacyBudget {
    pub fn new(epsilon: f64) -> Result<Self, SynthError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(SynthError::InvalidBudget { epsilon });
        }
        Ok(Self(epsilon))
    }

    pub fn epsilon(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for PrivacyBudget {
    type Error = SynthError;

    fn try_from(epsilon: f64) -> Result<Self, Self::Error> {
        Self::new(epsilon)
    }
}

impl From<PrivacyBudget> for f64 {
    fn from(budget: PrivacyBudget) -> Self {
        budget.0
    }
}

impl fmt::Display for PrivacyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ε={}", self.0)
    }
}
