// Laplace Perturbation Mechanism
//
// Adds Lap(0, b) noise to each present numeric cell, with
// b = (max - min) / ε. Missing and non-finite cells pass through untouched
// and consume no randomness.

use rand::Rng;
use rand_distr::{Distribution, Exp};
use thiserror::Error;

use crate::budget::PrivacyBudget;

#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("Column range is not finite")]
    RangeOverflow,
    #[error("Noise scale overflows for epsilon = {0}")]
    ScaleOverflow(f64),
}

/// Column range over present, finite cells. Zero when fewer than one such
/// cell exists.
pub fn sensitivity(values: &[Option<f64>]) -> f64 {
    let mut present = values.iter().flatten().copied().filter(|v| v.is_finite());
    let first = match present.next() {
        Some(v) => v,
        None => return 0.0,
    };
    let (min, max) = present.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max - min
}

/// Noise scale `b = sensitivity / ε`; zero when ε is zero.
pub fn noise_scale(sensitivity: f64, budget: PrivacyBudget) -> f64 {
    if budget.epsilon() > 0.0 {
        sensitivity / budget.epsilon()
    } else {
        0.0
    }
}

/// Laplace mechanism calibrated for one column.
#[derive(Debug, Clone, Copy)]
pub struct LaplaceMechanism {
    sensitivity: f64,
    scale: f64,
    /// Exp(1/b); the difference of two draws is Lap(0, b). `None` when b = 0.
    noise: Option<Exp<f64>>,
}

impl LaplaceMechanism {
    /// Calibrate against the column's own range.
    pub fn calibrate(
        values: &[Option<f64>],
        budget: PrivacyBudget,
    ) -> Result<Self, CalibrationError> {
        Self::with_sensitivity(sensitivity(values), budget)
    }

    /// Calibrate against an explicit sensitivity.
    ///
    /// A range that overflowed `f64` is `RangeOverflow`; a finite range with
    /// an ε so small that the scale overflows is `ScaleOverflow`.
    pub fn with_sensitivity(
        sensitivity: f64,
        budget: PrivacyBudget,
    ) -> Result<Self, CalibrationError> {
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(CalibrationError::RangeOverflow);
        }
        let scale = noise_scale(sensitivity, budget);
        if !scale.is_finite() {
            return Err(CalibrationError::ScaleOverflow(budget.epsilon()));
        }

        let noise = if scale > 0.0 {
            let exp = Exp::new(1.0 / scale)
                .map_err(|_| CalibrationError::ScaleOverflow(budget.epsilon()))?;
            Some(exp)
        } else {
            None
        };

        Ok(Self {
            sensitivity,
            scale,
            noise,
        })
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// True when the mechanism returns its input unchanged.
    pub fn is_identity(&self) -> bool {
        self.noise.is_none()
    }

    pub fn perturb<R: Rng + ?Sized>(&self, values: &[Option<f64>], rng: &mut R) -> Vec<Option<f64>> {
        let exp = match &self.noise {
            Some(exp) => exp,
            None => return values.to_vec(),
        };

        values
            .iter()
            .map(|cell| match *cell {
                Some(v) if v.is_finite() => Some(v + (exp.sample(rng) - exp.sample(rng))),
                other => other,
            })
            .collect()
    }
}

/// Calibrate and apply in one step.
pub fn perturb<R: Rng + ?Sized>(
    values: &[Option<f64>],
    budget: PrivacyBudget,
    rng: &mut R,
) -> Result<Vec<Option<f64>>, CalibrationError> {
    Ok(LaplaceMechanism::calibrate(values, budget)?.perturb(values, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn budget(epsilon: f64) -> PrivacyBudget {
        PrivacyBudget::new(epsilon).unwrap()
    }

    #[test]
    fn test_sensitivity_is_range() {
        assert_eq!(sensitivity(&[Some(20.0), Some(40.0), Some(30.0)]), 20.0);
    }

    #[test]
    fn test_sensitivity_ignores_missing() {
        assert_eq!(sensitivity(&[None, Some(5.0), None, Some(-5.0)]), 10.0);
    }

    #[test]
    fn test_sensitivity_empty_and_all_missing() {
        assert_eq!(sensitivity(&[]), 0.0);
        assert_eq!(sensitivity(&[None, None]), 0.0);
        assert_eq!(sensitivity(&[Some(3.0)]), 0.0);
    }

    #[test]
    fn test_scale_calibration() {
        let mech = LaplaceMechanism::calibrate(&[Some(20.0), Some(30.0), Some(40.0)], budget(1.0))
            .unwrap();
        assert_eq!(mech.sensitivity(), 20.0);
        assert_eq!(mech.scale(), 20.0);
        assert!(!mech.is_identity());

        let mech = LaplaceMechanism::with_sensitivity(20.0, budget(4.0)).unwrap();
        assert_eq!(mech.scale(), 5.0);
    }

    #[test]
    fn test_zero_epsilon_is_identity() {
        let values = vec![Some(1.0), Some(100.0), None];
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mech = LaplaceMechanism::calibrate(&values, budget(0.0)).unwrap();
        assert_eq!(mech.scale(), 0.0);
        assert_eq!(mech.perturb(&values, &mut rng), values);
    }

    #[test]
    fn test_constant_column_is_identity() {
        let values = vec![Some(42.0); 10];
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for epsilon in [0.01, 1.0, 50.0] {
            assert_eq!(perturb(&values, budget(epsilon), &mut rng).unwrap(), values);
        }
    }

    #[test]
    fn test_missing_cells_stay_missing() {
        let values = vec![Some(1.0), None, Some(9.0), None];
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let out = perturb(&values, budget(0.5), &mut rng).unwrap();

        assert_eq!(out.len(), values.len());
        assert!(out[1].is_none());
        assert!(out[3].is_none());
        assert!(out[0].is_some());
        assert!(out[2].is_some());
    }

    #[test]
    fn test_noise_changes_values() {
        let values: Vec<Option<f64>> = (0..50).map(|i| Some(i as f64)).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let out = perturb(&values, budget(1.0), &mut rng).unwrap();
        let changed = out.iter().zip(&values).filter(|(a, b)| a != b).count();
        assert_eq!(changed, values.len());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let values: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64 * 1.5)).collect();
        let a = perturb(&values, budget(1.0), &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        let b = perturb(&values, budget(1.0), &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scale_overflow_rejected() {
        let result = LaplaceMechanism::with_sensitivity(f64::MAX, budget(1e-300));
        assert_eq!(result.unwrap_err(), CalibrationError::ScaleOverflow(1e-300));
    }

    #[test]
    fn test_range_overflow_is_not_a_budget_error() {
        let values = vec![Some(1e308), Some(-1e308)];
        assert_eq!(sensitivity(&values), f64::INFINITY);
        let result = LaplaceMechanism::calibrate(&values, budget(1.0));
        assert_eq!(result.unwrap_err(), CalibrationError::RangeOverflow);
    }
}
