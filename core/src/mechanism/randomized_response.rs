// Randomized Response Mechanism (k-ary)
//
// Each cell is kept with probability p = e^ε / (e^ε + k - 1), otherwise it is
// replaced by one of the other k - 1 categories chosen uniformly.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::budget::PrivacyBudget;

/// Distinct values in order of first appearance.
pub fn distinct_categories(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// Truth-retention probability for `k` categories.
///
/// Computed as `1 / (1 + (k - 1) e^-ε)`, which equals
/// `e^ε / (e^ε + k - 1)` without overflowing for large ε.
pub fn retention_probability(budget: PrivacyBudget, k: usize) -> f64 {
    if k <= 1 {
        return 1.0;
    }
    1.0 / (1.0 + (k as f64 - 1.0) * (-budget.epsilon()).exp())
}

/// Randomized response calibrated for one column.
#[derive(Debug, Clone)]
pub struct RandomizedResponse {
    categories: Vec<String>,
    index: HashMap<String, usize>,
    retention: f64,
}

impl RandomizedResponse {
    pub fn calibrate(values: &[String], budget: PrivacyBudget) -> Self {
        let categories = distinct_categories(values);
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, category)| (category.clone(), i))
            .collect();
        let retention = retention_probability(budget, categories.len());
        Self {
            categories,
            index,
            retention,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of distinct categories, `k`.
    pub fn k(&self) -> usize {
        self.categories.len()
    }

    pub fn retention(&self) -> f64 {
        self.retention
    }

    /// Fewer than two categories: nothing to randomize.
    pub fn is_identity(&self) -> bool {
        self.k() <= 1
    }

    /// Category index after one round of randomized response on `own`.
    fn respond<R: Rng + ?Sized>(&self, own: usize, rng: &mut R) -> usize {
        if rng.gen::<f64>() < self.retention {
            return own;
        }
        // Uniform over the k - 1 other categories
        let pick = rng.gen_range(0..self.k() - 1);
        if pick >= own {
            pick + 1
        } else {
            pick
        }
    }

    /// Randomize every cell. Values outside the calibrated categories are
    /// copied through and draw nothing.
    pub fn perturb<R: Rng + ?Sized>(&self, values: &[String], rng: &mut R) -> Vec<String> {
        if self.is_identity() {
            return values.to_vec();
        }
        values
            .iter()
            .map(|value| match self.index.get(value) {
                Some(&own) => self.categories[self.respond(own, rng)].clone(),
                None => value.clone(),
            })
            .collect()
    }
}

/// Calibrate and apply in one step.
pub fn perturb<R: Rng + ?Sized>(values: &[String], budget: PrivacyBudget, rng: &mut R) -> Vec<String> {
    RandomizedResponse::calibrate(values, budget).perturb(values, rng)
}
