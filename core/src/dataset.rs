//! Synthetic labelled transactions for training.
//!
//! Draw order is part of the reproducibility contract: all feature
//! columns are drawn first (amount, account_age, is_new_device,
//! country_risk, each for every sample), then every label.

use crate::{
    features::{FeatureVector, FEATURE_COUNT},
    rng::StreamRng,
};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic population and its latent fraud model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub samples:               usize,
    /// Mean of the exponential amount distribution.
    pub amount_scale:          f64,
    /// account_age is uniform over [0, max_account_age).
    pub max_account_age:       u32,
    pub new_device_rate:       f64,
    pub country_risk_rate:     f64,
    pub intercept:             f64,
    pub amount_weight:         f64,
    pub new_device_weight:     f64,
    pub country_risk_weight:   f64,
    pub account_age_weight:    f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            samples:             5000,
            amount_scale:        200.0,
            max_account_age:     365,
            new_device_rate:     0.10,
            country_risk_rate:   0.02,
            intercept:           -3.0,
            amount_weight:       0.005,
            new_device_weight:   1.2,
            country_risk_weight: 2.5,
            account_age_weight:  -0.002,
        }
    }
}

impl SyntheticConfig {
    /// Latent log-odds of fraud for one transaction.
    pub fn logit(&self, fv: &FeatureVector) -> f64 {
        let [amount, account_age, new_device, country_risk] = fv.to_row();
        self.intercept
            + self.amount_weight * amount
            + self.new_device_weight * new_device
            + self.country_risk_weight * country_risk
            + self.account_age_weight * account_age
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub rows:   Vec<FeatureVector>,
    pub labels: Vec<bool>,
}

impl Dataset {
    /// Draw a synthetic dataset from `rng`.
    pub fn synthesize(config: &SyntheticConfig, rng: &mut StreamRng) -> Self {
        let n = config.samples;

        let amounts: Vec<f64> = (0..n).map(|_| rng.exponential(config.amount_scale)).collect();
        let ages: Vec<u32> = (0..n)
            .map(|_| rng.next_u64_below(config.max_account_age.max(1) as u64) as u32)
            .collect();
        let new_device: Vec<bool> = (0..n).map(|_| rng.chance(config.new_device_rate)).collect();
        // Drawn independently; the scorer derives this flag from a country code.
        let country_risk: Vec<bool> = (0..n).map(|_| rng.chance(config.country_risk_rate)).collect();

        let rows: Vec<FeatureVector> = (0..n)
            .map(|i| FeatureVector {
                amount:        amounts[i],
                account_age:   ages[i],
                is_new_device: new_device[i],
                country_risk:  country_risk[i],
            })
            .collect();

        let labels = rows
            .iter()
            .map(|fv| rng.chance(sigmoid(config.logit(fv))))
            .collect();

        Self { rows, labels }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&y| y).count()
    }

    /// Feature matrix in model input order.
    pub fn matrix(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.rows.iter().map(FeatureVector::to_row).collect()
    }

    /// Shuffle and split into (train, test).
    ///
    /// The test set holds `ceil(len * test_fraction)` rows, taken from the
    /// front of a random permutation of the indices.
    pub fn train_test_split(&self, test_fraction: f64, rng: &mut StreamRng) -> (Dataset, Dataset) {
        let n = self.len();
        let n_test = ((n as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
        let perm = rng.permutation(n);
        let (test_idx, train_idx) = perm.split_at(n_test.min(n));
        (self.subset(train_idx), self.subset(test_idx))
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            rows:   indices.iter().map(|&i| self.rows[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}
