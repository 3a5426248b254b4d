//! Configuration for the trainer and the scoring service.
//!
//! Both configs load from a single JSON file. Every field has a default,
//! so a file only needs the values it changes and no file at all
//! reproduces the reference setup.

use crate::{
    artifact::DEFAULT_MODEL_PATH,
    booster::BoosterParams,
    dataset::SyntheticConfig,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub seed:          u64,
    pub test_fraction: f64,
    pub model_path:    String,
    pub synthetic:     SyntheticConfig,
    pub booster:       BoosterParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed:          DEFAULT_SEED,
            test_fraction: 0.2,
            model_path:    DEFAULT_MODEL_PATH.to_string(),
            synthetic:     SyntheticConfig::default(),
            booster:       BoosterParams::default(),
        }
    }
}

impl TrainerConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        load_json(path.as_ref())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.synthetic.samples >= 2, "need at least 2 samples to split");
        anyhow::ensure!(
            self.test_fraction > 0.0 && self.test_fraction < 1.0,
            "test_fraction must lie strictly between 0 and 1, got {}",
            self.test_fraction
        );
        anyhow::ensure!(self.synthetic.amount_scale > 0.0, "amount_scale must be positive");
        anyhow::ensure!(self.synthetic.max_account_age > 0, "max_account_age must be positive");
        self.booster.validate()?;
        Ok(())
    }
}

/// Decision thresholds for the fraud-check gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Model scores at or above this are blocked.
    pub block_threshold:  f64,
    /// Model scores at or above this (and below block) go to review.
    pub review_threshold: f64,
    /// Score reported when a rule blocks the transaction.
    pub rule_block_score: f64,
    /// Score reported when the model could not be consulted.
    pub fallback_score:   f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            block_threshold:  0.7,
            review_threshold: 0.4,
            rule_block_score: 0.95,
            fallback_score:   0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub large_amount:          f64,
    pub new_account_days:      i64,
    pub new_device_amount:     f64,
    pub high_risk_countries:   Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            large_amount:        1000.0,
            new_account_days:    7,
            new_device_amount:   500.0,
            high_risk_countries: ["RU", "CN", "IR", "NG", "KP", "SY", "VE", "US", "AF"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub bind:       String,
    pub model_path: String,
    pub decision:   DecisionConfig,
    pub rules:      RulesConfig,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            bind:       DEFAULT_BIND.to_string(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            decision:   DecisionConfig::default(),
            rules:      RulesConfig::default(),
        }
    }
}

impl ScorerConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config: Self = load_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let d = &self.decision;
        anyhow::ensure!(
            (0.0..=1.0).contains(&d.review_threshold)
                && (0.0..=1.0).contains(&d.block_threshold)
                && d.review_threshold <= d.block_threshold,
            "thresholds must satisfy 0 <= review ({}) <= block ({}) <= 1",
            d.review_threshold,
            d.block_threshold
        );
        Ok(())
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Cannot parse {}", path.display()))
}
