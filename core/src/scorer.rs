//! Single-transaction scoring against a loaded model.
//!
//! A Scorer is built once at startup and only read afterwards, so it is
//! shared across request handlers as a plain Arc with no lock.

use crate::{
    artifact::load_model,
    booster::GradientBoostedTrees,
    error::{FraudError, FraudResult},
    features::{country_risk, FeatureVector},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Body of `POST /score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub amount:        f64,
    pub account_age:   u32,
    pub is_new_device: bool,
    #[serde(default)]
    pub country:       Option<String>,
}

impl ScoreRequest {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            amount:        self.amount,
            account_age:   self.account_age,
            is_new_device: self.is_new_device,
            country_risk:  country_risk(self.country.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
}

pub struct Scorer {
    model: GradientBoostedTrees,
}

impl Scorer {
    pub fn new(model: GradientBoostedTrees) -> Self {
        Self { model }
    }

    /// Load the model file. Any failure here is fatal to the caller.
    pub fn from_path(path: impl AsRef<Path>) -> FraudResult<Self> {
        load_model(path).map(Self::new)
    }

    /// Fraud probability for one feature vector, always in [0, 1].
    pub fn score_features(&self, features: &FeatureVector) -> FraudResult<f64> {
        let row = features.to_row();
        let p = self.model.predict_proba(&row)?;
        if !p.is_finite() {
            return Err(FraudError::NonFiniteScore { input: row });
        }
        Ok(p)
    }

    pub fn score(&self, request: &ScoreRequest) -> FraudResult<ScoreResponse> {
        self.score_features(&request.features())
            .map(|score| ScoreResponse { score })
    }
}
