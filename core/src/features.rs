//! The model's input contract.
//!
//! RULE: Trainer and Scorer both build rows through FeatureVector.
//! The column order below is the only place the order is defined.
//! Changing it invalidates every model file written so far.

use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 4;

/// Column names, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["amount", "account_age", "is_new_device", "country_risk"];

/// Countries whose transactions get `country_risk = 1` at scoring time.
pub const HIGH_RISK_COUNTRIES: [&str; 3] = ["RU", "KP", "NG"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub amount:        f64,
    /// Days since account creation.
    pub account_age:   u32,
    pub is_new_device: bool,
    pub country_risk:  bool,
}

impl FeatureVector {
    /// Numeric row in FEATURE_NAMES order. Flags become 0.0 / 1.0.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.amount,
            self.account_age as f64,
            flag(self.is_new_device),
            flag(self.country_risk),
        ]
    }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Map an optional country code onto the risk flag.
///
/// Absent, empty and unknown codes are all "no risk". Matching is
/// case-insensitive.
pub fn country_risk(country: Option<&str>) -> bool {
    match country {
        Some(code) if !code.is_empty() => {
            let upper = code.to_uppercase();
            HIGH_RISK_COUNTRIES.contains(&upper.as_str())
        }
        _ => false,
    }
}
