//! Deterministic pre-model checks for the fraud-check gateway.
//!
//! Rules are cheap and run before the model. Any hit blocks the
//! transaction outright; see decision.rs.

use crate::config::RulesConfig;
use serde::{Deserialize, Serialize};

/// Transaction payload accepted by `POST /fraud-check`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub id:               String,
    pub user_id:          String,
    pub amount:           f64,
    pub currency:         String,
    pub ip_address:       String,
    pub country:          Option<String>,
    pub device_id:        String,
    #[serde(alias = "amountAgeDays")]
    pub account_age_days: i64,
    pub is_new_device:    bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    NewAccountLargeAmount,
    NewDeviceMediumAmount,
    HighRiskCountry,
}

impl RuleKind {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NewAccountLargeAmount => "New account making a large transaction",
            Self::NewDeviceMediumAmount => "Transaction from a new device and medium-large amount",
            Self::HighRiskCountry       => "Transaction is from a high risk country",
        }
    }
}

pub struct RuleEngine {
    config: RulesConfig,
}

impl RuleEngine {
    pub fn new(mut config: RulesConfig) -> Self {
        for code in &mut config.high_risk_countries {
            *code = code.to_uppercase();
        }
        Self { config }
    }

    /// Every rule the transaction trips, in evaluation order.
    pub fn evaluate(&self, tx: &Transaction) -> Vec<RuleKind> {
        let mut hits = Vec::new();

        if tx.amount > self.config.large_amount && tx.account_age_days < self.config.new_account_days {
            hits.push(RuleKind::NewAccountLargeAmount);
        }

        if tx.is_new_device && tx.amount > self.config.new_device_amount {
            hits.push(RuleKind::NewDeviceMediumAmount);
        }

        if let Some(country) = tx.country.as_deref().filter(|c| !c.is_empty()) {
            let upper = country.to_uppercase();
            if self.config.high_risk_countries.iter().any(|c| *c == upper) {
                hits.push(RuleKind::HighRiskCountry);
            }
        }

        hits
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}
