//! Fraud-check gateway: rules first, then the model, then a decision.
//!
//! FLOW:
//!   1. Run every rule. Any hit → BLOCK at the rule score; model skipped.
//!   2. Score with the model, clamped to [0, 1].
//!   3. Map the score onto ALLOW / REVIEW / BLOCK.
//!   4. If the model fails, degrade to REVIEW at the fallback score and
//!      surface the error alongside the decision.
//!
//! Each decision is written to the log as an audit line; nothing is stored.

use crate::{
    config::DecisionConfig,
    features::FeatureVector,
    rules::{RuleEngine, Transaction},
    scorer::Scorer,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Review,
    Block,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allow  => "ALLOW",
            Self::Review => "REVIEW",
            Self::Block  => "BLOCK",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudCheckOutcome {
    pub score:    f64,
    pub decision: Decision,
    pub reasons:  Vec<String>,
    /// Set only when the model could not be consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:    Option<String>,
}

pub struct FraudChecker {
    rules:      RuleEngine,
    thresholds: DecisionConfig,
}

impl FraudChecker {
    pub fn new(rules: RuleEngine, thresholds: DecisionConfig) -> Self {
        Self { rules, thresholds }
    }

    pub fn classify(&self, score: f64) -> Decision {
        if score >= self.thresholds.block_threshold {
            Decision::Block
        } else if score >= self.thresholds.review_threshold {
            Decision::Review
        } else {
            Decision::Allow
        }
    }

    /// Outcome for a model score, clamped to [0, 1] first.
    fn model_outcome(&self, raw: f64) -> FraudCheckOutcome {
        let score = raw.clamp(0.0, 1.0);
        FraudCheckOutcome {
            score,
            decision: self.classify(score),
            reasons:  Vec::new(),
            error:    None,
        }
    }

    pub fn check(&self, tx: &Transaction, scorer: &Scorer) -> FraudCheckOutcome {
        let hits = self.rules.evaluate(tx);
        let outcome = if !hits.is_empty() {
            FraudCheckOutcome {
                score:    self.thresholds.rule_block_score,
                decision: Decision::Block,
                reasons:  hits.iter().map(|r| r.reason().to_string()).collect(),
                error:    None,
            }
        } else {
            match scorer.score_features(&model_features(tx)) {
                Ok(raw) => self.model_outcome(raw),
                Err(e) => FraudCheckOutcome {
                    score:    self.thresholds.fallback_score,
                    decision: Decision::Review,
                    reasons:  vec![format!("Model call failed: {e}")],
                    error:    Some(e.to_string()),
                },
            }
        };

        log::info!(
            "fraud-check transaction_id={} user_id={} amount={:.2} score={:.4} decision={} reasons={:?}",
            tx.id,
            tx.user_id,
            tx.amount,
            outcome.score,
            outcome.decision,
            outcome.reasons
        );
        outcome
    }
}

/// Project a gateway transaction onto the model's input contract.
/// Negative account ages are floored at zero.
fn model_features(tx: &Transaction) -> FeatureVector {
    let scoring = crate::scorer::ScoreRequest {
        amount:        tx.amount,
        account_age:   tx.account_age_days.clamp(0, u32::MAX as i64) as u32,
        is_new_device: tx.is_new_device,
        country:       tx.country.clone(),
    };
    scoring.features()
}
