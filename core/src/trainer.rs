//! Offline training run: synthesize, split, fit, evaluate, save.
//!
//! ORDER (fixed, part of the reproducibility contract):
//!   1. Synthesize the dataset from the `synthetic` stream.
//!   2. Split train/test from the `split` stream.
//!   3. Fit the booster on train, tracking test log-loss each round.
//!   4. Score the test set and compute AUC.
//!
//! Saving is a separate step so tests can train without touching disk.

use crate::{
    artifact::save_model,
    booster::{GradientBoostedTrees, TrainingHistory},
    config::TrainerConfig,
    dataset::Dataset,
    error::FraudResult,
    features::FEATURE_NAMES,
    metrics::{log_loss, roc_auc},
    rng::{RngBank, StreamSlot},
};

/// Everything a training run produces.
pub struct TrainingRun {
    pub model:   GradientBoostedTrees,
    pub history: TrainingHistory,
    pub train:   Dataset,
    pub test:    Dataset,
    pub report:  TrainingReport,
}

/// Held-out diagnostics. Printed, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub seed:          u64,
    pub train_rows:    usize,
    pub test_rows:     usize,
    pub fraud_rate:    f64,
    /// None when the test set holds a single class.
    pub test_auc:      Option<f64>,
    pub test_logloss:  f64,
}

pub fn train(config: &TrainerConfig) -> FraudResult<TrainingRun> {
    config.validate()?;
    let bank = RngBank::new(config.seed);

    let mut synth_rng = bank.for_stream(StreamSlot::Synthetic);
    let dataset = Dataset::synthesize(&config.synthetic, &mut synth_rng);
    let fraud_rate = dataset.positives() as f64 / dataset.len() as f64;
    log::info!(
        "Synthesized {} transactions (seed {}, fraud rate {:.3})",
        dataset.len(),
        bank.master_seed(),
        fraud_rate
    );

    let mut split_rng = bank.for_stream(StreamSlot::Split);
    let (train, test) = dataset.train_test_split(config.test_fraction, &mut split_rng);
    log::info!("Split into {} train / {} test rows", train.len(), test.len());

    let x_train = train.matrix();
    let x_test = test.matrix();
    let (model, history) = GradientBoostedTrees::fit(
        &config.booster,
        &x_train,
        &train.labels,
        Some((x_test.as_slice(), test.labels.as_slice())),
    )?;

    for (name, gain) in FEATURE_NAMES.iter().zip(&history.feature_gain) {
        log::info!("feature {name:<14} total gain {gain:.3}");
    }

    let preds = model.predict_proba_batch(&x_test)?;
    let test_auc = roc_auc(&test.labels, &preds);
    let test_logloss = log_loss(&test.labels, &preds);
    match test_auc {
        Some(auc) => log::info!("Held-out AUC {auc:.4}, log-loss {test_logloss:.5}"),
        None => log::warn!("Test set holds a single class; AUC is undefined"),
    }

    let report = TrainingReport {
        seed: config.seed,
        train_rows: train.len(),
        test_rows: test.len(),
        fraud_rate,
        test_auc,
        test_logloss,
    };

    Ok(TrainingRun { model, history, train, test, report })
}

/// Train and write the model to `config.model_path`.
pub fn train_and_save(config: &TrainerConfig) -> FraudResult<TrainingRun> {
    let run = train(config)?;
    save_model(&run.model, &config.model_path)?;
    Ok(run)
}
