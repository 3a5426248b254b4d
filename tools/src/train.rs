//! train-model: fit the fraud classifier on synthetic data and write it out.
//!
//! Usage:
//!   train-model
//!   train-model --seed 7 --samples 20000 --out models/fraud.joblib
//!   train-model --config trainer.json --trees 200

use anyhow::Result;
use clap::Parser;
use fraudscore_core::{config::TrainerConfig, trainer::train_and_save};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the fraud-scoring model on synthetic transactions")]
struct Args {
    /// JSON TrainerConfig; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic transactions to draw.
    #[arg(long)]
    samples: Option<usize>,

    #[arg(long)]
    test_fraction: Option<f64>,

    #[arg(long)]
    trees: Option<usize>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Where to write the model file.
    #[arg(long)]
    out: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<TrainerConfig> {
        let mut cfg = match &self.config {
            Some(path) => TrainerConfig::load(path)?,
            None => TrainerConfig::default(),
        };
        if let Some(seed) = self.seed { cfg.seed = seed; }
        if let Some(n) = self.samples { cfg.synthetic.samples = n; }
        if let Some(f) = self.test_fraction { cfg.test_fraction = f; }
        if let Some(t) = self.trees { cfg.booster.n_estimators = t; }
        if let Some(d) = self.max_depth { cfg.booster.max_depth = d; }
        if let Some(lr) = self.learning_rate { cfg.booster.learning_rate = lr; }
        if let Some(out) = self.out { cfg.model_path = out; }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cfg = Args::parse().into_config()?;
    log::info!(
        "Training {} trees (max depth {}) on {} samples, seed {}",
        cfg.booster.n_estimators,
        cfg.booster.max_depth,
        cfg.synthetic.samples,
        cfg.seed
    );

    let run = train_and_save(&cfg)?;

    match run.report.test_auc {
        Some(auc) => println!("AUC: {auc}"),
        None => println!("AUC: undefined (test set holds a single class)"),
    }
    println!("Model saved to {}", cfg.model_path);
    Ok(())
}
