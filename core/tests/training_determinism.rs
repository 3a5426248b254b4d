//! Same seed, same config → the same dataset, split, trees and AUC.
//! Any divergence means randomness leaked outside the RngBank.

use fraudscore_core::{
    config::TrainerConfig,
    dataset::{Dataset, SyntheticConfig},
    rng::{RngBank, StreamSlot},
    trainer::train,
};

fn small_config(seed: u64) -> TrainerConfig {
    let mut cfg = TrainerConfig { seed, ..Default::default() };
    cfg.synthetic.samples = 1500;
    cfg.booster.n_estimators = 25;
    cfg
}

#[test]
fn same_seed_produces_identical_runs() {
    let cfg = small_config(42);
    let run_a = train(&cfg).expect("run a");
    let run_b = train(&cfg).expect("run b");

    assert_eq!(run_a.train, run_b.train, "training sets diverged");
    assert_eq!(run_a.test, run_b.test, "test sets diverged");
    assert_eq!(run_a.model, run_b.model, "fitted ensembles diverged");
    assert_eq!(run_a.report, run_b.report, "held-out metrics diverged");
    assert_eq!(run_a.history, run_b.history);
}

#[test]
fn different_seeds_produce_different_datasets() {
    let a = Dataset::synthesize(
        &SyntheticConfig::default(),
        &mut RngBank::new(42).for_stream(StreamSlot::Synthetic),
    );
    let b = Dataset::synthesize(
        &SyntheticConfig::default(),
        &mut RngBank::new(99).for_stream(StreamSlot::Synthetic),
    );
    assert_ne!(a, b, "different seeds produced identical data; seed is not being used");
}

#[test]
fn split_stream_is_independent_of_synthetic_stream() {
    let bank = RngBank::new(42);
    let mut synth = bank.for_stream(StreamSlot::Synthetic);
    let mut split = bank.for_stream(StreamSlot::Split);
    let a: Vec<u64> = (0..8).map(|_| synth.next_u64_below(1_000_000)).collect();
    let b: Vec<u64> = (0..8).map(|_| split.next_u64_below(1_000_000)).collect();
    assert_ne!(a, b);
}

#[test]
fn split_sizes_follow_test_fraction() {
    let run = train(&small_config(7)).expect("train");
    assert_eq!(run.report.test_rows, 300);
    assert_eq!(run.report.train_rows, 1200);
    assert_eq!(run.train.len() + run.test.len(), 1500);
}
