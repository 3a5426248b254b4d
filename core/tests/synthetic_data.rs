//! Distribution checks on the synthetic training population.

use fraudscore_core::{
    dataset::{sigmoid, Dataset, SyntheticConfig},
    features::FeatureVector,
    rng::{RngBank, StreamSlot},
};

fn reference_dataset() -> Dataset {
    let mut rng = RngBank::new(42).for_stream(StreamSlot::Synthetic);
    Dataset::synthesize(&SyntheticConfig::default(), &mut rng)
}

#[test]
fn sample_count_matches_config() {
    let ds = reference_dataset();
    assert_eq!(ds.len(), 5000);
    assert_eq!(ds.labels.len(), 5000);
}

#[test]
fn feature_ranges_are_respected() {
    let ds = reference_dataset();
    for fv in &ds.rows {
        assert!(fv.amount >= 0.0 && fv.amount.is_finite(), "amount {}", fv.amount);
        assert!(fv.account_age < 365, "account_age {}", fv.account_age);
    }
}

#[test]
fn marginal_rates_are_close_to_targets() {
    let ds = reference_dataset();
    let n = ds.len() as f64;

    let mean_amount = ds.rows.iter().map(|r| r.amount).sum::<f64>() / n;
    assert!((170.0..230.0).contains(&mean_amount), "mean amount {mean_amount}");

    let mean_age = ds.rows.iter().map(|r| r.account_age as f64).sum::<f64>() / n;
    assert!((172.0..192.0).contains(&mean_age), "mean account_age {mean_age}");

    let new_device = ds.rows.iter().filter(|r| r.is_new_device).count() as f64 / n;
    assert!((0.08..0.12).contains(&new_device), "new device rate {new_device}");

    let risky = ds.rows.iter().filter(|r| r.country_risk).count() as f64 / n;
    assert!((0.01..0.03).contains(&risky), "country risk rate {risky}");
}

#[test]
fn fraud_rate_tracks_latent_model() {
    let cfg = SyntheticConfig::default();
    let ds = reference_dataset();
    let expected: f64 = ds.rows.iter().map(|r| sigmoid(cfg.logit(r))).sum::<f64>() / ds.len() as f64;
    let observed = ds.positives() as f64 / ds.len() as f64;
    assert!(
        (observed - expected).abs() < 0.02,
        "observed fraud rate {observed} vs expected {expected}"
    );
}

#[test]
fn latent_logit_uses_documented_weights() {
    let cfg = SyntheticConfig::default();
    let fv = FeatureVector {
        amount: 100.0,
        account_age: 50,
        is_new_device: true,
        country_risk: true,
    };
    let expected = -3.0 + 0.5 + 1.2 + 2.5 - 0.1;
    assert!((cfg.logit(&fv) - expected).abs() < 1e-12);
}
