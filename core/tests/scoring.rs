//! Scoring behaviour against the reference (seed 42) model.

use fraudscore_core::{
    config::TrainerConfig,
    features::FeatureVector,
    scorer::{ScoreRequest, Scorer},
    trainer::train,
};
use std::sync::OnceLock;

fn reference_scorer() -> &'static Scorer {
    static SCORER: OnceLock<Scorer> = OnceLock::new();
    SCORER.get_or_init(|| {
        let run = train(&TrainerConfig::default()).expect("reference training run");
        Scorer::new(run.model)
    })
}

fn request(country: Option<&str>) -> ScoreRequest {
    ScoreRequest {
        amount: 100.0,
        account_age: 10,
        is_new_device: false,
        country: country.map(String::from),
    }
}

#[test]
fn scores_are_probabilities() {
    let scorer = reference_scorer();
    for amount in [0.0, 1.0, 50.0, 250.0, 1000.0, 25_000.0] {
        for account_age in [0, 30, 364, 5000] {
            for is_new_device in [false, true] {
                for country in [None, Some("US"), Some("RU")] {
                    let req = ScoreRequest {
                        amount,
                        account_age,
                        is_new_device,
                        country: country.map(String::from),
                    };
                    let score = scorer.score(&req).expect("score").score;
                    assert!(
                        score.is_finite() && (0.0..=1.0).contains(&score),
                        "score {score} out of range for {req:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn country_matching_ignores_case() {
    let scorer = reference_scorer();
    let lower = scorer.score(&request(Some("ru"))).unwrap();
    let upper = scorer.score(&request(Some("RU"))).unwrap();
    assert_eq!(lower, upper);
    assert!(request(Some("ru")).features().country_risk);
}

#[test]
fn absent_and_safe_countries_are_indistinguishable() {
    let scorer = reference_scorer();
    assert_eq!(request(None).features(), request(Some("US")).features());
    assert_eq!(
        scorer.score(&request(None)).unwrap(),
        scorer.score(&request(Some("US"))).unwrap()
    );
    assert_eq!(
        scorer.score(&request(Some(""))).unwrap(),
        scorer.score(&request(None)).unwrap()
    );
}

#[test]
fn repeated_requests_score_identically() {
    let scorer = reference_scorer();
    let req = request(Some("NG"));
    let first = scorer.score(&req).unwrap();
    for _ in 0..10 {
        assert_eq!(scorer.score(&req).unwrap(), first);
    }
}

#[test]
fn low_risk_transaction_scores_low() {
    let scorer = reference_scorer();
    let req = ScoreRequest {
        amount: 50.0,
        account_age: 200,
        is_new_device: false,
        country: Some("US".into()),
    };
    let score = scorer.score(&req).unwrap().score;
    assert!(score < 0.5, "expected a low score, got {score}");

    // A fresh model from the same seed gives the same number.
    let again = Scorer::new(train(&TrainerConfig::default()).unwrap().model);
    assert_eq!(again.score(&req).unwrap().score, score);
}

#[test]
fn risk_factors_raise_the_score() {
    let scorer = reference_scorer();
    let quiet = FeatureVector {
        amount: 50.0,
        account_age: 200,
        is_new_device: false,
        country_risk: false,
    };
    let loud = FeatureVector {
        amount: 1500.0,
        account_age: 5,
        is_new_device: true,
        country_risk: false,
    };
    let quiet_score = scorer.score_features(&quiet).unwrap();
    let loud_score = scorer.score_features(&loud).unwrap();
    assert!(
        loud_score > quiet_score,
        "large new-device transaction ({loud_score}) should outscore a quiet one ({quiet_score})"
    );
}

#[test]
fn reference_model_beats_chance() {
    let run = train(&TrainerConfig::default()).unwrap();
    let auc = run.report.test_auc.expect("both classes in test set");
    assert!(auc > 0.6, "held-out AUC {auc}");
    assert_eq!(run.model.n_trees(), 100);
    assert!(run.model.trees().iter().all(|t| t.depth() <= 4));
}
