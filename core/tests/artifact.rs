//! Model file round trips and load failures.

use fraudscore_core::{
    artifact::{load_model, save_model},
    booster::{BoosterParams, GradientBoostedTrees},
    config::TrainerConfig,
    error::FraudError,
    scorer::Scorer,
    trainer::{train, train_and_save},
};
use serde_json::{json, Value};
use std::path::Path;

fn quick_config() -> TrainerConfig {
    let mut cfg = TrainerConfig::default();
    cfg.synthetic.samples = 800;
    cfg.booster.n_estimators = 10;
    cfg
}

#[test]
fn loaded_model_predicts_exactly_like_the_fitted_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");

    let run = train(&quick_config()).unwrap();
    save_model(&run.model, &path).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded, run.model);
    for row in run.test.matrix() {
        assert_eq!(
            loaded.predict_proba(&row).unwrap().to_bits(),
            run.model.predict_proba(&row).unwrap().to_bits()
        );
    }
}

#[test]
fn train_and_save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    std::fs::write(&path, b"stale bytes").unwrap();

    let mut cfg = quick_config();
    cfg.model_path = path.to_string_lossy().into_owned();
    let run = train_and_save(&cfg).unwrap();

    assert_eq!(load_model(&path).unwrap(), run.model);
}

#[test]
fn missing_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let result = Scorer::from_path(dir.path().join("nope.joblib"));
    assert!(matches!(result, Err(FraudError::Io { .. })));
}

#[test]
fn corrupt_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    std::fs::write(&path, b"definitely not a model").unwrap();
    assert!(Scorer::from_path(&path).is_err());
}

#[test]
fn model_with_wrong_feature_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");

    let x: Vec<[f64; 2]> = (0..40).map(|i| [i as f64, (i % 3) as f64]).collect();
    let y: Vec<bool> = (0..40).map(|i| i > 20).collect();
    let params = BoosterParams { n_estimators: 2, ..Default::default() };
    let (model, _) = GradientBoostedTrees::fit(&params, &x, &y, None).unwrap();
    save_model(&model, &path).unwrap();

    assert!(matches!(
        load_model(&path),
        Err(FraudError::FeatureCount { expected: 4, actual: 2 })
    ));
}

/// Write a four-feature model with a single hand-built tree.
fn save_single_tree(path: &Path, nodes: Value) {
    let model: GradientBoostedTrees = serde_json::from_value(json!({
        "params": {},
        "n_features": 4,
        "base_margin": 0.0,
        "trees": [{ "nodes": nodes }]
    }))
    .expect("hand-built model");
    save_model(&model, path).unwrap();
}

fn assert_malformed(path: &Path) {
    assert!(
        matches!(load_model(path), Err(FraudError::MalformedModel { .. })),
        "malformed model was accepted"
    );
    assert!(Scorer::from_path(path).is_err());
}

#[test]
fn empty_tree_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    save_single_tree(&path, json!([]));
    assert_malformed(&path);
}

#[test]
fn split_on_unknown_feature_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    save_single_tree(
        &path,
        json!([
            { "Split": { "feature": 9, "threshold": 1.0, "left": 1, "right": 2 } },
            { "Leaf": { "weight": -0.1 } },
            { "Leaf": { "weight": 0.1 } }
        ]),
    );
    assert_malformed(&path);
}

#[test]
fn child_index_past_the_arena_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    save_single_tree(
        &path,
        json!([
            { "Split": { "feature": 0, "threshold": 1.0, "left": 1, "right": 7 } },
            { "Leaf": { "weight": -0.1 } }
        ]),
    );
    assert_malformed(&path);
}

#[test]
fn self_referencing_split_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    save_single_tree(
        &path,
        json!([
            { "Split": { "feature": 0, "threshold": 1.0, "left": 0, "right": 0 } }
        ]),
    );
    assert_malformed(&path);
}

#[test]
fn well_formed_hand_built_tree_loads_and_scores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.joblib");
    save_single_tree(
        &path,
        json!([
            { "Split": { "feature": 0, "threshold": 100.0, "left": 1, "right": 2 } },
            { "Leaf": { "weight": -1.0 } },
            { "Leaf": { "weight": 1.0 } }
        ]),
    );
    let model = load_model(&path).unwrap();
    assert!(model.predict_proba(&[10.0, 0.0, 0.0, 0.0]).unwrap() < 0.5);
    assert!(model.predict_proba(&[500.0, 0.0, 0.0, 0.0]).unwrap() > 0.5);
}
