//! The model file shared by trainer and scorer.
//!
//! RULE: Only this module reads or writes the model file.
//! The file is the bincode encoding of a fitted GradientBoostedTrees;
//! it carries no version header.

use crate::{
    booster::GradientBoostedTrees,
    error::{FraudError, FraudResult},
    features::FEATURE_COUNT,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model.joblib";

/// Write `model` to `path`, replacing any existing file.
pub fn save_model(model: &GradientBoostedTrees, path: impl AsRef<Path>) -> FraudResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, model)?;
    writer.flush().map_err(|source| io_error(path, source))?;
    log::info!("Model written to {}", path.display());
    Ok(())
}

/// Read a model written by save_model.
///
/// Fails if the file is missing, not a model, was fitted on a different
/// number of features than FEATURE_COUNT, or holds a tree that cannot be
/// walked safely.
pub fn load_model(path: impl AsRef<Path>) -> FraudResult<GradientBoostedTrees> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let model: GradientBoostedTrees = bincode::deserialize_from(BufReader::new(file))?;
    if model.n_features() != FEATURE_COUNT {
        return Err(FraudError::FeatureCount {
            expected: FEATURE_COUNT,
            actual: model.n_features(),
        });
    }
    model.validate()?;
    log::info!(
        "Model loaded from {} ({} trees)",
        path.display(),
        model.n_trees()
    );
    Ok(model)
}

fn io_error(path: &Path, source: std::io::Error) -> FraudError {
    FraudError::Io {
        path: path.display().to_string(),
        source,
    }
}
