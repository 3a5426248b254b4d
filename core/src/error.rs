use thiserror::Error;

#[derive(Error, Debug)]
pub enum FraudError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact error: {0}")]
    Artifact(#[from] bincode::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Dataset shape mismatch: {rows} rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Malformed model: {reason}")]
    MalformedModel { reason: String },

    #[error("Model produced a non-finite score for input {input:?}")]
    NonFiniteScore { input: [f64; 4] },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FraudResult<T> = Result<T, FraudError>;
