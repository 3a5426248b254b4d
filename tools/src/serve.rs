//! score-server: load the trained model once and serve fraud scores.
//!
//! Usage:
//!   score-server
//!   score-server --model models/fraud.joblib --bind 127.0.0.1:9000
//!   PORT=8080 score-server --config scorer.json

use anyhow::{Context, Result};
use clap::Parser;
use fraudscore_core::{
    api::{build_router, AppState},
    config::ScorerConfig,
    decision::FraudChecker,
    rules::RuleEngine,
    scorer::Scorer,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve fraud scores from a trained model")]
struct Args {
    /// JSON ScorerConfig; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model file written by train-model.
    #[arg(long)]
    model: Option<String>,

    /// Listen address, e.g. 0.0.0.0:8000.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on all interfaces; ignored when --bind is given.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

impl Args {
    fn into_config(self) -> Result<ScorerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ScorerConfig::load(path)?,
            None => ScorerConfig::default(),
        };
        if let Some(model) = self.model { cfg.model_path = model; }
        match (self.bind, self.port) {
            (Some(bind), _) => cfg.bind = bind,
            (None, Some(port)) => cfg.bind = format!("0.0.0.0:{port}"),
            (None, None) => {}
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cfg = Args::parse().into_config()?;

    // Loaded once, before any request is accepted; failure is fatal.
    let scorer = Scorer::from_path(&cfg.model_path)
        .with_context(|| format!("Cannot load model from {}", cfg.model_path))?;

    let state = Arc::new(AppState {
        scorer,
        checker: FraudChecker::new(RuleEngine::new(cfg.rules.clone()), cfg.decision.clone()),
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("Cannot bind {}", cfg.bind))?;
    log::info!("Fraud scoring service listening on {}", cfg.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
