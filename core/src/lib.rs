//! fraudscore-core: synthetic training data, a gradient-boosted fraud
//! classifier, and the HTTP scoring service built on it.
//!
//! The trainer and the scorer share nothing at runtime except the model
//! file written by `artifact::save_model`.

pub mod api;
pub mod artifact;
pub mod booster;
pub mod config;
pub mod dataset;
pub mod decision;
pub mod error;
pub mod features;
pub mod metrics;
pub mod rng;
pub mod rules;
pub mod scorer;
pub mod trainer;
