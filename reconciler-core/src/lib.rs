//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - Configuration for source weights and agreement thresholds
//! - The observation model shared by both data sources
//! - The reconciliation engine that validates, merges and annotates a
//!   pair of observations, and the report renderer
//!
//! It is used by `reconciler-cli`, but can also be reused by other
//! binaries or services (a chat bot front end, a broadcast scheduler).

pub mod config;
pub mod observation;
pub mod reconcile;
pub mod report;

pub use config::{
    AgreementTolerances, OutlierThresholds, ReconcilerConfig, SourceWeights, WeightError,
};
pub use observation::{Observation, Value, field};
pub use reconcile::Reconciler;
pub use report::{MergedReport, Provenance, RecommendationCategory, render};
