//! Imputation module for resolving missing values.
//!
//! This module provides:
//! - Statistical primitives (mean fill, missing-row removal)
//! - The per-column engine that applies them in schema order

mod engine;
mod statistical;

pub use engine::{ImputationEngine, ImputationOutcome};
pub use statistical::StatisticalImputer;
