//! Data cleaning module.
//!
//! This module provides the two analysis passes that run before imputation:
//! - Detecting and separating exact duplicate rows
//! - Counting missing values per column

mod duplicates;
mod missing;

pub use duplicates::{DuplicateDetector, DuplicateReport};
pub use missing::MissingValueAnalyzer;
