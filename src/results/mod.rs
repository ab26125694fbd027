//! Student results: loading, per-student classification and aggregation.
//!
//! Rows come from CSV exports or the results backend, are classified one by
//! one, then rolled up into overall and per-class distributions.

pub mod aggregate;
pub mod loader;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate_results, classify_results};
pub use loader::{load_results, parse_results_csv, parse_results_json};
pub use types::{
    ClassAggregate, ClassificationDistribution, ClassifiedStudent, EvaluationAggregate,
    StudentResult,
};
