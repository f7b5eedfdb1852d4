//! Execution-log validation pipeline.
//!
//! Consumes the logs the external runner left next to each generated test
//! case, classifies them through each unit's log-check capability, and
//! produces per-module and joined validation reports.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::{Result, ValidateError};
pub use pipeline::validate_tests;
pub use report::{ModuleReport, UnitOutcome, ValidationSummary, Verdict};
