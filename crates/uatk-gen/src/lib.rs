//! Test generation pipeline.
//!
//! Turns a DUT configuration plus a unit registry into materialized
//! assembly test cases, an optional runner manifest, covergroup text, and
//! the static support files the tests build against.

pub mod artifacts;
pub mod boilerplate;
pub mod coverage;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod testcase;

pub use boilerplate::{AsmBoilerplate, BoilerplateContext};
pub use coverage::{generate_coverage, CoverageOutcome};
pub use error::{GenError, Result};
pub use manifest::{TestEntry, TestManifest, RESULT_UNAVAILABLE};
pub use pipeline::{generate_tests, GenerateOptions, GenerateOutcome, ModuleOutcome, UnitFault};
