//! Configuration artifacts consumed by the uatk pipelines.
//!
//! Three TOML surfaces live here: the DUT configuration (`ISA` plus one
//! free-form parameter table per module), the signal alias map used by
//! covergroup emission, and the run-config file that drives a full
//! invocation without command-line flags.

pub mod alias;
pub mod dut;
pub mod error;
pub mod run;

pub use alias::AliasMap;
pub use dut::{DutConfig, ModuleParams};
pub use error::{ConfigError, Result};
pub use run::{split_module_list, RunConfig};
