//! Generator-unit contract and registry.
//!
//! A generator unit is the atomic entity of the test kit: an applicability
//! predicate plus an assembly synthesizer, with optional log-checking and
//! covergroup-emission capabilities. The [`registry::UnitRegistry`] is the
//! discovery service the pipelines run against; units register at
//! start-time, so no code is ever loaded from the filesystem.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod unit;

pub use error::{DiscoveryError, Result, UnitError};
pub use registry::{Discovery, UnitCtor, UnitRegistry, UnknownModule};
pub use unit::{CoverageEmit, LogCheck, TestUnit};
