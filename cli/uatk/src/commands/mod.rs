//! CLI command implementations.

pub mod clean;
pub mod from_config;
pub mod generate;
pub mod modules;
pub mod validate;
