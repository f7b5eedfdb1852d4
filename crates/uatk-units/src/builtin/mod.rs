//! Built-in generator units shipped with uatk.

pub mod branch_predictor;

use crate::registry::UnitRegistry;

/// Register every built-in module.
pub fn register(registry: &mut UnitRegistry) {
    branch_predictor::register(registry);
}
