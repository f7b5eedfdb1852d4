//! Unit registry: the discovery service.
//!
//! Units are registered at start-time as `module name -> constructor`
//! entries; no code is loaded from disk. Discovery instantiates fresh unit
//! objects on every call so that generation and validation see identical,
//! independently parameterized units. Output order is name-sorted, making
//! repeated runs with the same registration set reproduce the same files.

use std::collections::BTreeMap;

use crate::builtin;
use crate::error::{DiscoveryError, Result, UnitError};
use crate::unit::TestUnit;

/// Constructor for one registered unit.
pub type UnitCtor = fn() -> Result<Box<dyn TestUnit>>;

/// The module-not-known boundary error.
#[derive(Debug, thiserror::Error)]
#[error("module '{0}' is not supported/unavailable")]
pub struct UnknownModule(pub String);

/// Result of discovering one module's units.
pub struct Discovery {
    /// Successfully loaded units, sorted by name.
    pub units: Vec<Box<dyn TestUnit>>,
    /// Per-unit faults (constructor failures, duplicate names). The run
    /// continues past these.
    pub errors: Vec<DiscoveryError>,
}

/// Start-time registry of generator units, keyed by module.
pub struct UnitRegistry {
    modules: BTreeMap<String, Vec<UnitCtor>>,
}

impl UnitRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        UnitRegistry {
            modules: BTreeMap::new(),
        }
    }

    /// A registry preloaded with the built-in modules.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Register a unit constructor under a module.
    pub fn register(&mut self, module: &str, ctor: UnitCtor) {
        self.modules.entry(module.to_string()).or_default().push(ctor);
    }

    /// Registered module names, sorted.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Whether a module is registered.
    pub fn contains_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Expand a requested module list, resolving the `all` sentinel and
    /// rejecting unknown names up front (boundary configuration error).
    pub fn resolve_modules(
        &self,
        requested: &[String],
    ) -> std::result::Result<Vec<String>, UnknownModule> {
        if requested.iter().any(|m| m == "all") {
            return Ok(self.modules.keys().cloned().collect());
        }
        for name in requested {
            if !self.contains_module(name) {
                return Err(UnknownModule(name.clone()));
            }
        }
        Ok(requested.to_vec())
    }

    /// Instantiate a module's units.
    ///
    /// Constructor failures and duplicate names are collected as
    /// [`DiscoveryError`]s while the remaining units load; a duplicate
    /// keeps the first-loaded unit and excludes the rest.
    pub fn discover(&self, module: &str) -> Discovery {
        let mut units: Vec<Box<dyn TestUnit>> = Vec::new();
        let mut errors = Vec::new();

        let Some(ctors) = self.modules.get(module) else {
            errors.push(DiscoveryError::Load {
                module: module.to_string(),
                source: UnitError::Construct {
                    detail: format!("module '{module}' has no registered units"),
                },
            });
            return Discovery { units, errors };
        };

        for ctor in ctors {
            match ctor() {
                Ok(unit) => units.push(unit),
                Err(e) => errors.push(DiscoveryError::Load {
                    module: module.to_string(),
                    source: e,
                }),
            }
        }

        units.sort_by(|a, b| a.name().cmp(b.name()));

        let mut deduped: Vec<Box<dyn TestUnit>> = Vec::with_capacity(units.len());
        for unit in units {
            if deduped.last().is_some_and(|prev| prev.name() == unit.name()) {
                errors.push(DiscoveryError::DuplicateName {
                    module: module.to_string(),
                    name: unit.name().to_string(),
                });
            } else {
                deduped.push(unit);
            }
        }

        Discovery {
            units: deduped,
            errors,
        }
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
