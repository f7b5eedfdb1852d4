//! The generator-unit contract.
//!
//! A unit is one applicability/synthesis pair producing at most one test
//! case per generation run. Log checking and covergroup emission are
//! optional capabilities, queried explicitly instead of probed at runtime:
//! a unit that returns `None` from [`TestUnit::log_check`] is simply
//! excluded from validation, never treated as a failure.

use std::path::Path;

use uatk_config::{AliasMap, ModuleParams};

use crate::error::Result;

/// A single generator unit.
///
/// `is_applicable` takes `&mut self` because units may parameterize
/// themselves from the module table (e.g. pick a recursion depth) before
/// answering; it must still be idempotent for a given parameter table,
/// since validation re-evaluates it independently of generation.
pub trait TestUnit {
    /// Unit name, unique within its module. Doubles as the test-case
    /// directory and file stem (`<name>/<name>.S`).
    fn name(&self) -> &str;

    /// Whether this unit applies to the configured DUT. Missing parameter
    /// keys mean "use defaults", never "not applicable".
    fn is_applicable(&mut self, params: &ModuleParams) -> bool;

    /// Produce the assembly body. `None` (or empty text) means there is
    /// nothing to emit even though the unit is applicable.
    fn synthesize(&self) -> Result<Option<String>>;

    /// Log-checking capability, if the unit has one.
    fn log_check(&self) -> Option<&dyn LogCheck> {
        None
    }

    /// Covergroup-emission capability, if the unit has one.
    fn coverage(&self) -> Option<&dyn CoverageEmit> {
        None
    }
}

/// Optional capability: classify an execution log as pass/fail.
pub trait LogCheck {
    /// Inspect the log at `log_path` and return the verdict. The unit may
    /// drop a per-unit report file into `reports_dir`. The log format is
    /// opaque to the pipeline; only the unit interprets it.
    fn check_log(&self, log_path: &Path, reports_dir: &Path) -> Result<bool>;
}

/// Optional capability: emit SystemVerilog covergroup text.
pub trait CoverageEmit {
    /// Produce covergroup text, resolving DUT signal paths through the
    /// alias map.
    fn emit_covergroups(&self, aliases: &AliasMap) -> String;
}
