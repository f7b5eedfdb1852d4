//! `uatk validate` — minimal log checking against runner output.

use std::path::Path;

use anyhow::{bail, Context, Result};
use uatk_config::{split_module_list, DutConfig};
use uatk_units::UnitRegistry;
use uatk_validate::validate_tests;

/// Run log validation for the requested modules.
pub fn run(dut_config: &Path, work_dir: &Path, modules: &str) -> Result<()> {
    let requested = split_module_list(modules);
    if requested.is_empty() {
        bail!("no modules requested");
    }

    let config = DutConfig::load(dut_config)
        .with_context(|| format!("loading DUT configuration {}", dut_config.display()))?;
    let registry = UnitRegistry::with_builtin();

    let summary = validate_tests(&registry, &config, &requested, work_dir)?;
    print!("{summary}");

    if summary.failed() > 0 {
        bail!("{} test(s) failed minimal log checking", summary.failed());
    }
    Ok(())
}
