//! `uatk from-config` — drive a whole invocation from a run-config file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use uatk_config::RunConfig;

use crate::commands;

/// Execute the stages enabled in the run-config file, in the fixed order
/// clean → generate (+covergroups) → validate.
pub fn run(config_path: &Path) -> Result<()> {
    let run = RunConfig::load(config_path)
        .with_context(|| format!("loading run config {}", config_path.display()))?;
    crate::init_tracing(&run.verbose);

    if run.gen_cvg && !run.gen_test {
        bail!("cannot generate covergroups without generating the tests");
    }

    if run.clean {
        tracing::debug!("invoking clean");
        commands::clean::run(&run.work_dir)?;
    }

    if run.gen_test {
        let dut_config = run
            .dut_config
            .as_deref()
            .context("gen_test requires dut_config in the run config")?;
        commands::generate::run(
            dut_config,
            &run.work_dir,
            &run.modules,
            run.gen_test_list,
            run.gen_cvg,
            run.alias_file.as_deref(),
            run.linker_dir.as_deref(),
        )?;
    }

    if run.val_test {
        let dut_config = run
            .dut_config
            .as_deref()
            .context("val_test requires dut_config in the run config")?;
        commands::validate::run(dut_config, &run.work_dir, &run.modules)?;
    }

    Ok(())
}
