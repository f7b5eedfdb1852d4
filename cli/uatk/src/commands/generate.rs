//! `uatk generate` — generate assembly tests and optional covergroups.

use std::path::Path;

use anyhow::{bail, Context, Result};
use uatk_config::{split_module_list, AliasMap, DutConfig};
use uatk_gen::{generate_coverage, generate_tests, BoilerplateContext, GenerateOptions};
use uatk_units::UnitRegistry;

/// Run test generation for the requested modules.
pub fn run(
    dut_config: &Path,
    work_dir: &Path,
    modules: &str,
    test_list: bool,
    gen_cvg: bool,
    alias_file: Option<&Path>,
    linker_dir: Option<&Path>,
) -> Result<()> {
    let requested = split_module_list(modules);
    if requested.is_empty() {
        bail!("no modules requested");
    }
    let cvg_alias = match (gen_cvg, alias_file) {
        (true, Some(path)) => Some(path),
        (true, None) => bail!("cannot generate covergroups without an alias file (--alias-file)"),
        (false, _) => None,
    };

    let config = DutConfig::load(dut_config)
        .with_context(|| format!("loading DUT configuration {}", dut_config.display()))?;
    let registry = UnitRegistry::with_builtin();

    let opts = GenerateOptions {
        work_dir: work_dir.to_path_buf(),
        linker_dir: linker_dir.map(Path::to_path_buf),
        emit_manifest: test_list,
        boilerplate: BoilerplateContext::current(&config.isa),
    };
    let outcome = generate_tests(&registry, &config, &requested, &opts)?;

    for module in &outcome.modules {
        println!(
            "{}: {} generated, {} skipped",
            module.module,
            module.generated.len(),
            module.skipped.len()
        );
        if let Some(error) = &module.error {
            println!("  module failed: {error}");
        }
        for err in &module.discovery_errors {
            println!("  discovery error: {err}");
        }
        for fault in &module.faults {
            println!("  {} failed: {}", fault.unit, fault.detail);
        }
    }
    if let Some(path) = &outcome.manifest_path {
        println!("test manifest: {}", path.display());
    }

    if let Some(alias_path) = cvg_alias {
        let aliases = AliasMap::load(alias_path)
            .with_context(|| format!("loading alias map {}", alias_path.display()))?;
        let coverage = generate_coverage(&registry, &config, &requested, work_dir, &aliases)?;
        println!(
            "covergroups: {} unit(s) emitted into {}",
            coverage.emitted.len(),
            coverage.coverpoints_file.display()
        );
    }

    let faulted: usize = outcome
        .modules
        .iter()
        .map(|m| {
            m.faults.len() + m.discovery_errors.len() + usize::from(m.error.is_some())
        })
        .sum();
    if faulted > 0 {
        bail!("generation completed with {faulted} fault(s); see the log for details");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_builtin_tests_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let dut = dir.path().join("dut_config.toml");
        std::fs::write(
            &dut,
            "ISA = \"rv64imafdc\"\n\n[branch_predictor]\nhistory_len = 4\n",
        )
        .unwrap();
        let work = dir.path().join("work");

        run(&dut, &work, "branch_predictor", true, false, None, None).unwrap();

        assert!(work.join("test_list.toml").is_file());
        assert!(work.join("link.ld").is_file());
        assert!(work
            .join("branch_predictor/gshare_fa_fence_01/gshare_fa_fence_01.S")
            .is_file());
    }

    #[test]
    fn covergroups_require_an_alias_file() {
        let dir = tempfile::tempdir().unwrap();
        let dut = dir.path().join("dut_config.toml");
        std::fs::write(&dut, "ISA = \"rv64i\"\n").unwrap();

        let err = run(&dut, dir.path(), "all", false, true, None, None).unwrap_err();
        assert!(err.to_string().contains("alias file"));
    }

    #[test]
    fn unknown_module_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dut = dir.path().join("dut_config.toml");
        std::fs::write(&dut, "ISA = \"rv64i\"\n").unwrap();

        let err = run(&dut, dir.path(), "mmu", false, false, None, None).unwrap_err();
        assert!(err.to_string().contains("mmu"));
    }
}
