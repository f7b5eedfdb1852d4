//! SystemVerilog covergroup emission.
//!
//! Shares the generation pipeline's dispatch shape: per module, discover
//! units, gate on applicability, then collect covergroup text from units
//! exposing the coverage capability. Units without the capability are
//! expected and skipped silently. Output lands under `<work_dir>/sv_top/`:
//! fixed interface/testbench/defines boilerplate plus one concatenated
//! `coverpoints.sv`.

use std::path::{Path, PathBuf};

use uatk_config::{AliasMap, DutConfig};
use uatk_units::UnitRegistry;

use crate::error::{GenError, Result};

/// Result of a coverage-emission run.
#[derive(Debug)]
pub struct CoverageOutcome {
    /// Units whose covergroups were emitted.
    pub emitted: Vec<String>,
    /// Applicable units without the coverage capability (expected).
    pub without_capability: Vec<String>,
    /// Units skipped by the applicability gate.
    pub not_applicable: Vec<String>,
    /// Path of the concatenated coverpoints file.
    pub coverpoints_file: PathBuf,
}

fn write_component(sv_dir: &Path, name: &str, text: String) -> Result<()> {
    let path = sv_dir.join(name);
    std::fs::write(&path, text).map_err(|e| GenError::Write {
        path,
        detail: e.to_string(),
    })
}

/// Emit the shared interface/testbench/defines files.
fn write_sv_components(sv_dir: &Path, aliases: &AliasMap) -> Result<()> {
    let clk = aliases.resolve("clk", "tb_top.clk");
    let reset = aliases.resolve("reset", "tb_top.reset");

    write_component(
        sv_dir,
        "interface.sv",
        format!(
            "interface uatk_if (input logic clk);\n\
             \x20 logic reset;\n\
             \x20 assign reset = {reset};\n\
             endinterface\n"
        ),
    )?;
    write_component(
        sv_dir,
        "tb_top.sv",
        format!(
            "module tb_top;\n\
             \x20 logic clk;\n\
             \x20 uatk_if u_if (.clk({clk}));\n\
             \x20 `include \"coverpoints.sv\"\n\
             endmodule\n"
        ),
    )?;
    write_component(
        sv_dir,
        "defines.sv",
        format!("`define UATK_CLK {clk}\n`define UATK_RESET {reset}\n"),
    )?;
    Ok(())
}

/// Run covergroup emission for the requested modules.
pub fn generate_coverage(
    registry: &UnitRegistry,
    config: &DutConfig,
    requested: &[String],
    work_dir: &Path,
    aliases: &AliasMap,
) -> Result<CoverageOutcome> {
    let modules = registry.resolve_modules(requested)?;

    let sv_dir = work_dir.join("sv_top");
    std::fs::create_dir_all(&sv_dir).map_err(|e| GenError::WorkDir {
        path: sv_dir.clone(),
        detail: e.to_string(),
    })?;

    tracing::info!("****** generating covergroups ******");
    write_sv_components(&sv_dir, aliases)?;
    tracing::debug!("generated tb_top, defines and interface files");

    let coverpoints_file = sv_dir.join("coverpoints.sv");
    if coverpoints_file.is_file() {
        tracing::debug!("removing existing coverpoints file");
        std::fs::remove_file(&coverpoints_file).map_err(|e| GenError::Write {
            path: coverpoints_file.clone(),
            detail: e.to_string(),
        })?;
    }

    let mut outcome = CoverageOutcome {
        emitted: Vec::new(),
        without_capability: Vec::new(),
        not_applicable: Vec::new(),
        coverpoints_file: coverpoints_file.clone(),
    };
    let mut text = String::new();

    for module in &modules {
        let module = module.as_str();
        tracing::debug!(module, "generating coverpoints");
        let params = config.module_params(module);
        let discovery = registry.discover(module);
        for err in &discovery.errors {
            tracing::error!(module, %err, "discovery error");
        }

        for mut unit in discovery.units {
            let name = unit.name().to_string();
            if !unit.is_applicable(&params) {
                tracing::info!(unit = %name, "skipped: not applicable to this DUT configuration");
                outcome.not_applicable.push(name);
                continue;
            }
            match unit.coverage() {
                Some(emitter) => {
                    tracing::info!(unit = %name, "emitting covergroups");
                    text.push_str(&emitter.emit_covergroups(aliases));
                    outcome.emitted.push(name);
                }
                None => {
                    tracing::debug!(unit = %name, "no coverage capability");
                    outcome.without_capability.push(name);
                }
            }
        }
        tracing::debug!(module, "finished generating coverpoints");
    }

    std::fs::write(&coverpoints_file, text).map_err(|e| GenError::Write {
        path: coverpoints_file.clone(),
        detail: e.to_string(),
    })?;
    tracing::info!("****** finished generating covergroups ******");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uatk_config::ModuleParams;
    use uatk_units::{CoverageEmit, TestUnit};

    struct Covered;

    impl TestUnit for Covered {
        fn name(&self) -> &str {
            "covered_unit"
        }
        fn is_applicable(&mut self, _params: &ModuleParams) -> bool {
            true
        }
        fn synthesize(&self) -> uatk_units::Result<Option<String>> {
            Ok(Some("  nop\n".to_string()))
        }
        fn coverage(&self) -> Option<&dyn CoverageEmit> {
            Some(self)
        }
    }

    impl CoverageEmit for Covered {
        fn emit_covergroups(&self, aliases: &AliasMap) -> String {
            format!(
                "covergroup covered_cg @(posedge {});\nendgroup\n",
                aliases.resolve("clk", "tb_top.clk")
            )
        }
    }

    struct Plain;

    impl TestUnit for Plain {
        fn name(&self) -> &str {
            "plain_unit"
        }
        fn is_applicable(&mut self, _params: &ModuleParams) -> bool {
            true
        }
        fn synthesize(&self) -> uatk_units::Result<Option<String>> {
            Ok(Some("  nop\n".to_string()))
        }
    }

    fn registry() -> UnitRegistry {
        let mut r = UnitRegistry::new();
        r.register("branch_predictor", || Ok(Box::new(Covered)));
        r.register("branch_predictor", || Ok(Box::new(Plain)));
        r
    }

    #[test]
    fn emits_components_and_concatenated_coverpoints() {
        let dir = tempfile::tempdir().unwrap();
        let aliases = AliasMap::from_pairs([("clk", "soc.clk")]);
        let outcome = generate_coverage(
            &registry(),
            &DutConfig::new("rv64i"),
            &["all".to_string()],
            dir.path(),
            &aliases,
        )
        .unwrap();

        assert_eq!(outcome.emitted, vec!["covered_unit"]);
        assert_eq!(outcome.without_capability, vec!["plain_unit"]);

        let sv_dir = dir.path().join("sv_top");
        assert!(sv_dir.join("interface.sv").is_file());
        assert!(sv_dir.join("tb_top.sv").is_file());
        assert!(sv_dir.join("defines.sv").is_file());
        let cov = std::fs::read_to_string(sv_dir.join("coverpoints.sv")).unwrap();
        assert!(cov.contains("posedge soc.clk"));
    }

    #[test]
    fn stale_coverpoints_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let sv_dir = dir.path().join("sv_top");
        std::fs::create_dir_all(&sv_dir).unwrap();
        std::fs::write(sv_dir.join("coverpoints.sv"), "stale text").unwrap();

        generate_coverage(
            &registry(),
            &DutConfig::new("rv64i"),
            &["branch_predictor".to_string()],
            dir.path(),
            &AliasMap::default(),
        )
        .unwrap();

        let cov = std::fs::read_to_string(sv_dir.join("coverpoints.sv")).unwrap();
        assert!(!cov.contains("stale text"));
        assert!(cov.contains("covered_cg"));
    }
}
