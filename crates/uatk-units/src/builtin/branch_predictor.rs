//! Branch-predictor test units.
//!
//! These exercise a gshare fully-associative predictor: GHR saturation,
//! BTB invalidation across `fence.i`, and return-address-stack push/pop
//! depth. Register conventions follow the original hand-written tests:
//! `x30` is the loop counter, `x31` a scratch register, `x1..x29` hold
//! return addresses along the recursive call chains.

use std::fmt::Write as _;
use std::path::Path;

use uatk_config::{AliasMap, ModuleParams};

use crate::error::{Result, UnitError};
use crate::registry::UnitRegistry;
use crate::unit::{CoverageEmit, LogCheck, TestUnit};

/// Register the `branch_predictor` module.
pub fn register(registry: &mut UnitRegistry) {
    registry.register("branch_predictor", || Ok(Box::new(GshareFaFence01::new())));
    registry.register("branch_predictor", || Ok(Box::new(GshareFaGhr01::zeros())));
    registry.register("branch_predictor", || Ok(Box::new(GshareFaGhr01::ones())));
    registry.register("branch_predictor", || Ok(Box::new(RasPushPop01::new())));
}

/// Two no-op-ish filler instructions, repeated between calls so the
/// predictor sees work between control transfers.
const NO_OPS: &str = "  addi x31,x0,5\n  addi x31,x0,-5\n";

/// Pass criterion shared by the minimal log checks: the log must be
/// non-empty and free of DUT fault markers. The log format itself is
/// runner-defined; only these tokens are interpreted.
const FAULT_MARKERS: &[&str] = &["exception", "dut_error", "misaligned"];

fn minimal_log_check(name: &str, log_path: &Path, reports_dir: &Path) -> Result<bool> {
    let text = std::fs::read_to_string(log_path).map_err(|e| UnitError::LogRead {
        path: log_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let faults: Vec<&str> = text
        .lines()
        .filter(|line| {
            let lower = line.to_ascii_lowercase();
            FAULT_MARKERS.iter().any(|m| lower.contains(m))
        })
        .collect();
    let passed = !text.trim().is_empty() && faults.is_empty();

    let report_path = reports_dir.join(format!("{name}.report"));
    let mut report = format!(
        "test: {name}\nlog: {}\nresult: {}\nfault_lines: {}\n",
        log_path.display(),
        if passed { "pass" } else { "fail" },
        faults.len()
    );
    for line in faults {
        let _ = writeln!(report, "  {line}");
    }
    std::fs::write(&report_path, report).map_err(|e| UnitError::ReportWrite {
        path: report_path,
        detail: e.to_string(),
    })?;

    Ok(passed)
}

/// Build the recursive call-chain body shared by the fence and RAS tests.
///
/// Taken from the original hand-written sequence: `x30` counts remaining
/// passes, each `lab<i>` calls the next level through `x<i+1>` and returns,
/// and the innermost level decrements the counter (after a `fence.i` when
/// `fenced`).
fn recursive_call_chain(recurse_level: usize, fenced: bool) -> String {
    let mut asm = format!("  addi x30,x0,{recurse_level}\n");
    asm.push_str("  call x1,lab1\n  beq  x30,x0,end\n");
    if fenced {
        asm.push_str("  fence.i\n");
    }

    for i in 1..=recurse_level {
        let _ = writeln!(asm, "lab{i}:");
        if i == recurse_level {
            if fenced {
                asm.push_str("  fence.i\n");
            }
            asm.push_str("  addi x30,x30,-1\n");
        } else {
            asm.push_str(&NO_OPS.repeat(3));
            let _ = writeln!(asm, "  call x{},lab{}", i + 1, i + 1);
        }
        asm.push_str(&NO_OPS.repeat(3));
        asm.push_str("  ret\n");
    }
    asm.push_str("end:\n  nop\n");
    asm
}

/// Fences the CPU mid-recursion and checks that BTB entries are
/// invalidated rather than replayed.
pub struct GshareFaFence01 {
    recurse_level: usize,
}

impl GshareFaFence01 {
    pub fn new() -> Self {
        GshareFaFence01 { recurse_level: 5 }
    }
}

impl Default for GshareFaFence01 {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUnit for GshareFaFence01 {
    fn name(&self) -> &str {
        "gshare_fa_fence_01"
    }

    fn is_applicable(&mut self, params: &ModuleParams) -> bool {
        // Call-link registers x2..x30 bound the usable depth.
        self.recurse_level = params.get_usize("fence_recurse_level", 5).clamp(1, 29);
        params.get_bool("bpu_enabled", true) && params.get_bool("btb_flush_on_fence", true)
    }

    fn synthesize(&self) -> Result<Option<String>> {
        Ok(Some(recursive_call_chain(self.recurse_level, true)))
    }

    fn log_check(&self) -> Option<&dyn LogCheck> {
        Some(self)
    }
}

impl LogCheck for GshareFaFence01 {
    fn check_log(&self, log_path: &Path, reports_dir: &Path) -> Result<bool> {
        minimal_log_check(self.name(), log_path, reports_dir)
    }
}

/// GHR saturation polarity.
#[derive(Clone, Copy, PartialEq, Eq)]
enum GhrFill {
    Zeros,
    Ones,
}

/// Saturates the global history register with one branch polarity:
/// a run of never-taken forward branches (zeros) or a taken backward
/// loop (ones).
pub struct GshareFaGhr01 {
    fill: GhrFill,
    history_len: usize,
}

impl GshareFaGhr01 {
    pub fn zeros() -> Self {
        GshareFaGhr01 {
            fill: GhrFill::Zeros,
            history_len: 8,
        }
    }

    pub fn ones() -> Self {
        GshareFaGhr01 {
            fill: GhrFill::Ones,
            history_len: 8,
        }
    }
}

impl TestUnit for GshareFaGhr01 {
    fn name(&self) -> &str {
        match self.fill {
            GhrFill::Zeros => "gshare_fa_ghr_zeros_01",
            GhrFill::Ones => "gshare_fa_ghr_ones_01",
        }
    }

    fn is_applicable(&mut self, params: &ModuleParams) -> bool {
        self.history_len = params.get_usize("history_len", 8).max(1);
        params.get_bool("bpu_enabled", true)
    }

    fn synthesize(&self) -> Result<Option<String>> {
        let mut asm = String::new();
        match self.fill {
            GhrFill::Zeros => {
                // Forward branches that never fire shift zeros into the GHR.
                asm.push_str("  addi x31,x0,0\n");
                for _ in 0..self.history_len {
                    asm.push_str("  bne x31,x0,end\n");
                    asm.push_str(NO_OPS);
                }
                asm.push_str("end:\n  nop\n");
            }
            GhrFill::Ones => {
                // A backward loop taken `history_len` times shifts in ones.
                let _ = writeln!(asm, "  addi x30,x0,{}", self.history_len + 1);
                asm.push_str("loop:\n");
                asm.push_str(NO_OPS);
                asm.push_str("  addi x30,x30,-1\n");
                asm.push_str("  bne x30,x0,loop\n");
                asm.push_str("  nop\n");
            }
        }
        Ok(Some(asm))
    }

    fn log_check(&self) -> Option<&dyn LogCheck> {
        Some(self)
    }

    fn coverage(&self) -> Option<&dyn CoverageEmit> {
        Some(self)
    }
}

impl LogCheck for GshareFaGhr01 {
    fn check_log(&self, log_path: &Path, reports_dir: &Path) -> Result<bool> {
        minimal_log_check(self.name(), log_path, reports_dir)
    }
}

impl CoverageEmit for GshareFaGhr01 {
    fn emit_covergroups(&self, aliases: &AliasMap) -> String {
        let clk = aliases.resolve("clk", "tb_top.clk");
        let ghr = aliases.resolve("bpu_ghr", "tb_top.dut.bpu.ghr");
        let polarity = match self.fill {
            GhrFill::Zeros => "zeros",
            GhrFill::Ones => "ones",
        };
        format!(
            "covergroup {name}_cg @(posedge {clk});\n\
             \x20 option.per_instance = 1;\n\
             \x20 ghr_{polarity}: coverpoint {ghr} {{\n\
             \x20   bins saturated = {{{bin}}};\n\
             \x20 }}\n\
             endgroup\n\n",
            name = self.name(),
            bin = match self.fill {
                GhrFill::Zeros => "'0".to_string(),
                GhrFill::Ones => format!("{{{}{{1'b1}}}}", self.history_len),
            },
        )
    }
}

/// Winds the return-address stack down a call chain and back up,
/// checking that returns predict correctly at every depth.
pub struct RasPushPop01 {
    ras_depth: usize,
}

impl RasPushPop01 {
    pub fn new() -> Self {
        RasPushPop01 { ras_depth: 4 }
    }
}

impl Default for RasPushPop01 {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUnit for RasPushPop01 {
    fn name(&self) -> &str {
        "ras_push_pop_01"
    }

    fn is_applicable(&mut self, params: &ModuleParams) -> bool {
        self.ras_depth = params.get_usize("ras_depth", 4).clamp(1, 29);
        params.get_bool("bpu_enabled", true)
    }

    fn synthesize(&self) -> Result<Option<String>> {
        Ok(Some(recursive_call_chain(self.ras_depth, false)))
    }

    fn log_check(&self) -> Option<&dyn LogCheck> {
        Some(self)
    }
}

impl LogCheck for RasPushPop01 {
    fn check_log(&self, log_path: &Path, reports_dir: &Path) -> Result<bool> {
        minimal_log_check(self.name(), log_path, reports_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(text: &str) -> ModuleParams {
        ModuleParams::from_table(toml::from_str(text).unwrap())
    }

    #[test]
    fn fence_body_matches_reference_shape() {
        let mut unit = GshareFaFence01::new();
        assert!(unit.is_applicable(&ModuleParams::empty()));
        let body = unit.synthesize().unwrap().unwrap();
        assert!(body.starts_with("  addi x30,x0,5\n"));
        assert_eq!(body.matches("fence.i").count(), 2);
        assert_eq!(body.matches("lab").count(), 5 + 4 + 1); // labels + call targets + entry call
        assert!(body.ends_with("end:\n  nop\n"));
    }

    #[test]
    fn fence_respects_recurse_level_param() {
        let mut unit = GshareFaFence01::new();
        let params = params("fence_recurse_level = 3");
        assert!(unit.is_applicable(&params));
        let body = unit.synthesize().unwrap().unwrap();
        assert!(body.starts_with("  addi x30,x0,3\n"));
        assert!(body.contains("lab3:"));
        assert!(!body.contains("lab4:"));
    }

    #[test]
    fn fence_not_applicable_without_btb_flush() {
        let mut unit = GshareFaFence01::new();
        let params = params("btb_flush_on_fence = false");
        assert!(!unit.is_applicable(&params));
    }

    #[test]
    fn ghr_zeros_emits_one_branch_per_history_bit() {
        let mut unit = GshareFaGhr01::zeros();
        let params = params("history_len = 6");
        assert!(unit.is_applicable(&params));
        let body = unit.synthesize().unwrap().unwrap();
        assert_eq!(body.matches("bne x31,x0,end").count(), 6);
    }

    #[test]
    fn ras_unit_has_no_fence() {
        let mut unit = RasPushPop01::new();
        assert!(unit.is_applicable(&ModuleParams::empty()));
        let body = unit.synthesize().unwrap().unwrap();
        assert!(!body.contains("fence.i"));
        assert!(body.contains("ret"));
    }

    #[test]
    fn capability_surface() {
        let fence = GshareFaFence01::new();
        assert!(fence.log_check().is_some());
        assert!(fence.coverage().is_none());

        let ghr = GshareFaGhr01::ones();
        assert!(ghr.log_check().is_some());
        assert!(ghr.coverage().is_some());
    }

    #[test]
    fn minimal_log_check_verdicts() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        std::fs::create_dir(&reports).unwrap();

        let good = dir.path().join("log");
        std::fs::write(&good, "core 0: retired 120 instructions\n").unwrap();
        assert!(minimal_log_check("t", &good, &reports).unwrap());
        assert!(reports.join("t.report").is_file());

        let bad = dir.path().join("log2");
        std::fs::write(&bad, "core 0: EXCEPTION cause=2\n").unwrap();
        assert!(!minimal_log_check("t", &bad, &reports).unwrap());

        let missing = dir.path().join("absent");
        assert!(minimal_log_check("t", &missing, &reports).is_err());
    }

    #[test]
    fn ghr_covergroup_uses_alias_map() {
        let unit = GshareFaGhr01::zeros();
        let aliases = AliasMap::from_pairs([("bpu_ghr", "soc.core.bpu.ghr_reg")]);
        let sv = unit.emit_covergroups(&aliases);
        assert!(sv.contains("soc.core.bpu.ghr_reg"));
        assert!(sv.contains("covergroup gshare_fa_ghr_zeros_01_cg"));
    }
}
