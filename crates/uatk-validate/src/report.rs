//! Validation reports: per-unit verdicts, per-module counters, and the
//! joined all-modules summary.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidateError};

/// Verdict for one validated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
    /// No log existed at the expected path. Reported as an error,
    /// counted separately from pass/fail.
    LogNotFound,
    /// The log existed but the check itself could not complete (read
    /// error, report write failure, or a panicking checker). Carries a
    /// detail string; counted separately from pass/fail.
    CheckError,
}

/// Outcome for one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub unit: String,
    pub verdict: Verdict,
    /// Extra detail for error verdicts (e.g. the log path that was missing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Validation report for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    pub module: String,
    pub outcomes: Vec<UnitOutcome>,
}

impl ModuleReport {
    pub fn new(module: impl Into<String>) -> Self {
        ModuleReport {
            module: module.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, unit: &str, verdict: Verdict, detail: Option<String>) {
        self.outcomes.push(UnitOutcome {
            unit: unit.to_string(),
            verdict,
            detail,
        });
    }

    fn count(&self, verdict: Verdict) -> usize {
        self.outcomes.iter().filter(|o| o.verdict == verdict).count()
    }

    pub fn passed(&self) -> usize {
        self.count(Verdict::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(Verdict::Failed)
    }

    pub fn not_found(&self) -> usize {
        self.count(Verdict::LogNotFound)
    }

    pub fn check_errors(&self) -> usize {
        self.count(Verdict::CheckError)
    }

    /// Write this report under `<work_dir>/reports/<module>/report.json`
    /// and return the written path.
    pub fn write(&self, work_dir: &Path) -> Result<PathBuf> {
        let dir = work_dir.join("reports").join(&self.module);
        std::fs::create_dir_all(&dir).map_err(|e| ValidateError::ReportsDir {
            path: dir.clone(),
            detail: e.to_string(),
        })?;
        let path = dir.join("report.json");
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, text).map_err(|e| ValidateError::ReportWrite {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        Ok(path)
    }
}

/// Joined summary across all validated modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub modules: Vec<ModuleReport>,
}

impl ValidationSummary {
    pub fn passed(&self) -> usize {
        self.modules.iter().map(ModuleReport::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.modules.iter().map(ModuleReport::failed).sum()
    }

    pub fn not_found(&self) -> usize {
        self.modules.iter().map(ModuleReport::not_found).sum()
    }

    pub fn check_errors(&self) -> usize {
        self.modules.iter().map(ModuleReport::check_errors).sum()
    }

    /// Tests with a pass/fail verdict; error verdicts don't count.
    pub fn total(&self) -> usize {
        self.passed() + self.failed()
    }

    /// Write the joined report at `<work_dir>/report.json` and return the
    /// written path.
    pub fn write(&self, work_dir: &Path) -> Result<PathBuf> {
        let path = work_dir.join("report.json");
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, text).map_err(|e| ValidateError::ReportWrite {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        Ok(path)
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Minimal Verification Results")?;
        writeln!(f, "{}", "=".repeat(28))?;
        let total = self.total();
        writeln!(f, "Total Tests : {total}")?;
        if total == 0 {
            writeln!(f, "No tests were created")?;
        } else {
            let pct = |n: usize| 100.0 * n as f64 / total as f64;
            writeln!(
                f,
                "Tests Passed : {} - [{:.1} %]",
                self.passed(),
                pct(self.passed())
            )?;
            writeln!(
                f,
                "Tests Failed : {} - [{:.1} %]",
                self.failed(),
                pct(self.failed())
            )?;
        }
        if self.not_found() > 0 {
            writeln!(f, "Missing Logs : {}", self.not_found())?;
        }
        if self.check_errors() > 0 {
            writeln!(f, "Check Errors : {}", self.check_errors())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(passed: usize, failed: usize, missing: usize) -> ValidationSummary {
        let mut report = ModuleReport::new("branch_predictor");
        for i in 0..passed {
            report.record(&format!("p{i}"), Verdict::Passed, None);
        }
        for i in 0..failed {
            report.record(&format!("f{i}"), Verdict::Failed, None);
        }
        for i in 0..missing {
            report.record(&format!("m{i}"), Verdict::LogNotFound, Some("no log".into()));
        }
        ValidationSummary {
            modules: vec![report],
        }
    }

    #[test]
    fn counters_separate_not_found_from_pass_fail() {
        let summary = summary_with(2, 1, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.not_found(), 1);
    }

    #[test]
    fn check_errors_are_counted_and_printed_apart() {
        let mut summary = summary_with(1, 0, 0);
        summary.modules[0].record(
            "e0",
            Verdict::CheckError,
            Some("report write failed".into()),
        );
        assert_eq!(summary.total(), 1);
        assert_eq!(summary.check_errors(), 1);
        let text = summary.to_string();
        assert!(text.contains("Check Errors : 1"));
        assert!(text.contains("Tests Passed : 1 - [100.0 %]"));
    }

    #[test]
    fn zero_tests_prints_no_tests_line() {
        let text = summary_with(0, 0, 0).to_string();
        assert!(text.contains("Total Tests : 0"));
        assert!(text.contains("No tests were created"));
        assert!(!text.contains('%'));
    }

    #[test]
    fn percentages_for_nonzero_totals() {
        let text = summary_with(3, 1, 0).to_string();
        assert!(text.contains("Tests Passed : 3 - [75.0 %]"));
        assert!(text.contains("Tests Failed : 1 - [25.0 %]"));
    }

    #[test]
    fn report_artifacts_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summary_with(1, 0, 1);

        let module_path = summary.modules[0].write(dir.path()).unwrap();
        assert_eq!(
            module_path,
            dir.path().join("reports/branch_predictor/report.json")
        );

        let joined_path = summary.write(dir.path()).unwrap();
        let loaded: ValidationSummary =
            serde_json::from_str(&std::fs::read_to_string(joined_path).unwrap()).unwrap();
        assert_eq!(loaded.passed(), 1);
        assert_eq!(loaded.not_found(), 1);
    }
}
