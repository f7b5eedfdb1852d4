//! Validation pipeline orchestrator.
//!
//! Validation is independent of any prior generation run: it rediscovers
//! each module's units and re-evaluates applicability against the same DUT
//! configuration (applicability must be idempotent for this to agree with
//! generation). Applicable units lacking the log-check capability are
//! skipped silently; a missing log, a check that cannot complete, or a
//! panicking checker is reported per unit and never aborts the module.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use uatk_config::DutConfig;
use uatk_units::UnitRegistry;

use crate::error::{Result, ValidateError};
use crate::report::{ModuleReport, ValidationSummary, Verdict};

/// Run minimal log checking for the requested modules.
///
/// Writes one report per module under `<work_dir>/reports/<module>/` and
/// the joined report at `<work_dir>/report.json`, then returns the
/// summary for the caller to print.
pub fn validate_tests(
    registry: &UnitRegistry,
    config: &DutConfig,
    requested: &[String],
    work_dir: &Path,
) -> Result<ValidationSummary> {
    let modules = registry.resolve_modules(requested)?;

    tracing::info!("****** validating test results, minimal log checking ******");
    let mut summary = ValidationSummary::default();

    for module in &modules {
        let report = validate_module(registry, config, module, work_dir)?;
        report.write(work_dir)?;
        summary.modules.push(report);
    }

    let joined = summary.write(work_dir)?;
    tracing::info!(path = %joined.display(), "joined report written");
    tracing::info!("****** finished validating test results ******");

    Ok(summary)
}

fn validate_module(
    registry: &UnitRegistry,
    config: &DutConfig,
    module: &str,
    work_dir: &Path,
) -> Result<ModuleReport> {
    let mut report = ModuleReport::new(module);
    let params = config.module_params(module);

    let reports_dir = work_dir.join("reports").join(module);
    std::fs::create_dir_all(&reports_dir).map_err(|e| ValidateError::ReportsDir {
        path: reports_dir.clone(),
        detail: e.to_string(),
    })?;

    let discovery = registry.discover(module);
    for err in &discovery.errors {
        tracing::error!(module, %err, "discovery error");
    }

    tracing::debug!(module, "minimal log checking");
    for mut unit in discovery.units {
        let name = unit.name().to_string();

        let applicable =
            match panic::catch_unwind(AssertUnwindSafe(|| unit.is_applicable(&params))) {
                Ok(applicable) => applicable,
                Err(payload) => {
                    let detail = panic_detail(payload);
                    tracing::error!(unit = %name, %detail, "applicability check panicked");
                    report.record(&name, Verdict::CheckError, Some(detail));
                    continue;
                }
            };
        if !applicable {
            tracing::warn!(unit = %name, "no test generated for this configuration; skipping");
            continue;
        }
        let Some(checker) = unit.log_check() else {
            tracing::debug!(unit = %name, "no log-check capability");
            continue;
        };

        let log_path = work_dir.join(module).join(&name).join("log");
        if !log_path.is_file() {
            tracing::error!(
                unit = %name,
                path = %log_path.display(),
                "log not found; run the test on the DUT first or check the path"
            );
            report.record(
                &name,
                Verdict::LogNotFound,
                Some(format!("expected log at {}", log_path.display())),
            );
            continue;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| checker.check_log(&log_path, &reports_dir)))
        {
            Ok(Ok(true)) => {
                tracing::info!(unit = %name, "minimal test passed");
                report.record(&name, Verdict::Passed, None);
            }
            Ok(Ok(false)) => {
                tracing::error!(unit = %name, "minimal test failed");
                report.record(&name, Verdict::Failed, None);
            }
            Ok(Err(e)) => {
                tracing::error!(unit = %name, %e, "log check could not complete");
                report.record(&name, Verdict::CheckError, Some(e.to_string()));
            }
            Err(payload) => {
                let detail = panic_detail(payload);
                tracing::error!(unit = %name, %detail, "log check panicked");
                report.record(&name, Verdict::CheckError, Some(detail));
            }
        }
    }
    tracing::debug!(module, "minimal log checking complete");

    Ok(report)
}

/// Render a caught panic payload as a verdict detail string.
fn panic_detail(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}
