//! Generation pipeline orchestrator.
//!
//! For each requested module: resolve its parameter table, discover its
//! units, reset the module's test directory, then gate/synthesize/write
//! per unit. Unit faults are isolated — one broken unit never stops the
//! rest of the module or the remaining modules — and every skip or fault
//! is recorded in the returned outcome.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use uatk_config::DutConfig;
use uatk_units::UnitRegistry;

use crate::artifacts;
use crate::boilerplate::{AsmBoilerplate, BoilerplateContext};
use crate::error::Result;
use crate::manifest::{TestEntry, TestManifest};
use crate::testcase;

/// Caller-facing knobs for a generation run.
pub struct GenerateOptions {
    /// Working directory for generated artifacts.
    pub work_dir: PathBuf,
    /// Directory holding a pre-existing `link.ld` / `model_test.h`.
    pub linker_dir: Option<PathBuf>,
    /// Whether to accumulate and write the runner manifest.
    pub emit_manifest: bool,
    /// Header inputs; inject a fixed context for deterministic output.
    pub boilerplate: BoilerplateContext,
}

/// A per-unit fault recorded during generation.
#[derive(Debug)]
pub struct UnitFault {
    pub unit: String,
    pub detail: String,
}

/// Result of generating one module.
#[derive(Debug, Default)]
pub struct ModuleOutcome {
    pub module: String,
    /// Units whose test case was written.
    pub generated: Vec<String>,
    /// Units skipped (not applicable, or empty synthesis).
    pub skipped: Vec<String>,
    /// Per-unit synthesis/write faults.
    pub faults: Vec<UnitFault>,
    /// Discovery-time faults (constructor failures, duplicate names).
    pub discovery_errors: Vec<String>,
    /// Module-level failure (test-directory reset failed); when set, no
    /// units were processed.
    pub error: Option<String>,
}

/// Result of a whole generation run.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub modules: Vec<ModuleOutcome>,
    /// The accumulated manifest, when one was requested.
    pub manifest: Option<TestManifest>,
    /// Where the manifest was written, when one was requested.
    pub manifest_path: Option<PathBuf>,
}

impl GenerateOutcome {
    /// Total number of generated test cases.
    pub fn total_generated(&self) -> usize {
        self.modules.iter().map(|m| m.generated.len()).sum()
    }

    /// Whether any unit- or module-level fault occurred.
    pub fn has_faults(&self) -> bool {
        self.modules.iter().any(|m| {
            m.error.is_some() || !m.faults.is_empty() || !m.discovery_errors.is_empty()
        })
    }
}

/// Run the generation pipeline.
///
/// `requested` may be explicit module names or the `all` sentinel; unknown
/// names fail here, before any directory is touched.
pub fn generate_tests(
    registry: &UnitRegistry,
    config: &DutConfig,
    requested: &[String],
    opts: &GenerateOptions,
) -> Result<GenerateOutcome> {
    let modules = registry.resolve_modules(requested)?;

    std::fs::create_dir_all(&opts.work_dir).map_err(|e| crate::error::GenError::WorkDir {
        path: opts.work_dir.clone(),
        detail: e.to_string(),
    })?;

    let mut manifest = opts.emit_manifest.then(TestManifest::new);
    let mut outcomes = Vec::with_capacity(modules.len());

    tracing::info!("****** generating tests ******");
    for module in &modules {
        outcomes.push(generate_module(
            registry,
            config,
            module,
            opts,
            manifest.as_mut(),
        ));
    }
    tracing::info!("****** finished generating tests ******");

    artifacts::ensure_support_files(&opts.work_dir, opts.linker_dir.as_deref())?;

    let manifest_path = match &manifest {
        Some(m) => {
            let path = m.write(&opts.work_dir)?;
            tracing::info!(path = %path.display(), "test manifest written");
            Some(path)
        }
        None => {
            tracing::info!("test manifest not requested");
            None
        }
    };

    Ok(GenerateOutcome {
        modules: outcomes,
        manifest,
        manifest_path,
    })
}

/// Render a caught panic payload as a fault detail string.
fn panic_detail(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

fn generate_module(
    registry: &UnitRegistry,
    config: &DutConfig,
    module: &str,
    opts: &GenerateOptions,
    mut manifest: Option<&mut TestManifest>,
) -> ModuleOutcome {
    let mut outcome = ModuleOutcome {
        module: module.to_string(),
        ..Default::default()
    };

    let params = config.module_params(module);
    let boilerplate = AsmBoilerplate::render(&opts.boilerplate);

    let discovery = registry.discover(module);
    for err in &discovery.errors {
        tracing::error!(module, %err, "discovery error");
        outcome.discovery_errors.push(err.to_string());
    }

    let module_dir = match testcase::reset_module_dir(&opts.work_dir, module) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!(module, %e, "cannot reset test directory; module failed");
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    tracing::debug!(module, "generating assembly tests");
    for mut unit in discovery.units {
        let name = unit.name().to_string();

        let applicable =
            match panic::catch_unwind(AssertUnwindSafe(|| unit.is_applicable(&params))) {
                Ok(applicable) => applicable,
                Err(payload) => {
                    let detail = panic_detail(payload);
                    tracing::error!(unit = %name, %detail, "applicability check panicked");
                    outcome.faults.push(UnitFault { unit: name, detail });
                    continue;
                }
            };
        if !applicable {
            tracing::info!(unit = %name, "skipped: not applicable to this DUT configuration");
            outcome.skipped.push(name);
            continue;
        }

        let body = match panic::catch_unwind(AssertUnwindSafe(|| unit.synthesize())) {
            Ok(Ok(Some(body))) if !body.trim().is_empty() => body,
            Ok(Ok(_)) => {
                tracing::info!(unit = %name, "skipped: nothing to emit");
                outcome.skipped.push(name);
                continue;
            }
            Ok(Err(e)) => {
                tracing::error!(unit = %name, %e, "synthesis failed");
                outcome.faults.push(UnitFault {
                    unit: name,
                    detail: e.to_string(),
                });
                continue;
            }
            Err(payload) => {
                let detail = panic_detail(payload);
                tracing::error!(unit = %name, %detail, "synthesis panicked");
                outcome.faults.push(UnitFault { unit: name, detail });
                continue;
            }
        };

        match testcase::write_test_case(&module_dir, &name, &boilerplate.wrap(&body)) {
            Ok(asm_path) => {
                tracing::debug!(unit = %name, path = %asm_path.display(), "generated test");
                if let Some(manifest) = manifest.as_deref_mut() {
                    let entry = TestEntry::new(&name, module, &opts.work_dir, &opts.boilerplate.isa);
                    if !manifest.insert(&name, entry) {
                        tracing::warn!(
                            unit = %name,
                            "manifest already has a test with this name; keeping the first entry"
                        );
                    }
                }
                outcome.generated.push(name);
            }
            Err(e) => {
                tracing::error!(unit = %name, %e, "cannot write test case");
                outcome.faults.push(UnitFault {
                    unit: name,
                    detail: e.to_string(),
                });
            }
        }
    }
    tracing::debug!(module, "finished generating assembly tests");

    outcome
}
