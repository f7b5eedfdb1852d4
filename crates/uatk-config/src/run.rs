//! Run-config file: drives a whole uatk invocation from one TOML file
//! instead of individual command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// The `[run]` section of a `uatk.toml` run-config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Working directory for generated artifacts.
    pub work_dir: PathBuf,
    /// Path to the DUT configuration file.
    #[serde(default)]
    pub dut_config: Option<PathBuf>,
    /// Comma-separated module list, `all` for every registered module.
    #[serde(default = "default_modules")]
    pub modules: String,
    /// Log filter level (`info`, `debug`, `error`, ...).
    #[serde(default = "default_verbose")]
    pub verbose: String,
    /// Clean the work directory first.
    #[serde(default)]
    pub clean: bool,
    /// Generate assembly tests.
    #[serde(default)]
    pub gen_test: bool,
    /// Also emit the test manifest for the runner.
    #[serde(default)]
    pub gen_test_list: bool,
    /// Emit SystemVerilog covergroups (requires `alias_file`).
    #[serde(default)]
    pub gen_cvg: bool,
    /// Alias map for covergroup emission.
    #[serde(default)]
    pub alias_file: Option<PathBuf>,
    /// Directory holding a pre-existing `link.ld` / `model_test.h`.
    #[serde(default)]
    pub linker_dir: Option<PathBuf>,
    /// Validate execution logs.
    #[serde(default)]
    pub val_test: bool,
}

fn default_modules() -> String {
    "all".to_string()
}

fn default_verbose() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
struct RunFile {
    run: RunConfig,
}

impl RunConfig {
    /// Load the `[run]` section from a TOML run-config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let file: RunFile = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(file.run)
    }
}

/// Split a comma-separated module list into trimmed, deduplicated names.
///
/// `"branch_predictor, decoder"` becomes `["branch_predictor", "decoder"]`;
/// any occurrence of `all` collapses the whole list to `["all"]`.
pub fn split_module_list(modules: &str) -> Vec<String> {
    let mut names: Vec<String> = modules
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    if names.iter().any(|m| m == "all") {
        return vec!["all".to_string()];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_list_splitting() {
        assert_eq!(
            split_module_list("branch_predictor, decoder"),
            vec!["branch_predictor".to_string(), "decoder".to_string()]
        );
        assert_eq!(split_module_list("decoder,decoder"), vec!["decoder"]);
        assert_eq!(split_module_list("decoder, all"), vec!["all"]);
        assert!(split_module_list(" , ").is_empty());
    }

    #[test]
    fn run_file_defaults() {
        let file: RunFile = toml::from_str(
            r#"
            [run]
            work_dir = "work"
            gen_test = true
            "#,
        )
        .unwrap();
        let run = file.run;
        assert_eq!(run.modules, "all");
        assert_eq!(run.verbose, "info");
        assert!(run.gen_test);
        assert!(!run.gen_cvg);
        assert!(run.alias_file.is_none());
    }
}
