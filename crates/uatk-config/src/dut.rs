//! DUT configuration: the `ISA` identifier plus one parameter table per module.
//!
//! A `dut_config.toml` looks like:
//!
//! ```toml
//! ISA = "rv64imafdc"
//!
//! [branch_predictor]
//! bpu_enabled = true
//! history_len = 8
//! ```
//!
//! Module sections are free-form tables; units read individual keys with
//! defaults, so a missing section or key is never an error.

use std::collections::BTreeMap;
use std::path::Path;

use toml::Value;

use crate::error::{ConfigError, Result};

/// Parameter table for a single module.
///
/// Wraps the raw TOML table and offers typed getters that fall back to a
/// caller-supplied default when the key is absent or has the wrong type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleParams {
    entries: BTreeMap<String, Value>,
}

impl ModuleParams {
    /// An empty parameter table (all getters return their defaults).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a parameter table from raw TOML entries.
    pub fn from_table(table: toml::value::Table) -> Self {
        ModuleParams {
            entries: table.into_iter().collect(),
        }
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Integer parameter with a default.
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.entries
            .get(key)
            .and_then(Value::as_integer)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    /// Boolean parameter with a default.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// String parameter with a default.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.entries
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed DUT configuration.
#[derive(Debug, Clone)]
pub struct DutConfig {
    /// Target ISA string (e.g. `rv64imafdc`).
    pub isa: String,
    modules: BTreeMap<String, ModuleParams>,
}

impl DutConfig {
    /// Build a configuration directly (used by tests and embedders).
    pub fn new(isa: impl Into<String>) -> Self {
        DutConfig {
            isa: isa.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Insert a module parameter table.
    pub fn with_module(mut self, name: impl Into<String>, params: ModuleParams) -> Self {
        self.modules.insert(name.into(), params);
        self
    }

    /// Load a DUT configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse a DUT configuration from TOML text.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut table: toml::value::Table =
            toml::from_str(text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let isa = match table.remove("ISA") {
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(ConfigError::WrongShape {
                    path: path.to_path_buf(),
                    key: "ISA".to_string(),
                    expected: "a string",
                })
            }
            None => {
                return Err(ConfigError::MissingKey {
                    path: path.to_path_buf(),
                    key: "ISA".to_string(),
                })
            }
        };

        let mut modules = BTreeMap::new();
        for (name, value) in table {
            match value {
                Value::Table(t) => {
                    modules.insert(name, ModuleParams::from_table(t));
                }
                _ => {
                    return Err(ConfigError::WrongShape {
                        path: path.to_path_buf(),
                        key: name,
                        expected: "a table of module parameters",
                    })
                }
            }
        }

        Ok(DutConfig { isa, modules })
    }

    /// Parameter table for a module. Absent modules get an empty table;
    /// units treat missing keys as "use defaults".
    pub fn module_params(&self, module: &str) -> ModuleParams {
        self.modules.get(module).cloned().unwrap_or_default()
    }

    /// Names of the modules the configuration mentions.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DutConfig {
        DutConfig::parse(text, Path::new("dut_config.toml")).unwrap()
    }

    #[test]
    fn parses_isa_and_module_tables() {
        let cfg = parse(
            r#"
            ISA = "rv64imafdc"

            [branch_predictor]
            bpu_enabled = true
            history_len = 4
            "#,
        );
        assert_eq!(cfg.isa, "rv64imafdc");
        let params = cfg.module_params("branch_predictor");
        assert!(params.get_bool("bpu_enabled", false));
        assert_eq!(params.get_usize("history_len", 8), 4);
    }

    #[test]
    fn absent_module_yields_empty_params() {
        let cfg = parse(r#"ISA = "rv32i""#);
        let params = cfg.module_params("decoder");
        assert!(params.is_empty());
        assert_eq!(params.get_usize("depth", 7), 7);
        assert_eq!(params.get_str("mode", "default"), "default");
    }

    #[test]
    fn missing_isa_is_rejected() {
        let err = DutConfig::parse("[branch_predictor]\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "ISA"));
    }

    #[test]
    fn non_table_module_section_is_rejected() {
        let err =
            DutConfig::parse("ISA = \"rv32i\"\nbranch_predictor = 3\n", Path::new("x.toml"))
                .unwrap_err();
        assert!(matches!(err, ConfigError::WrongShape { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dut_config.toml");
        std::fs::write(&path, "ISA = \"rv64imac\"\n").unwrap();

        let cfg = DutConfig::load(&path).unwrap();
        assert_eq!(cfg.isa, "rv64imac");

        let err = DutConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn wrong_typed_param_falls_back_to_default() {
        let cfg = parse(
            r#"
            ISA = "rv64i"
            [branch_predictor]
            history_len = "eight"
            "#,
        );
        let params = cfg.module_params("branch_predictor");
        assert_eq!(params.get_usize("history_len", 8), 8);
    }
}
