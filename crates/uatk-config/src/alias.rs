//! Signal alias map for covergroup emission.
//!
//! Coverage text refers to DUT-internal signals through aliases so that
//! generator units stay independent of the RTL hierarchy. The map is a flat
//! TOML table of `alias = "hierarchical.signal.path"` entries.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Alias name to hierarchical signal path.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: BTreeMap<String, String>,
}

impl AliasMap {
    /// Load an alias map from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse an alias map from TOML text.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let mut entries = BTreeMap::new();
        for (alias, value) in table {
            match value {
                toml::Value::String(s) => {
                    entries.insert(alias, s);
                }
                _ => {
                    return Err(ConfigError::WrongShape {
                        path: path.to_path_buf(),
                        key: alias,
                        expected: "a signal path string",
                    })
                }
            }
        }
        Ok(AliasMap { entries })
    }

    /// Build an alias map from explicit pairs (used by tests).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        AliasMap {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolve an alias, falling back to the given default path.
    pub fn resolve<'a>(&'a self, alias: &str, default: &'a str) -> &'a str {
        self.entries.get(alias).map(String::as_str).unwrap_or(default)
    }

    /// Iterate over all alias pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_and_unknown_aliases() {
        let map =
            AliasMap::parse("bpu_ghr = \"tb.dut.bpu.ghr\"\n", Path::new("aliasing.toml")).unwrap();
        assert_eq!(map.resolve("bpu_ghr", "x"), "tb.dut.bpu.ghr");
        assert_eq!(map.resolve("bpu_btb", "tb.dut.bpu.btb"), "tb.dut.bpu.btb");
    }

    #[test]
    fn non_string_value_is_rejected() {
        let err = AliasMap::parse("bpu_ghr = 4\n", Path::new("aliasing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::WrongShape { .. }));
    }
}
