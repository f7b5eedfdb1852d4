//! Test manifest: the build/run metadata record consumed by the external
//! runner. One entry per generated test case, keyed by unit name, written
//! as `test_list.toml` in the work directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Initial value of the `result` field; the runner overwrites it.
pub const RESULT_UNAVAILABLE: &str = "Unavailable";

const CC_ARGS: &str = " -mcmodel=medany -static -std=gnu99 -O2 -fno-common \
                       -fno-builtin-printf -fvisibility=hidden ";
const LINKER_ARGS: &str = "-static -nostdlib -nostartfiles -lm -lgcc -T";

/// Build/run metadata for one test case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestEntry {
    pub generator: String,
    pub asm_file: PathBuf,
    pub work_dir: PathBuf,
    pub isa: String,
    pub march: String,
    pub mabi: String,
    pub cc: String,
    pub cc_args: String,
    pub linker_args: String,
    pub linker_file: PathBuf,
    pub include: Vec<PathBuf>,
    pub compile_macros: Vec<String>,
    pub extra_compile: Vec<String>,
    pub result: String,
}

impl TestEntry {
    /// Entry for a freshly generated test case.
    ///
    /// Toolchain fields derive from the ISA width: `rv64*` selects the
    /// 64-bit triple/ABI, anything else the 32-bit one.
    pub fn new(unit_name: &str, module: &str, work_dir: &Path, isa: &str) -> Self {
        let rv64 = isa.starts_with("rv64");
        let case_dir = work_dir.join(module).join(unit_name);
        TestEntry {
            generator: "uatk".to_string(),
            asm_file: case_dir.join(format!("{unit_name}.S")),
            work_dir: case_dir,
            isa: isa.to_string(),
            march: isa.to_string(),
            mabi: if rv64 { "lp64" } else { "ilp32" }.to_string(),
            cc: if rv64 {
                "riscv64-unknown-elf-gcc"
            } else {
                "riscv32-unknown-elf-gcc"
            }
            .to_string(),
            cc_args: CC_ARGS.to_string(),
            linker_args: LINKER_ARGS.to_string(),
            linker_file: work_dir.join("link.ld"),
            include: vec![work_dir.to_path_buf()],
            compile_macros: vec![format!("XLEN={}", if rv64 { 64 } else { 32 })],
            extra_compile: Vec::new(),
            result: RESULT_UNAVAILABLE.to_string(),
        }
    }
}

/// Manifest accumulated across all modules of one invocation.
///
/// Keys must be globally unique; on a cross-module collision the first
/// entry wins and the duplicate is reported to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestManifest {
    entries: BTreeMap<String, TestEntry>,
}

impl TestManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Returns `false` (keeping the existing entry) when
    /// the name is already taken.
    pub fn insert(&mut self, name: &str, entry: TestEntry) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&TestEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize to `test_list.toml` under the work directory and return
    /// the written path.
    pub fn write(&self, work_dir: &Path) -> Result<PathBuf> {
        let path = work_dir.join("test_list.toml");
        let text = toml::to_string_pretty(self)?;
        std::fs::write(&path, text).map_err(|e| GenError::Write {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        Ok(path)
    }

    /// Load a manifest back (used by tooling and tests).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::ManifestParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| GenError::ManifestParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_fields_for_rv64() {
        let entry = TestEntry::new("unit_01", "branch_predictor", Path::new("/w"), "rv64imafdc");
        assert_eq!(
            entry.asm_file,
            Path::new("/w/branch_predictor/unit_01/unit_01.S")
        );
        assert_eq!(entry.mabi, "lp64");
        assert_eq!(entry.cc, "riscv64-unknown-elf-gcc");
        assert_eq!(entry.compile_macros, vec!["XLEN=64".to_string()]);
        assert_eq!(entry.linker_file, Path::new("/w/link.ld"));
        assert_eq!(entry.result, RESULT_UNAVAILABLE);
    }

    #[test]
    fn entry_fields_for_rv32() {
        let entry = TestEntry::new("u", "decoder", Path::new("/w"), "rv32imc");
        assert_eq!(entry.mabi, "ilp32");
        assert_eq!(entry.cc, "riscv32-unknown-elf-gcc");
        assert_eq!(entry.compile_macros, vec!["XLEN=32".to_string()]);
    }

    #[test]
    fn collision_keeps_first_entry() {
        let mut manifest = TestManifest::new();
        let a = TestEntry::new("u", "m1", Path::new("/w"), "rv64i");
        let b = TestEntry::new("u", "m2", Path::new("/w"), "rv64i");
        assert!(manifest.insert("u", a.clone()));
        assert!(!manifest.insert("u", b));
        assert_eq!(manifest.get("u"), Some(&a));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn write_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = TestManifest::new();
        manifest.insert(
            "unit_01",
            TestEntry::new("unit_01", "decoder", dir.path(), "rv64i"),
        );
        let path = manifest.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("test_list.toml"));

        let loaded = TestManifest::load(&path).unwrap();
        assert_eq!(loaded.get("unit_01"), manifest.get("unit_01"));
    }
}
