//! Test-case materialization.
//!
//! Layout:
//! ```text
//! <work_dir>/
//!   <module>/
//!     <unit_name>/
//!       <unit_name>.S   — generated test program
//!       log             — written later by the external runner
//! ```

use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};

/// Reset a module's test directory: delete it if present, then recreate it
/// empty. Destructive and idempotent. A recreate failure is returned so the
/// caller can report the module as failed instead of leaving it
/// directory-less.
pub fn reset_module_dir(work_dir: &Path, module: &str) -> Result<PathBuf> {
    let dir = work_dir.join(module);
    if dir.is_dir() {
        std::fs::remove_dir_all(&dir).map_err(|e| GenError::WorkDir {
            path: dir.clone(),
            detail: format!("removing stale tests: {e}"),
        })?;
    }
    std::fs::create_dir_all(&dir).map_err(|e| GenError::WorkDir {
        path: dir.clone(),
        detail: e.to_string(),
    })?;
    Ok(dir)
}

/// Write one test case under the module directory and return the path of
/// the assembly file.
pub fn write_test_case(module_dir: &Path, unit_name: &str, asm: &str) -> Result<PathBuf> {
    let case_dir = module_dir.join(unit_name);
    std::fs::create_dir_all(&case_dir).map_err(|e| GenError::WorkDir {
        path: case_dir.clone(),
        detail: e.to_string(),
    })?;
    let asm_path = case_dir.join(format!("{unit_name}.S"));
    std::fs::write(&asm_path, asm).map_err(|e| GenError::Write {
        path: asm_path.clone(),
        detail: e.to_string(),
    })?;
    Ok(asm_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_removes_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("decoder").join("old_unit");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("old_unit.S"), "stale").unwrap();

        let fresh = reset_module_dir(dir.path(), "decoder").unwrap();
        assert!(fresh.is_dir());
        assert!(!stale.exists());
    }

    #[test]
    fn test_case_lands_in_named_directory() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = reset_module_dir(dir.path(), "decoder").unwrap();
        let asm = write_test_case(&module_dir, "unit_01", "  nop\n").unwrap();
        assert_eq!(asm, dir.path().join("decoder/unit_01/unit_01.S"));
        assert_eq!(std::fs::read_to_string(asm).unwrap(), "  nop\n");
    }
}
