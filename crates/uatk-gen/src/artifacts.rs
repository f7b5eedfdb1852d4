//! Static auxiliary artifacts: linker script and compliance model header.
//!
//! Both are fixed text. They are written into the work directory once per
//! generation run unless the caller points at a directory that already
//! supplies them. Also hosts the work-directory clean operation.

use std::path::Path;

use crate::error::{GenError, Result};

/// Linker script for the generated tests.
pub const LINKER_SCRIPT: &str = r#"OUTPUT_ARCH( "riscv" )
ENTRY(rvtest_entry_point)

SECTIONS
{
  . = 0x80000000;
  .text.init : { *(.text.init) }
  . = ALIGN(0x1000);
  .tohost : { *(.tohost) }
  . = ALIGN(0x1000);
  .text : { *(.text) }
  . = ALIGN(0x1000);
  .data : { *(.data) }
  .data.string : { *(.data.string)}
  .bss : { *(.bss) }
  _end = .;
}
"#;

/// Compliance model header mapping the RVMODEL_* macros onto the DUT's
/// tohost/fromhost and signature conventions.
pub const MODEL_TEST_H: &str = r#"#ifndef _COMPLIANCE_MODEL_H
#define _COMPLIANCE_MODEL_H

#define RVMODEL_DATA_SECTION \
        .pushsection .tohost,"aw",@progbits;                            \
        .align 8; .global tohost; tohost: .dword 0;                     \
        .align 8; .global fromhost; fromhost: .dword 0;                 \
        .popsection;                                                    \
        .align 8; .global begin_regstate; begin_regstate:               \
        .word 128;                                                      \
        .align 8; .global end_regstate; end_regstate:                   \
        .word 4;

//RV_COMPLIANCE_HALT
#define RVMODEL_HALT                                                    \
test_end:                                                               \
      li gp, 1;                                                         \
      sw gp, tohost, t5;                                                \
      fence.i;                                                          \
      li t6, 0x20000;                                                   \
      la t5, begin_signature;                                           \
      sw t5, 0(t6);                                                     \
      la t5, end_signature;                                             \
      sw t5, 8(t6);                                                     \
      sw t5, 12(t6);

#define RVMODEL_BOOT

//RV_COMPLIANCE_DATA_BEGIN
#define RVMODEL_DATA_BEGIN                                              \
  RVMODEL_DATA_SECTION                                                  \
  .align 4; .global begin_signature; begin_signature:

//RV_COMPLIANCE_DATA_END
#define RVMODEL_DATA_END                                                \
        .align 4; .global end_signature; end_signature:

//RVTEST_IO_INIT
#define RVMODEL_IO_INIT
//RVTEST_IO_WRITE_STR
#define RVMODEL_IO_WRITE_STR(_R, _STR)
//RVTEST_IO_CHECK
#define RVMODEL_IO_CHECK()
//RVTEST_IO_ASSERT_GPR_EQ
#define RVMODEL_IO_ASSERT_GPR_EQ(_S, _R, _I)
//RVTEST_IO_ASSERT_SFPR_EQ
#define RVMODEL_IO_ASSERT_SFPR_EQ(_F, _R, _I)
//RVTEST_IO_ASSERT_DFPR_EQ
#define RVMODEL_IO_ASSERT_DFPR_EQ(_D, _R, _I)

#define RVMODEL_SET_MSW_INT \
 li t1, 1;                         \
 li t2, 0x2000000;                 \
 sw t1, 0(t2);

#define RVMODEL_CLEAR_MSW_INT     \
 li t2, 0x2000000;                 \
 sw x0, 0(t2);

#define RVMODEL_CLEAR_MTIMER_INT

#define RVMODEL_CLEAR_MEXT_INT
#endif // _COMPLIANCE_MODEL_H
"#;

fn write_artifact(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| GenError::Write {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Ensure `link.ld` and `model_test.h` exist for the generated tests.
///
/// A file already present in `linker_dir` is preferred and left untouched;
/// otherwise the fixed text is written into the work directory.
pub fn ensure_support_files(work_dir: &Path, linker_dir: Option<&Path>) -> Result<()> {
    let supplied = |name: &str| {
        linker_dir
            .map(|d| d.join(name).is_file())
            .unwrap_or(false)
    };

    if supplied("link.ld") {
        tracing::debug!("using user-specified linker script");
    } else {
        write_artifact(&work_dir.join("link.ld"), LINKER_SCRIPT)?;
        tracing::debug!(dir = %work_dir.display(), "created linker script");
    }

    if supplied("model_test.h") {
        tracing::debug!("using user-specified model_test.h");
    } else {
        write_artifact(&work_dir.join("model_test.h"), MODEL_TEST_H)?;
        tracing::debug!(dir = %work_dir.display(), "created model_test.h");
    }

    Ok(())
}

/// Remove everything uatk generated under the work directory: module test
/// directories, `sv_top`, `reports`, the manifest and support files. The
/// directory itself stays; missing pieces are not errors.
pub fn clean_work_dir(work_dir: &Path) -> Result<()> {
    let entries = match std::fs::read_dir(work_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let removed = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| GenError::WorkDir {
            path: path.clone(),
            detail: format!("cleaning: {e}"),
        })?;
        tracing::debug!(path = %path.display(), "removed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_files_are_created_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        ensure_support_files(dir.path(), None).unwrap();
        assert!(dir.path().join("link.ld").is_file());
        assert!(dir.path().join("model_test.h").is_file());
        let ld = std::fs::read_to_string(dir.path().join("link.ld")).unwrap();
        assert!(ld.contains("rvtest_entry_point"));
    }

    #[test]
    fn user_supplied_files_are_not_overwritten() {
        let work = tempfile::tempdir().unwrap();
        let linker = tempfile::tempdir().unwrap();
        std::fs::write(linker.path().join("link.ld"), "custom").unwrap();

        ensure_support_files(work.path(), Some(linker.path())).unwrap();
        // Custom linker honored, header still generated.
        assert!(!work.path().join("link.ld").exists());
        assert!(work.path().join("model_test.h").is_file());
        assert_eq!(
            std::fs::read_to_string(linker.path().join("link.ld")).unwrap(),
            "custom"
        );
    }

    #[test]
    fn clean_empties_but_keeps_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("branch_predictor/u1")).unwrap();
        std::fs::write(dir.path().join("test_list.toml"), "x").unwrap();

        clean_work_dir(dir.path()).unwrap();
        assert!(dir.path().is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // Cleaning a missing directory is fine.
        clean_work_dir(&dir.path().join("absent")).unwrap();
    }
}
