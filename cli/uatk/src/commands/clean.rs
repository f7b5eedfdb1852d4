//! `uatk clean` — remove generated files from the work directory.

use std::path::Path;

use anyhow::Result;
use uatk_gen::artifacts::clean_work_dir;

pub fn run(work_dir: &Path) -> Result<()> {
    clean_work_dir(work_dir)?;
    println!("generated files removed from {}", work_dir.display());
    Ok(())
}
