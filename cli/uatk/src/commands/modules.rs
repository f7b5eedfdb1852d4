//! `uatk list-modules` — show the registered generator modules.

use anyhow::Result;
use uatk_units::UnitRegistry;

pub fn run() -> Result<()> {
    let registry = UnitRegistry::with_builtin();
    for module in registry.module_names() {
        let found = registry.discover(module);
        println!("{module} ({} units)", found.units.len());
    }
    println!("all");
    Ok(())
}
