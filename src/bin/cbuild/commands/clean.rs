//! `cbuild clean` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::load_project;
use cbuild::ops::clean;
use cbuild::util::fs::relative_path;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let cwd = std::env::current_dir()?;
    let shown = relative_path(&cwd, project.build_dir());
    if clean(&project)? {
        eprintln!("     Removed {}", shown.display());
    } else {
        tracing::debug!("{} does not exist", shown.display());
    }

    Ok(())
}
